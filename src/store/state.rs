use serde::{Deserialize, Serialize};

use crate::core::{ActiveSeriesSet, RangeSelection};

/// Per-chart state shared by the range selector and every chart view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartState {
    pub range: RangeSelection,
    /// `None` means every series is visible.
    #[serde(default)]
    pub active_series: Option<ActiveSeriesSet>,
}

impl ChartState {
    #[must_use]
    pub fn new(range: RangeSelection) -> Self {
        Self {
            range,
            active_series: None,
        }
    }

    /// Shallow key-wise merge: every key present in `patch` replaces the whole value.
    #[must_use]
    pub fn merged(&self, patch: &ChartStatePatch) -> Self {
        Self {
            range: patch.range.unwrap_or(self.range),
            active_series: match &patch.active_series {
                Some(active) => active.clone(),
                None => self.active_series.clone(),
            },
        }
    }
}

/// Partial state update. Absent keys keep their previous value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartStatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_series: Option<Option<ActiveSeriesSet>>,
}

impl ChartStatePatch {
    #[must_use]
    pub fn range(range: RangeSelection) -> Self {
        Self {
            range: Some(range),
            active_series: None,
        }
    }

    #[must_use]
    pub fn active_series(active: ActiveSeriesSet) -> Self {
        Self {
            range: None,
            active_series: Some(Some(active)),
        }
    }

    /// Resets visibility to "every series".
    #[must_use]
    pub fn all_series_active() -> Self {
        Self {
            range: None,
            active_series: Some(None),
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: RangeSelection) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.active_series.is_none()
    }
}

impl From<RangeSelection> for ChartStatePatch {
    fn from(range: RangeSelection) -> Self {
        Self::range(range)
    }
}
