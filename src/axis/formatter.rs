use std::fmt::Write;

use chrono::DateTime;

/// Writes axis label text into a reusable buffer.
pub trait AxisLabelFormatter {
    fn format_into(&self, value: f64, out: &mut String);

    fn format(&self, value: f64) -> String {
        let mut out = String::new();
        self.format_into(value, &mut out);
        out
    }
}

/// Plain decimal labels; integral values are printed without a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalLabelFormatter {
    pub precision: usize,
}

impl Default for DecimalLabelFormatter {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl AxisLabelFormatter for DecimalLabelFormatter {
    fn format_into(&self, value: f64, out: &mut String) {
        if !value.is_finite() {
            out.push('-');
            return;
        }
        if value.fract() == 0.0 {
            let _ = write!(out, "{value:.0}");
        } else {
            let _ = write!(out, "{value:.*}", self.precision);
        }
    }
}

/// Short UTC dates for unix-millisecond abscissas, e.g. `Mar 14`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtcDateLabelFormatter {
    pub pattern: String,
}

impl Default for UtcDateLabelFormatter {
    fn default() -> Self {
        Self {
            pattern: "%b %-d".to_owned(),
        }
    }
}

impl AxisLabelFormatter for UtcDateLabelFormatter {
    fn format_into(&self, value: f64, out: &mut String) {
        let timestamp = if value.is_finite() {
            DateTime::from_timestamp_millis(value as i64)
        } else {
            None
        };
        match timestamp {
            Some(timestamp) => {
                let _ = write!(out, "{}", timestamp.format(&self.pattern));
            }
            None => DecimalLabelFormatter::default().format_into(value, out),
        }
    }
}
