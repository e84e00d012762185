use std::time::Duration;

use proptest::prelude::*;
use range_chart::axis::{nice_gridline_total, nice_gridline_values, select_label_indices};
use range_chart::core::{ActiveSeriesSet, ContainerSize, DataSet, RangeSelection, ViewportEngine};
use range_chart::interaction::{
    DragTarget, PointerEvent, PointerPhase, RangeSelector, RangeSelectorConfig,
};

fn data_set(first: Vec<f64>, second: Vec<f64>) -> DataSet {
    let len = first.len().min(second.len());
    DataSet::new((0..len).map(|i| i as f64).collect())
        .with_series("y0", "#0", "#3DC23F", first[..len].to_vec())
        .with_series("y1", "#1", "#F34C44", second[..len].to_vec())
}

fn target(code: u8) -> DragTarget {
    match code {
        0 => DragTarget::MinHandle,
        1 => DragTarget::MaxHandle,
        _ => DragTarget::Window,
    }
}

proptest! {
    #[test]
    fn viewport_geometry_is_finite_and_non_negative(
        first in prop::collection::vec(0.0f64..1_000.0, 0..60),
        second in prop::collection::vec(0.0f64..1_000.0, 0..60),
        width in 1.0f64..2_000.0,
        height in 1.0f64..1_000.0,
        min_percent in 0.0f64..99.0,
        span in 0.5f64..100.0,
        only_first in any::<bool>()
    ) {
        let data = data_set(first, second);
        let engine = ViewportEngine::new(&data, ContainerSize::new(width, height));
        let range = RangeSelection::new(min_percent, (min_percent + span).min(100.0));
        let active: Option<ActiveSeriesSet> = only_first.then(|| ["y0"].into_iter().collect());

        let viewport = engine.compute(&data, active.as_ref(), range);
        prop_assert!(viewport.width >= 0.0);
        prop_assert!(viewport.height >= 0.0);
        prop_assert!(viewport.origin_x.is_finite() && viewport.origin_y.is_finite());
        prop_assert!(viewport.width <= width + 1e-6);
        prop_assert!(viewport.height <= height + 1e-6);
    }

    #[test]
    fn viewport_computation_is_idempotent(
        first in prop::collection::vec(0.0f64..1_000.0, 2..60),
        second in prop::collection::vec(0.0f64..1_000.0, 2..60),
        min_percent in 0.0f64..50.0,
        max_percent in 50.0f64..100.0
    ) {
        let data = data_set(first, second);
        let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 300.0));
        let range = RangeSelection::new(min_percent, max_percent);

        let once = engine.compute(&data, None, range);
        let twice = engine.compute(&data, None, range);
        prop_assert_eq!(once.origin_x.to_bits(), twice.origin_x.to_bits());
        prop_assert_eq!(once.origin_y.to_bits(), twice.origin_y.to_bits());
        prop_assert_eq!(once.width.to_bits(), twice.width.to_bits());
        prop_assert_eq!(once.height.to_bits(), twice.height.to_bits());
        prop_assert_eq!(once.max_visible_value.to_bits(), twice.max_visible_value.to_bits());
    }

    #[test]
    fn drags_never_cross_the_minimum_gap(
        gestures in prop::collection::vec((0u8..3, -100.0f64..500.0), 1..40),
        handle_width in 0.0f64..20.0
    ) {
        let config = RangeSelectorConfig::new(300.0)
            .with_handle_width(handle_width)
            .with_min_interval_px(20.0);
        let mut selector =
            RangeSelector::new(config, RangeSelection::default()).expect("selector init");

        for (step, (code, x)) in gestures.into_iter().enumerate() {
            let now = Duration::from_millis(step as u64 * 16);
            let start = selector.min_position();
            selector.pointer_down_on(target(code), PointerEvent::mouse(start, PointerPhase::Down));
            selector.pointer_move(PointerEvent::mouse(x, PointerPhase::Move), now);
            selector.pointer_up(PointerEvent::mouse(x, PointerPhase::Up));

            prop_assert!(selector.max_position() - selector.min_position() >= 20.0);
            prop_assert!(selector.min_position() >= -1e-9);
            prop_assert!(selector.max_position() <= selector.available_width() + 1e-9);
        }
    }

    #[test]
    fn gridline_total_lies_within_tolerance(
        target in 0.001f64..1.0e9,
        tolerance in 1.05f64..3.0,
        count in 1usize..8
    ) {
        let total = nice_gridline_total(target, tolerance);
        prop_assert!(total < target);
        prop_assert!(total >= target / tolerance);

        let values = nice_gridline_values(target, count, tolerance);
        prop_assert_eq!(values.len(), count);
        let top = values[count - 1];
        prop_assert!((top - total).abs() <= total * 1e-12);
    }

    #[test]
    fn date_labels_are_bounded_and_evenly_spaced(
        len in 2usize..500,
        max_count in 2usize..12
    ) {
        let indices = select_label_indices(len, max_count);
        prop_assert!(indices.len() <= max_count);
        prop_assert_eq!(indices.first().copied(), Some(0));
        prop_assert_eq!(indices.last().copied(), Some(len - 1));

        let strides: Vec<usize> = indices.windows(2).map(|pair| pair[1] - pair[0]).collect();
        prop_assert!(strides.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
