use approx::assert_relative_eq;
use range_chart::core::{
    ActiveSeriesSet, ContainerSize, DataSet, RangeSelection, Viewport, ViewportEngine,
    index_bounds, project_series_paths,
};

fn ten_points() -> DataSet {
    DataSet::new((0..10).map(f64::from).collect()).with_series(
        "y0",
        "#0",
        "#3DC23F",
        (0..10).map(|i| f64::from(i) * 10.0).collect(),
    )
}

fn two_series() -> DataSet {
    ten_points().with_series(
        "y1",
        "#1",
        "#F34C44",
        vec![5.0, 45.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0],
    )
}

#[test]
fn full_range_frames_the_whole_container() {
    let data = ten_points();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 100.0));
    let viewport = engine.compute(&data, None, RangeSelection::FULL);

    assert_relative_eq!(viewport.origin_x, 0.0);
    assert_relative_eq!(viewport.width, 900.0);
    assert_relative_eq!(viewport.height, 100.0, epsilon = 1e-9);
    assert_relative_eq!(viewport.origin_y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(viewport.max_visible_value, 90.0);
}

#[test]
fn upper_half_starts_at_the_rounded_up_index() {
    let data = ten_points();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 100.0));
    let viewport = engine.compute(&data, None, RangeSelection::new(50.0, 100.0));

    let bounds = index_bounds(data.len(), RangeSelection::new(50.0, 100.0)).expect("bounds");
    assert_eq!((bounds.min_index, bounds.max_index), (5, 9));
    assert_relative_eq!(engine.step_x(), 100.0);
    assert_relative_eq!(viewport.origin_x, 500.0);
    assert_relative_eq!(viewport.width, 400.0);
    assert_relative_eq!(viewport.max_visible_value, 90.0);
}

#[test]
fn height_follows_the_visible_maximum() {
    let data = ten_points();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 100.0));
    let viewport = engine.compute(&data, None, RangeSelection::new(0.0, 50.0));

    // Indices 0..=4, visible maximum 40 of a global 90.
    assert_relative_eq!(viewport.max_visible_value, 40.0);
    assert_relative_eq!(viewport.height, 40.0 * 100.0 / 90.0, epsilon = 1e-9);
    assert_relative_eq!(viewport.origin_y, 100.0 - viewport.height, epsilon = 1e-9);
}

#[test]
fn only_active_series_contribute_to_the_maximum() {
    let data = two_series();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 100.0));
    let range = RangeSelection::new(0.0, 30.0);

    let all = engine.compute(&data, None, range);
    assert_relative_eq!(all.max_visible_value, 45.0);

    let only_y0: ActiveSeriesSet = ["y0"].into_iter().collect();
    let y0 = engine.compute(&data, Some(&only_y0), range);
    assert_relative_eq!(y0.max_visible_value, 20.0);
    assert!(y0.same_window(Viewport {
        height: y0.height,
        origin_y: y0.origin_y,
        ..all
    }));
}

#[test]
fn empty_active_set_collapses_height_to_zero() {
    let data = two_series();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 100.0));
    let viewport = engine.compute(&data, Some(&ActiveSeriesSet::new()), RangeSelection::FULL);

    assert_eq!(viewport.height, 0.0);
    assert_eq!(viewport.origin_y, 100.0);
    assert!(!viewport.is_drawable());
}

#[test]
fn narrow_range_never_inverts_indices() {
    let data = ten_points();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 100.0));
    let viewport = engine.compute(&data, None, RangeSelection::new(51.0, 52.0));

    assert_eq!(viewport.width, 0.0);
    assert!(viewport.width >= 0.0);
}

#[test]
fn out_of_bounds_ranges_are_clamped() {
    let data = ten_points();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 100.0));
    let clamped = engine.compute(&data, None, RangeSelection::new(-20.0, 140.0));
    let full = engine.compute(&data, None, RangeSelection::FULL);
    assert_eq!(clamped, full);
}

#[test]
fn degenerate_inputs_yield_empty_geometry() {
    let single = DataSet::new(vec![1.0]).with_series("y0", "#0", "#000000", vec![5.0]);
    let engine = ViewportEngine::new(&single, ContainerSize::new(900.0, 100.0));
    assert!(engine.is_degenerate());
    assert_eq!(
        engine.compute(&single, None, RangeSelection::FULL),
        Viewport::EMPTY
    );

    let data = ten_points();
    let zero = ViewportEngine::new(&data, ContainerSize::new(0.0, 0.0));
    let viewport = zero.compute(&data, None, RangeSelection::FULL);
    assert_eq!(viewport, Viewport::EMPTY);

    let flat = DataSet::new(vec![0.0, 1.0, 2.0]).with_series("y0", "#0", "#000", vec![0.0; 3]);
    let engine = ViewportEngine::new(&flat, ContainerSize::new(300.0, 100.0));
    let viewport = engine.compute(&flat, None, RangeSelection::FULL);
    assert_eq!(viewport.height, 0.0);
    assert!(viewport.origin_y.is_finite());
}

#[test]
fn paths_are_projected_with_fixed_scales() {
    let data = ten_points();
    let engine = ViewportEngine::new(&data, ContainerSize::new(900.0, 90.0));
    let paths = project_series_paths(&data, &engine);

    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].color, "#3DC23F");
    assert_eq!(paths[0].points.len(), 10);
    assert_relative_eq!(paths[0].points[0].0, 0.0);
    assert_relative_eq!(paths[0].points[0].1, 90.0);
    assert_relative_eq!(paths[0].points[9].0, 900.0);
    assert_relative_eq!(paths[0].points[9].1, 0.0);
}

#[test]
fn projection_maps_the_window_onto_the_container() {
    let viewport = Viewport::new(500.0, 0.0, 400.0, 100.0);
    let container = ContainerSize::new(800.0, 200.0);

    let (x, y) = viewport.project(700.0, 50.0, container).expect("drawable");
    assert_relative_eq!(x, 400.0);
    assert_relative_eq!(y, 100.0);
    assert!(Viewport::EMPTY.project(1.0, 1.0, container).is_none());
}
