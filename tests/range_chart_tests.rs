use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use approx::assert_relative_eq;
use range_chart::api::{RangeChart, RangeChartConfig, ViewMode};
use range_chart::core::{ContainerSize, DataSet, RangeSelection, RawDataItem};
use range_chart::interaction::{MouseEventKind, MouseInput, TouchEventKind, TouchInput};
use range_chart::render::NullRenderer;
use range_chart::store::{ChartState, StateObserver};

const DAY_MS: f64 = 86_400_000.0;
const MARCH_14_2019: f64 = 1_552_521_600_000.0;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn data() -> DataSet {
    DataSet::new(
        (0..10)
            .map(|i| MARCH_14_2019 + f64::from(i) * DAY_MS)
            .collect(),
    )
    .with_series(
        "y0",
        "#0",
        "#3DC23F",
        (0..10).map(|i| f64::from(i) * 10.0).collect(),
    )
    .with_series("y1", "#1", "#F34C44", vec![5.0; 10])
}

/// Overview track of 300px with 10px handles: 290px of handle travel.
fn config() -> RangeChartConfig {
    RangeChartConfig::new(
        ContainerSize::new(900.0, 100.0),
        ContainerSize::new(300.0, 50.0),
    )
}

fn chart() -> RangeChart<NullRenderer> {
    RangeChart::new(NullRenderer::default(), data(), config()).expect("chart init")
}

fn mouse(kind: MouseEventKind, client_x: f64) -> MouseInput {
    MouseInput { client_x, kind }
}

struct RangeLog {
    ranges: Rc<RefCell<Vec<RangeSelection>>>,
}

impl StateObserver for RangeLog {
    fn id(&self) -> &str {
        "range-log"
    }

    fn on_state(&mut self, state: &ChartState) {
        self.ranges.borrow_mut().push(state.range);
    }
}

#[test]
fn chart_starts_on_the_default_range() {
    let chart = chart();
    assert_eq!(chart.state().range, RangeSelection::new(5.0, 95.0));
    assert_eq!(chart.selector().value(), RangeSelection::new(5.0, 95.0));
    assert_eq!(chart.main_view().mode(), ViewMode::RangeDriven);
    assert_eq!(chart.overview_view().mode(), ViewMode::Static);

    // Indices 1..=8 of the main graph, the whole data set in the overview.
    let main = chart.main_view().viewport();
    assert_relative_eq!(main.origin_x, 100.0);
    assert_relative_eq!(main.width, 700.0);
    assert_relative_eq!(main.max_visible_value, 80.0);
    let overview = chart.overview_view().viewport();
    assert_relative_eq!(overview.width, 300.0, epsilon = 1e-9);
    assert_relative_eq!(overview.max_visible_value, 90.0);
}

#[test]
fn first_frame_renders_without_any_input() {
    let mut chart = chart();
    assert!(chart.needs_frame());
    assert!(chart.on_frame(ms(0)).expect("frame"));
    assert_eq!(chart.renderer().frames_rendered, 1);
    assert_eq!(chart.renderer().last_rect_count, 5);

    assert!(!chart.needs_frame());
    assert!(!chart.on_frame(ms(16)).expect("frame"));
    assert_eq!(chart.renderer().frames_rendered, 1);
}

#[test]
fn window_drag_pans_the_main_graph_with_animation() {
    let mut chart = chart();
    chart.on_frame(ms(0)).expect("frame");

    chart.mouse_event(mouse(MouseEventKind::Down, 150.0), ms(10));
    let released = chart
        .mouse_event(mouse(MouseEventKind::Move, 180.0), ms(10))
        .expect("leading emission");
    assert_eq!(released, RangeSelection::new(10.0, 100.0));
    assert_eq!(chart.state().range, released);
    assert!(chart.main_view().needs_frame());
    assert!(!chart.overview_view().needs_frame());

    assert!(chart.on_frame(ms(135)).expect("mid-flight frame"));
    let mid = chart.main_view().viewport();
    assert_relative_eq!(mid.origin_x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(mid.width, 750.0, epsilon = 1e-9);

    chart.mouse_event(mouse(MouseEventKind::Up, 180.0), ms(200));
    assert!(chart.on_frame(ms(400)).expect("settling frame"));
    let settled = chart.main_view().viewport();
    assert_eq!(settled, chart.main_view().target());
    assert_relative_eq!(settled.width, 800.0);
    assert!(!chart.needs_frame());
}

#[test]
fn drag_inside_the_same_index_window_does_not_animate() {
    let mut chart = chart();
    chart.on_frame(ms(0)).expect("frame");

    chart.mouse_event(mouse(MouseEventKind::Down, 150.0), ms(10));
    let released = chart.mouse_event(mouse(MouseEventKind::Move, 160.0), ms(10));
    assert_eq!(released, Some(RangeSelection::new(8.45, 98.45)));
    assert!(!chart.main_view().needs_frame());
}

#[test]
fn throttled_drag_flushes_the_trailing_range_on_a_later_frame() {
    let mut chart = chart();
    chart.mouse_event(mouse(MouseEventKind::Down, 150.0), ms(0));
    chart.mouse_event(mouse(MouseEventKind::Move, 160.0), ms(0));
    assert!(
        chart
            .mouse_event(mouse(MouseEventKind::Move, 164.0), ms(100))
            .is_none()
    );
    assert_eq!(chart.state().range, RangeSelection::new(8.45, 98.45));
    assert!(chart.needs_frame());

    chart.mouse_event(mouse(MouseEventKind::Up, 164.0), ms(120));
    chart.on_frame(ms(260)).expect("frame");
    assert_eq!(chart.state().range, RangeSelection::new(9.83, 99.83));
}

#[test]
fn throttled_handle_moves_redraw_the_selector_immediately() {
    let mut chart = chart();
    chart.on_frame(ms(0)).expect("frame");
    chart.mouse_event(mouse(MouseEventKind::Down, 150.0), ms(10));
    chart.mouse_event(mouse(MouseEventKind::Move, 160.0), ms(10));
    assert!(chart.on_frame(ms(16)).expect("frame"));
    let rendered = chart.renderer().frames_rendered;

    let window_x = chart.selector().geometry().window_x;
    let held = chart.mouse_event(mouse(MouseEventKind::Move, 164.0), ms(30));
    assert!(held.is_none());
    assert_eq!(chart.state().range, RangeSelection::new(8.45, 98.45));
    assert!(chart.selector().geometry().window_x > window_x);

    assert!(chart.needs_frame());
    assert!(chart.on_frame(ms(46)).expect("frame"));
    assert_eq!(chart.renderer().frames_rendered, rendered + 1);
    let frame = chart.build_frame();
    assert_relative_eq!(frame.rects[2].x, chart.selector().geometry().window_x);
}

#[test]
fn static_charts_redraw_selector_moves_without_store_changes() {
    let mut chart =
        RangeChart::new(NullRenderer::default(), data(), config().with_range_driven(false))
            .expect("chart init");
    chart.on_frame(ms(0)).expect("frame");
    chart.mouse_event(mouse(MouseEventKind::Down, 150.0), ms(10));
    chart.mouse_event(mouse(MouseEventKind::Move, 160.0), ms(10));
    chart.on_frame(ms(16)).expect("frame");

    chart.mouse_event(mouse(MouseEventKind::Move, 164.0), ms(30));
    assert!(!chart.main_view().needs_frame());
    assert!(chart.on_frame(ms(46)).expect("frame"));
}

#[test]
fn touch_gestures_drive_the_same_selector() {
    let mut chart = chart();
    chart.touch_event(&TouchInput::single(TouchEventKind::Start, 3, 19.0), ms(0));
    let released = chart
        .touch_event(&TouchInput::single(TouchEventKind::Move, 3, 48.0), ms(0))
        .expect("leading emission");
    chart.touch_event(&TouchInput::single(TouchEventKind::End, 3, 48.0), ms(5));

    assert_eq!(released.max_percent, 95.0);
    assert!(released.min_percent > 5.0);
}

#[test]
fn toggling_series_publishes_the_ordered_active_set() {
    let mut chart = chart();
    chart.set_series_active("y0", false, ms(0)).expect("toggle y0");
    assert!(!chart.is_series_active("y0"));

    let active = chart.state().active_series.clone().expect("explicit set");
    let ids: Vec<&str> = active.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["y1"]);

    assert!(chart.overview_view().needs_frame());
    assert!(!chart.main_view().is_series_visible("y0"));
    assert_relative_eq!(chart.main_view().target().max_visible_value, 5.0);

    assert!(chart.set_series_active("y9", true, ms(0)).is_err());
}

#[test]
fn hiding_every_series_does_not_animate() {
    let mut chart = chart();
    chart.on_frame(ms(0)).expect("frame");
    chart.set_series_active("y0", false, ms(0)).expect("toggle y0");
    chart.on_frame(ms(1_000)).expect("settle");

    chart.set_series_active("y1", false, ms(1_000)).expect("toggle y1");
    assert!(!chart.main_view().needs_frame());
    assert!(!chart.overview_view().needs_frame());

    chart.on_frame(ms(1_016)).expect("redraw");
    // Only the zero baseline of the main graph is left.
    assert_eq!(chart.renderer().last_line_count, 1);
}

#[test]
fn programmatic_ranges_move_selector_and_views() {
    let mut chart = chart();
    chart
        .set_range(RangeSelection::new(50.0, 100.0), ms(0))
        .expect("set range");

    assert_eq!(chart.state().range, RangeSelection::new(50.0, 100.0));
    assert_relative_eq!(chart.selector().min_position(), 145.0);
    assert_relative_eq!(chart.main_view().target().origin_x, 500.0);
    assert!(chart.set_range(RangeSelection::new(60.0, 40.0), ms(0)).is_err());
}

#[test]
fn observers_see_range_change_events() {
    let ranges = Rc::new(RefCell::new(Vec::new()));
    let mut chart = chart();
    chart
        .register_observer(Box::new(RangeLog {
            ranges: Rc::clone(&ranges),
        }))
        .expect("register observer");

    chart.mouse_event(mouse(MouseEventKind::Down, 150.0), ms(0));
    chart.mouse_event(mouse(MouseEventKind::Move, 160.0), ms(0));
    assert_eq!(
        *ranges.borrow(),
        vec![
            RangeSelection::new(5.0, 95.0),
            RangeSelection::new(8.45, 98.45)
        ]
    );
    assert!(chart.unregister_observer("range-log"));
}

#[test]
fn static_main_graph_ignores_range_changes() {
    let mut chart = RangeChart::new(
        NullRenderer::default(),
        data(),
        config().with_range_driven(false),
    )
    .expect("chart init");

    assert!(chart.main_view().rotator().is_none());
    chart
        .set_range(RangeSelection::new(50.0, 100.0), ms(0))
        .expect("set range");
    assert!(!chart.main_view().needs_frame());
    assert_relative_eq!(chart.main_view().viewport().width, 900.0);
}

#[test]
fn frame_layers_main_graph_overview_and_selector() {
    let chart = chart();
    let frame = chart.build_frame();
    frame.validate().expect("frame is drawable");

    assert_eq!(frame.size, ContainerSize::new(900.0, 174.0));
    assert_eq!(frame.rects.len(), 5);
    assert!(frame.rects.iter().all(|rect| rect.y == 124.0));

    let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert!(labels.contains(&"0"));
    assert!(labels.contains(&"70"));
    assert!(labels.contains(&"Mar 15"));
    assert!(labels.contains(&"Mar 22"));

    let baseline = frame
        .lines
        .iter()
        .find(|line| line.y1 == 99.0 && line.y2 == 99.0)
        .expect("zero baseline");
    assert_relative_eq!(baseline.x2, 900.0);
}

#[test]
fn chart_can_be_built_from_a_raw_item() {
    let item = RawDataItem::from_json_value(serde_json::json!({
        "columns": [["x", 1, 2, 3, 4], ["y0", 3, 4, 8, 6]],
        "types": {"x": "x", "y0": "line"},
        "colors": {"y0": "#3DC23F"}
    }))
    .expect("parse item");
    let mut chart =
        RangeChart::from_raw(NullRenderer::default(), &item, config()).expect("chart init");

    chart.render().expect("render");
    assert_eq!(chart.into_renderer().frames_rendered, 1);
}

#[test]
fn single_sample_data_degrades_to_an_empty_chart() {
    let data = DataSet::new(vec![MARCH_14_2019]).with_series("y0", "#0", "#3DC23F", vec![4.0]);
    let mut chart = RangeChart::new(NullRenderer::default(), data, config()).expect("chart init");

    assert!(chart.main_view().engine().is_degenerate());
    chart.render().expect("render");
    assert_eq!(chart.renderer().last_line_count, 0);
    assert_eq!(chart.renderer().last_rect_count, 5);
}

#[test]
fn invalid_data_is_rejected() {
    let mut data = data();
    data.series.get_mut("y1").expect("y1").pop();
    assert!(RangeChart::new(NullRenderer::default(), data, config()).is_err());
}
