use range_chart::ChartError;
use range_chart::core::{ColumnKind, RawDataItem, line_segments, prepare_data_set};

const ITEM_JSON: &str = r##"{
    "columns": [
        ["x", 1552521600000, 1552608000000, 1552694400000],
        ["y0", 37, 20, 32],
        ["y1", 22, 12, 30]
    ],
    "types": {"y0": "line", "y1": "line", "x": "x"},
    "names": {"y0": "#0", "y1": "#1"},
    "colors": {"y0": "#3DC23F", "y1": "#F34C44"}
}"##;

#[test]
fn item_is_flattened_into_parallel_arrays() {
    let item = RawDataItem::from_json_str(ITEM_JSON).expect("parse item");
    assert_eq!(item.types.get("x"), Some(&ColumnKind::X));

    let data = prepare_data_set(&item).expect("prepare data set");
    assert_eq!(
        data.x_values,
        vec![1_552_521_600_000.0, 1_552_608_000_000.0, 1_552_694_400_000.0]
    );
    assert_eq!(data.values("y0"), Some(&[37.0, 20.0, 32.0][..]));
    assert_eq!(data.values("y1"), Some(&[22.0, 12.0, 30.0][..]));
    assert_eq!(data.names.get("y1").map(String::as_str), Some("#1"));
    assert_eq!(data.colors.get("y0").map(String::as_str), Some("#3DC23F"));
    data.validate().expect("prepared data is consistent");
}

#[test]
fn series_follow_type_declaration_order() {
    let item = RawDataItem::from_json_str(ITEM_JSON).expect("parse item");
    let data = prepare_data_set(&item).expect("prepare data set");

    let ids: Vec<&str> = data.series_ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["y0", "y1"]);
}

#[test]
fn missing_metadata_falls_back_to_id_and_empty_color() {
    let item = RawDataItem::from_json_value(serde_json::json!({
        "columns": [["x", 1, 2], ["y0", 3, 4]],
        "types": {"x": "x", "y0": "line"}
    }))
    .expect("parse item");
    let data = prepare_data_set(&item).expect("prepare data set");

    assert_eq!(data.names.get("y0").map(String::as_str), Some("y0"));
    assert_eq!(data.colors.get("y0").map(String::as_str), Some(""));
}

#[test]
fn item_without_x_column_is_rejected() {
    let item = RawDataItem::from_json_value(serde_json::json!({
        "columns": [["y0", 3, 4]],
        "types": {"y0": "line"}
    }))
    .expect("parse item");

    let err = prepare_data_set(&item).expect_err("x column is required");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn declared_line_without_column_is_rejected() {
    let item = RawDataItem::from_json_value(serde_json::json!({
        "columns": [["x", 1, 2]],
        "types": {"x": "x", "y0": "line"}
    }))
    .expect("parse item");

    assert!(prepare_data_set(&item).is_err());
}

#[test]
fn non_numeric_samples_are_rejected() {
    let item = RawDataItem::from_json_value(serde_json::json!({
        "columns": [["x", 1, 2], ["y0", 3, "four"]],
        "types": {"x": "x", "y0": "line"}
    }))
    .expect("parse item");

    let err = prepare_data_set(&item).expect_err("labels are not samples");
    assert!(err.to_string().contains("four"));
}

#[test]
fn malformed_json_is_reported_as_invalid_data() {
    let err = RawDataItem::from_json_str("{\"columns\": 3}").expect_err("not an item");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn line_segments_join_adjacent_samples() {
    let item = RawDataItem::from_json_str(ITEM_JSON).expect("parse item");
    let data = prepare_data_set(&item).expect("prepare data set");
    let segments = line_segments(&data);

    let y0 = segments.get("y0").expect("y0 segments");
    assert_eq!(y0.len(), 2);
    assert_eq!(y0[0].x1, 1_552_521_600_000.0);
    assert_eq!(y0[0].x2, 1_552_608_000_000.0);
    assert_eq!(y0[0].y1, 37.0);
    assert_eq!(y0[0].y2, 20.0);
    assert_eq!(y0[1].y2, 32.0);
}
