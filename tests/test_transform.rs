//! Tests for column coercion: encoding order, injectivity, idempotence and
//! missing-value handling

use std::collections::HashMap;

use numerize::pipeline::{
    transform, ColumnAction, EncodingOrder, PipelineError, TransformConfig,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn config(json: &str) -> TransformConfig {
    TransformConfig::from_json(json).unwrap()
}

#[test]
fn test_color_size_example() {
    let mut df = create_color_size_dataframe();

    transform(&mut df, &config(r#"{"categorical": ["color"]}"#)).unwrap();

    assert_eq!(column_names(&df), vec!["color", "size"]);
    assert_eq!(i64_values(&df, "color"), vec![Some(0), Some(1), Some(0)]);
    assert_eq!(i64_values(&df, "size"), vec![Some(10), Some(20), Some(30)]);
}

#[test]
fn test_color_size_sorted_example() {
    let mut df = create_color_size_dataframe();

    transform(
        &mut df,
        &config(r#"{"categorical": ["color"], "encoding": "sorted"}"#),
    )
    .unwrap();

    // blue < red
    assert_eq!(i64_values(&df, "color"), vec![Some(1), Some(0), Some(1)]);
}

#[test]
fn test_empty_config_preserves_shape_and_order() {
    let mut df = create_mixed_dataframe();
    let names = column_names(&df);

    transform(&mut df, &TransformConfig::default()).unwrap();

    assert_shape(&df, 5, 6);
    assert_eq!(column_names(&df), names);
    assert_all_numeric(&df, &[]);
}

#[test]
fn test_mixed_table_actions() {
    let mut df = create_mixed_dataframe();

    let report = transform(&mut df, &config(r#"{"exclude": ["id"]}"#)).unwrap();

    let action = |name: &str| report.outcome(name).unwrap().action;
    assert_eq!(action("id"), ColumnAction::Excluded);
    assert_eq!(action("city"), ColumnAction::Encoded);
    assert_eq!(action("score"), ColumnAction::Unchanged);
    assert_eq!(action("count"), ColumnAction::Unchanged);
    assert_eq!(action("active"), ColumnAction::Cast);
    assert_eq!(action("amount"), ColumnAction::Parsed);

    assert_eq!(df.column("id").unwrap().dtype(), &DataType::String);
    assert_all_numeric(&df, &["id"]);
    assert_eq!(
        i64_values(&df, "city"),
        vec![Some(0), Some(1), None, Some(0), Some(2)]
    );
    assert_eq!(
        f64_values(&df, "amount"),
        vec![Some(1.25), Some(2.0), Some(3.5), Some(4.0), Some(5.0)]
    );
}

#[test]
fn test_idempotence() {
    let configs = [
        "{}",
        r#"{"categorical": ["city", "count"]}"#,
        r#"{"categorical": ["city"], "encoding": "sorted", "fill_value": -1}"#,
        r#"{"exclude": ["id"], "missing": "mean", "categorical": ["city"]}"#,
        r#"{"exclude": ["id"], "missing": "median", "categorical": ["city", "active"]}"#,
        r#"{"fill_value": -9, "na_values": ["Oslo"]}"#,
        r#"{"categorical": ["city"], "fill_value": 0.5}"#,
        r#"{"categorical": ["city"], "fill_value": 3}"#,
        r#"{"missing": "mean", "exclude": ["city"]}"#,
    ];

    for json in configs {
        let cfg = config(json);
        let mut df = create_mixed_dataframe();

        transform(&mut df, &cfg).unwrap();
        let once = df.clone();
        transform(&mut df, &cfg).unwrap();

        assert!(
            df.equals_missing(&once),
            "Second transform changed the table for config {}",
            json
        );
    }
}

#[test]
fn test_sentinel_matching_a_code_is_rejected() {
    for json in [
        r#"{"categorical": ["city"], "missing": "zero"}"#,
        r#"{"categorical": ["city"], "fill_value": 1}"#,
    ] {
        let mut df = create_mixed_dataframe();
        let before = df.clone();

        let err = transform(&mut df, &config(json)).unwrap_err();

        match err {
            PipelineError::Transform { column, message } => {
                assert_eq!(column, "city", "config {}", json);
                assert!(message.contains("collides"), "unexpected message: {}", message);
            }
            other => panic!("Expected Transform error for {}, got {:?}", json, other),
        }
        assert!(df.equals_missing(&before));
    }
}

#[test]
fn test_sentinel_matching_a_code_rejected_without_nulls() {
    // Rejected even with no nulls to fill
    let mut df = create_color_size_dataframe();

    let err = transform(&mut df, &config(r#"{"categorical": ["color"], "missing": "zero"}"#))
        .unwrap_err();

    assert!(matches!(err, PipelineError::Transform { .. }));
}

#[test]
fn test_statistic_fill_on_auto_coded_nulls_is_config_error() {
    for strategy in ["mean", "median"] {
        let mut df = create_mixed_dataframe();
        let before = df.clone();
        let json = format!(r#"{{"exclude": ["id"], "missing": "{}"}}"#, strategy);

        let err = transform(&mut df, &config(&json)).unwrap_err();

        assert!(matches!(err, PipelineError::Config(_)));
        assert!(err.to_string().contains("city"));
        assert!(df.equals_missing(&before));
    }
}

#[test]
fn test_second_run_reports_no_changes() {
    let cfg = config(r#"{"exclude": ["id"], "fill_value": -1}"#);
    let mut df = create_mixed_dataframe();

    transform(&mut df, &cfg).unwrap();
    let report = transform(&mut df, &cfg).unwrap();

    assert!(report.columns.iter().all(|c| !c.changed()));
}

#[test]
fn test_determinism() {
    let cfg = config(r#"{"categorical": ["label"]}"#);

    let mut first = create_random_categorical_dataframe(500, 12, 7);
    let mut second = create_random_categorical_dataframe(500, 12, 7);
    let first_report = transform(&mut first, &cfg).unwrap();
    let second_report = transform(&mut second, &cfg).unwrap();

    assert!(first.equals_missing(&second));
    assert_eq!(first_report, second_report);
}

#[test]
fn test_injectivity() {
    for order in ["ordinal", "sorted"] {
        let original = create_random_categorical_dataframe(1_000, 25, 42);
        let mut df = original.clone();
        let cfg = config(&format!(
            r#"{{"categorical": ["label"], "encoding": "{}"}}"#,
            order
        ));

        transform(&mut df, &cfg).unwrap();

        let labels: Vec<Option<String>> = original
            .column("label")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        let codes = i64_values(&df, "label");

        let mut value_to_code: HashMap<String, i64> = HashMap::new();
        let mut code_to_value: HashMap<i64, String> = HashMap::new();
        for (label, code) in labels.iter().zip(codes.iter()) {
            match (label, code) {
                (Some(label), Some(code)) => {
                    let seen = value_to_code.entry(label.clone()).or_insert(*code);
                    assert_eq!(seen, code, "value '{}' got two codes", label);
                    let seen = code_to_value.entry(*code).or_insert_with(|| label.clone());
                    assert_eq!(seen, label, "code {} used for two values", code);
                }
                (None, None) => {}
                other => panic!("null handling mismatch: {:?}", other),
            }
        }

        // Codes are dense: 0..n
        let mut used: Vec<i64> = code_to_value.keys().copied().collect();
        used.sort();
        assert_eq!(used, (0..used.len() as i64).collect::<Vec<_>>());
    }
}

#[test]
fn test_first_seen_order_follows_rows() {
    let mut df = df! { "grade" => ["C", "A", "B", "A", "C"] }.unwrap();

    let report = transform(&mut df, &TransformConfig::default()).unwrap();

    assert_eq!(
        i64_values(&df, "grade"),
        vec![Some(0), Some(1), Some(2), Some(1), Some(0)]
    );
    assert_eq!(
        report.outcome("grade").unwrap().categories.as_ref().unwrap(),
        &vec!["C".to_string(), "A".to_string(), "B".to_string()]
    );
}

#[test]
fn test_sorted_numeric_categories_use_numeric_order() {
    let mut df = df! { "code" => [100i64, 9, 25, 9] }.unwrap();
    let cfg = TransformConfig {
        categorical: vec!["code".to_string()],
        encoding: EncodingOrder::Sorted,
        ..Default::default()
    };

    transform(&mut df, &cfg).unwrap();

    assert_eq!(i64_values(&df, "code"), vec![Some(2), Some(0), Some(1), Some(0)]);
}

#[test]
fn test_unknown_column_is_config_error_and_table_unmodified() {
    let mut df = create_color_size_dataframe();
    let before = df.clone();

    let err = transform(&mut df, &config(r#"{"categorical": ["shape"]}"#)).unwrap_err();

    assert!(matches!(err, PipelineError::Config(_)));
    assert!(err.to_string().contains("shape"));
    assert!(df.equals_missing(&before));
}

#[test]
fn test_unknown_exclude_column_is_config_error() {
    let mut df = create_color_size_dataframe();

    let err = transform(&mut df, &config(r#"{"exclude": ["weight"]}"#)).unwrap_err();

    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn test_invalid_missing_combination_is_config_error() {
    let mut df = create_color_size_dataframe();
    let before = df.clone();

    let err = transform(&mut df, &config(r#"{"missing": "constant"}"#)).unwrap_err();

    assert!(matches!(err, PipelineError::Config(_)));
    assert!(df.equals_missing(&before));
}

#[test]
fn test_auto_categorical_disabled() {
    let mut df = create_color_size_dataframe();
    let before = df.clone();

    let err = transform(&mut df, &config(r#"{"auto_categorical": false}"#)).unwrap_err();

    match err {
        PipelineError::Transform { column, message } => {
            assert_eq!(column, "color");
            assert!(message.contains("red"));
        }
        other => panic!("Expected Transform error, got {:?}", other),
    }
    assert!(df.equals_missing(&before));
}

#[test]
fn test_auto_categorical_disabled_allows_listed_columns() {
    let mut df = create_color_size_dataframe();

    let result = transform(
        &mut df,
        &config(r#"{"auto_categorical": false, "categorical": ["color"]}"#),
    );

    assert!(result.is_ok());
}

#[test]
fn test_constant_fill_everywhere() {
    let mut df = create_mixed_dataframe();

    let report = transform(&mut df, &config(r#"{"exclude": ["id"], "fill_value": -1}"#)).unwrap();

    assert_eq!(
        i64_values(&df, "city"),
        vec![Some(0), Some(1), Some(-1), Some(0), Some(2)]
    );
    assert_eq!(
        f64_values(&df, "score"),
        vec![Some(1.0), Some(-1.0), Some(3.0), Some(4.0), Some(7.0)]
    );
    assert_eq!(df.column("count").unwrap().dtype(), &DataType::Int64);
    assert_eq!(
        i64_values(&df, "count"),
        vec![Some(3), Some(1), Some(4), Some(-1), Some(1)]
    );
    assert_eq!(report.total_filled(), 3);
}

#[test]
fn test_mean_fill_skips_encoded_columns() {
    let mut df = create_mixed_dataframe();

    transform(
        &mut df,
        &config(r#"{"exclude": ["id"], "categorical": ["city"], "missing": "mean"}"#),
    )
    .unwrap();

    // (1 + 3 + 4 + 7) / 4
    assert_eq!(f64_values(&df, "score")[1], Some(3.75));
    // (3 + 1 + 4 + 1) / 4
    assert_eq!(f64_values(&df, "count")[3], Some(2.25));
    assert_eq!(i64_values(&df, "city")[2], None);
}

#[test]
fn test_median_fill() {
    let mut df = create_mixed_dataframe();

    transform(
        &mut df,
        &config(r#"{"exclude": ["id"], "categorical": ["city"], "missing": "median"}"#),
    )
    .unwrap();

    assert_eq!(f64_values(&df, "score")[1], Some(3.5));
    assert_eq!(f64_values(&df, "count")[3], Some(2.0));
}

#[test]
fn test_na_values_become_missing_before_parsing() {
    let mut df = df! { "reading" => ["1", "n/a", "3", "-"] }.unwrap();

    let report = transform(
        &mut df,
        &config(r#"{"na_values": ["n/a", "-"], "missing": "zero"}"#),
    )
    .unwrap();

    assert_eq!(report.outcome("reading").unwrap().action, ColumnAction::Parsed);
    assert_eq!(
        i64_values(&df, "reading"),
        vec![Some(1), Some(0), Some(3), Some(0)]
    );
    assert_eq!(report.outcome("reading").unwrap().nulls_marked, 2);
    assert_eq!(report.outcome("reading").unwrap().nulls_filled, 2);
}

#[test]
fn test_all_null_text_column_becomes_float() {
    let mut df = df! {
        "empty" => [None::<&str>, None, None],
        "x" => [1i64, 2, 3],
    }
    .unwrap();

    transform(&mut df, &TransformConfig::default()).unwrap();

    assert_eq!(df.column("empty").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("empty").unwrap().null_count(), 3);
}

#[test]
fn test_date_column_cast_to_days() {
    let dates = Column::new("day".into(), [0i32, 1, 365])
        .cast(&DataType::Date)
        .unwrap();
    let mut df = DataFrame::new(vec![dates]).unwrap();

    let report = transform(&mut df, &TransformConfig::default()).unwrap();

    assert_eq!(report.outcome("day").unwrap().action, ColumnAction::Cast);
    assert_eq!(i64_values(&df, "day"), vec![Some(0), Some(1), Some(365)]);
}
