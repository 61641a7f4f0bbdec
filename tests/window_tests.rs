use tessera_core::{ColumnType, Error, SortKey, Value};
use tessera_operators::{
    aggregates, extend_window_agg, extend_window_func, ranking, Bound, DurationUnit, Frame, Window,
};
use tessera_tds::{ColumnData, Table, TableBuilder};

fn int_col(values: &[i64]) -> ColumnData {
    ColumnData::Int(values.iter().map(|&v| Some(v)).collect())
}

fn str_col(values: &[&str]) -> ColumnData {
    ColumnData::Str(values.iter().map(|s| Some(s.to_string())).collect())
}

fn single_column(values: &[i64]) -> Table {
    let mut b = TableBuilder::new();
    b.add_column("v", int_col(values)).unwrap();
    b.finish()
}

fn column(table: &Table, name: &str) -> Vec<Value> {
    let col = table.column(name).expect("column");
    (0..table.row_count()).map(|r| col.value(r)).collect()
}

fn ints(table: &Table, name: &str) -> Vec<i64> {
    column(table, name)
        .into_iter()
        .map(|v| match v {
            Value::Int(i) => i,
            other => panic!("expected integer, got {other:?}"),
        })
        .collect()
}

#[test]
fn rows_frame_clamps_at_partition_boundaries() {
    let table = single_column(&[1, 2, 3, 4, 5]);
    let frame = Frame::Rows {
        from: Bound::Offset(-1),
        to: Bound::Offset(1),
    };
    let window = Window::new(vec![], vec![SortKey::asc("v")], Some(frame));
    let out = extend_window_agg(
        &table,
        &window,
        &aggregates::sum("v", "total", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(ints(&out, "total"), vec![3, 6, 9, 12, 9]);
}

#[test]
fn default_frame_is_cumulative_when_sorted() {
    let table = single_column(&[10, 30, 5, 20]);
    let window = Window::new(vec![], vec![SortKey::asc("v")], None);
    let out = extend_window_agg(
        &table,
        &window,
        &aggregates::sum("v", "running", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(ints(&out, "v"), vec![5, 10, 20, 30]);
    assert_eq!(ints(&out, "running"), vec![5, 15, 35, 65]);
}

#[test]
fn default_frame_is_whole_partition_without_sort_keys() {
    let mut b = TableBuilder::new();
    b.add_column("dept", str_col(&["A", "A", "B"])).unwrap();
    b.add_column("salary", int_col(&[10, 20, 5])).unwrap();
    let window = Window::new(vec!["dept".into()], vec![], None);
    let out = extend_window_agg(
        &b.finish(),
        &window,
        &aggregates::sum("salary", "dept_total", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(ints(&out, "dept_total"), vec![30, 30, 5]);
}

#[test]
fn range_frame_narrows_by_ordering_value() {
    let table = single_column(&[1, 2, 4, 7, 8]);
    let frame = Frame::Range {
        from: Bound::Offset(-2),
        to: Bound::Offset(0),
    };
    let window = Window::new(vec![], vec![SortKey::asc("v")], Some(frame));
    let out = extend_window_agg(
        &table,
        &window,
        &aggregates::sum("v", "total", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(ints(&out, "total"), vec![1, 3, 6, 7, 15]);
}

#[test]
fn range_frame_includes_peers() {
    // Equal ordering values share a frame regardless of row position.
    let table = single_column(&[1, 2, 2, 3]);
    let frame = Frame::Range {
        from: Bound::Offset(0),
        to: Bound::Offset(0),
    };
    let window = Window::new(vec![], vec![SortKey::asc("v")], Some(frame));
    let out = extend_window_agg(&table, &window, &aggregates::count("peers")).unwrap();
    assert_eq!(ints(&out, "peers"), vec![1, 2, 2, 1]);
    let out = extend_window_agg(
        &table,
        &window,
        &aggregates::sum("v", "total", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(ints(&out, "total"), vec![1, 4, 4, 3]);
}

#[test]
fn range_interval_frame_scales_by_unit() {
    // Timestamps in seconds: 0h, 12h, 24h, 72h.
    let table = single_column(&[0, 43_200, 86_400, 259_200]);
    let frame = Frame::RangeInterval {
        from: Bound::IntervalOffset(-1, DurationUnit::Days),
        to: Bound::IntervalOffset(0, DurationUnit::Days),
    };
    let window = Window::new(vec![], vec![SortKey::asc("v")], Some(frame));
    let out = extend_window_agg(&table, &window, &aggregates::count("n")).unwrap();
    assert_eq!(ints(&out, "n"), vec![1, 2, 3, 1]);
}

#[test]
fn range_frame_with_null_ordering_values() {
    // Nulls sort first; a null current value widens to the whole partition,
    // while null rows join other rows' frames only through unbounded sides.
    let mut b = TableBuilder::new();
    b.add_column("v", ColumnData::Int(vec![None, Some(1), Some(2)]))
        .unwrap();
    let frame = Frame::Range {
        from: Bound::Offset(-1),
        to: Bound::Offset(0),
    };
    let window = Window::new(vec![], vec![SortKey::asc("v")], Some(frame));
    let out = extend_window_agg(
        &b.finish(),
        &window,
        &aggregates::sum("v", "total", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(
        column(&out, "v"),
        vec![Value::Null, Value::Int(1), Value::Int(2)]
    );
    assert_eq!(
        column(&out, "total"),
        vec![Value::Int(3), Value::Int(1), Value::Int(3)]
    );
}

#[test]
fn descending_range_frame_with_nulls_sorts_them_last() {
    let mut b = TableBuilder::new();
    b.add_column("v", ColumnData::Int(vec![Some(3), None, Some(1)]))
        .unwrap();
    let frame = Frame::Range {
        from: Bound::Offset(-2),
        to: Bound::Offset(0),
    };
    let window = Window::new(vec![], vec![SortKey::desc("v")], Some(frame));
    let out = extend_window_agg(
        &b.finish(),
        &window,
        &aggregates::sum("v", "total", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(
        column(&out, "v"),
        vec![Value::Int(3), Value::Int(1), Value::Null]
    );
    // Offsets reach back toward earlier (larger) values under Desc.
    assert_eq!(
        column(&out, "total"),
        vec![Value::Int(3), Value::Int(4), Value::Int(4)]
    );
}

#[test]
fn rows_frame_rejects_interval_offsets() {
    let table = single_column(&[1, 2]);
    let frame = Frame::Rows {
        from: Bound::IntervalOffset(-1, DurationUnit::Hours),
        to: Bound::Offset(0),
    };
    let window = Window::new(vec![], vec![SortKey::asc("v")], Some(frame));
    let err = extend_window_agg(&table, &window, &aggregates::count("n")).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[test]
fn range_frame_requires_one_numeric_sort_key() {
    let mut b = TableBuilder::new();
    b.add_column("name", str_col(&["a", "b"])).unwrap();
    b.add_column("v", int_col(&[1, 2])).unwrap();
    let table = b.finish();
    let frame = Frame::Range {
        from: Bound::Offset(-1),
        to: Bound::Offset(0),
    };

    let window = Window::new(vec![], vec![SortKey::asc("name")], Some(frame));
    let err = extend_window_agg(&table, &window, &aggregates::count("n")).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));

    let window = Window::new(
        vec![],
        vec![SortKey::asc("v"), SortKey::asc("name")],
        Some(frame),
    );
    let err = extend_window_agg(&table, &window, &aggregates::count("n")).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[test]
fn ranking_functions_over_ties() {
    let table = single_column(&[20, 10, 30, 20]);
    let window = Window::new(vec![], vec![SortKey::asc("v")], None);

    let out = extend_window_func(&table, &window, "rn", ColumnType::Int, ranking::row_number())
        .unwrap();
    assert_eq!(ints(&out, "rn"), vec![1, 2, 3, 4]);

    let out = extend_window_func(&table, &window, "rk", ColumnType::Int, ranking::rank()).unwrap();
    assert_eq!(ints(&out, "rk"), vec![1, 2, 2, 4]);

    let out =
        extend_window_func(&table, &window, "dr", ColumnType::Int, ranking::dense_rank()).unwrap();
    assert_eq!(ints(&out, "dr"), vec![1, 2, 2, 3]);
}

#[test]
fn percent_rank_and_cumulative_distribution_over_ties() {
    let table = single_column(&[10, 20, 20, 30]);
    let window = Window::new(vec![], vec![SortKey::asc("v")], None);

    let out =
        extend_window_func(&table, &window, "pr", ColumnType::Float, ranking::percent_rank())
            .unwrap();
    assert_eq!(
        column(&out, "pr"),
        vec![
            Value::Float(0.0),
            Value::Float(1.0 / 3.0),
            Value::Float(1.0 / 3.0),
            Value::Float(1.0)
        ]
    );

    let out = extend_window_func(
        &table,
        &window,
        "cd",
        ColumnType::Float,
        ranking::cumulative_distribution(),
    )
    .unwrap();
    assert_eq!(
        column(&out, "cd"),
        vec![
            Value::Float(0.25),
            Value::Float(0.5),
            Value::Float(0.5),
            Value::Float(1.0)
        ]
    );
}

#[test]
fn percent_rank_of_single_row_partition_is_zero() {
    let mut b = TableBuilder::new();
    b.add_column("p", str_col(&["a", "b", "b"])).unwrap();
    b.add_column("v", int_col(&[5, 1, 2])).unwrap();
    let window = Window::new(vec!["p".into()], vec![SortKey::asc("v")], None);
    let out = extend_window_func(
        &b.finish(),
        &window,
        "pr",
        ColumnType::Float,
        ranking::percent_rank(),
    )
    .unwrap();
    assert_eq!(
        column(&out, "pr"),
        vec![Value::Float(0.0), Value::Float(0.0), Value::Float(1.0)]
    );
}

#[test]
fn ntile_buckets_by_position() {
    let table = single_column(&[1, 2, 3, 4]);
    let window = Window::new(vec![], vec![SortKey::asc("v")], None);
    let out =
        extend_window_func(&table, &window, "tile", ColumnType::Int, ranking::ntile(2)).unwrap();
    assert_eq!(ints(&out, "tile"), vec![1, 1, 2, 2]);

    let err =
        extend_window_func(&table, &window, "tile2", ColumnType::Int, ranking::ntile(0))
            .unwrap_err();
    assert!(matches!(err, Error::Eval { .. }));
}

#[test]
fn nth_reads_from_the_frame_extent() {
    // Cumulative default frame: row i sees rows [0, i] of its partition.
    let table = single_column(&[5, 10, 20, 30]);
    let window = Window::new(vec![], vec![SortKey::asc("v")], None);
    let out = extend_window_func(
        &table,
        &window,
        "second",
        ColumnType::Int,
        ranking::nth("v", 2),
    )
    .unwrap();
    assert_eq!(
        column(&out, "second"),
        vec![Value::Null, Value::Int(10), Value::Int(10), Value::Int(10)]
    );
}

#[test]
fn lead_and_lag_respect_partition_edges() {
    let mut b = TableBuilder::new();
    b.add_column("dept", str_col(&["A", "A", "B"])).unwrap();
    b.add_column("v", int_col(&[1, 2, 3])).unwrap();
    let table = b.finish();
    let window = Window::new(vec!["dept".into()], vec![SortKey::asc("v")], None);

    let out = extend_window_func(
        &table,
        &window,
        "next",
        ColumnType::Int,
        ranking::lead("v", 1, Value::Null),
    )
    .unwrap();
    assert_eq!(
        column(&out, "next"),
        vec![Value::Int(2), Value::Null, Value::Null]
    );

    let out = extend_window_func(
        &table,
        &window,
        "prev",
        ColumnType::Int,
        ranking::lag("v", 1, Value::Int(0)),
    )
    .unwrap();
    assert_eq!(
        column(&out, "prev"),
        vec![Value::Int(0), Value::Int(1), Value::Int(0)]
    );
}

#[test]
fn empty_rows_frame_aggregates_to_null() {
    let table = single_column(&[1, 2, 3]);
    let frame = Frame::Rows {
        from: Bound::Offset(-2),
        to: Bound::Offset(-1),
    };
    let window = Window::new(vec![], vec![SortKey::asc("v")], Some(frame));
    let out = extend_window_agg(
        &table,
        &window,
        &aggregates::sum("v", "behind", ColumnType::Int),
    )
    .unwrap();
    assert_eq!(
        column(&out, "behind"),
        vec![Value::Null, Value::Int(1), Value::Int(3)]
    );
}

#[test]
fn window_plan_types_round_trip_through_serde() {
    let window = Window::new(
        vec!["dept".into()],
        vec![SortKey::desc("salary")],
        Some(Frame::RangeInterval {
            from: Bound::IntervalOffset(-7, DurationUnit::Days),
            to: Bound::Offset(0),
        }),
    );
    let json = serde_json::to_string(&window).unwrap();
    let back: Window = serde_json::from_str(&json).unwrap();
    assert_eq!(back, window);
}
