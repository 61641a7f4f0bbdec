use criterion::{criterion_group, criterion_main, Criterion};
use tessera::{
    aggregates, extend_window_agg, extend_window_func, group_by, ranking, ColumnData, ColumnType,
    SortKey, Table, TableBuilder, Window,
};

fn make_table(rows: usize) -> Table {
    let mut groups = Vec::with_capacity(rows);
    let mut orders = Vec::with_capacity(rows);
    let mut values = Vec::with_capacity(rows);
    for i in 0..rows {
        groups.push(Some(format!("group-{}", i % 4)));
        orders.push(Some(i as i64));
        values.push(Some((i % 10) as f64));
    }
    let mut b = TableBuilder::new();
    b.add_column("group", ColumnData::Str(groups)).unwrap();
    b.add_column("order", ColumnData::Int(orders)).unwrap();
    b.add_column("value", ColumnData::Float(values)).unwrap();
    b.finish()
}

fn bench_group_by(c: &mut Criterion) {
    let table = make_table(1024);
    let specs = [
        aggregates::count("n"),
        aggregates::sum("value", "total", ColumnType::Float),
    ];
    c.bench_function("group_by_sum", |b| {
        b.iter(|| group_by(&table, &["group"], &specs).unwrap())
    });
}

fn bench_window(c: &mut Criterion) {
    let table = make_table(1024);
    let window = Window::new(vec!["group".into()], vec![SortKey::asc("order")], None);
    let sum = aggregates::sum("value", "running", ColumnType::Float);
    c.bench_function("window_cumulative_sum", |b| {
        b.iter(|| extend_window_agg(&table, &window, &sum).unwrap())
    });

    let row_number = ranking::row_number();
    c.bench_function("window_row_number", |b| {
        b.iter(|| {
            extend_window_func(&table, &window, "row_num", ColumnType::Int, &row_number).unwrap()
        })
    });
}

fn bench_sort(c: &mut Criterion) {
    let table = make_table(1024);
    let keys = [SortKey::desc("value"), SortKey::asc("order")];
    c.bench_function("sort_two_keys", |b| b.iter(|| table.sort_by(&keys).unwrap()));
}

criterion_group!(engine, bench_group_by, bench_window, bench_sort);
criterion_main!(engine);
