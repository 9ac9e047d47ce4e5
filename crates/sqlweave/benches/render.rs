use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::prelude::*;
use sqlweave::{SelectStatement, UpdateStatement};

fn table_with_columns(n: usize) -> (Table, Vec<Column>) {
    let table = Table::new("t").unwrap();
    let columns = (0..n)
        .map(|i| table.column(&format!("col{i}")).unwrap())
        .collect();
    (table, columns)
}

/// SELECT col0, col1, ... FROM t WHERE col0 = 0 AND col1 = 1 ...
fn build_select(table: &Table, columns: &[Column]) -> SelectStatement {
    let conditions = columns
        .iter()
        .enumerate()
        .map(|(i, c)| c.eq(i as i64))
        .collect();
    qb::select()
        .columns(columns)
        .unwrap()
        .from([table])
        .unwrap()
        .filter(Expr::and(conditions))
        .unwrap()
}

fn bench_build_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/build_select");

    for n in [1, 5, 10, 50] {
        let (table, columns) = table_with_columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(build_select(&table, &columns)));
        });
    }

    group.finish();
}

fn bench_render_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/to_sql");
    let pg = Backend::postgres();
    let config = RenderConfig::new().parameterize_literals();

    for n in [1, 5, 10, 50] {
        let (table, columns) = table_with_columns(n);
        let stmt = build_select(&table, &columns);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.build_with(&pg, &config).unwrap()));
        });
    }

    group.finish();
}

fn bench_dynamic_adds(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/dynamic_add_assignment");
    let pg = Backend::postgres();

    for n in [5, 20, 100] {
        let (table, columns) = table_with_columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &columns, |b, columns| {
            b.iter(|| {
                let mut stmt: UpdateStatement = qb::dynamic_update(&pg, &table)
                    .dynamic_set(None)
                    .unwrap()
                    .unconditionally()
                    .unwrap();
                for col in columns {
                    stmt.add_assignment(col.to(1)).unwrap();
                }
                black_box(stmt.to_sql(&pg).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_select,
    bench_render_select,
    bench_dynamic_adds
);
criterion_main!(benches);
