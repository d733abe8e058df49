use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use procwatch::system::process::{ProcessSnapshot, ProcessState};
use procwatch::table::{ProcessTable, SortMode};
use procwatch::ui::table_widget;
use procwatch::ui::theme::Theme;

const SIZES: [usize; 3] = [500, 1000, 2000];

fn make_processes(n: usize) -> Arc<Vec<ProcessSnapshot>> {
    Arc::new(
        (0..n)
            .map(|i| ProcessSnapshot {
                pid: i as u32 + 1,
                name: format!("proc_{i}"),
                state: if i % 7 == 0 {
                    ProcessState::Running
                } else {
                    ProcessState::Sleeping
                },
                cpu_percent: (i % 100) as f32,
                memory_mb: ((n - i) as f64 + 1.0) * 1.5,
                start_time: 1_700_000_000 - i as u64,
            })
            .collect(),
    )
}

fn bench_set_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_set_snapshot_500_1000_2000");

    for size in SIZES {
        let snapshot = make_processes(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            let mut table = ProcessTable::new(50, SortMode::Cpu);
            b.iter(|| {
                table.set_snapshot(black_box(Arc::clone(snapshot)));
                black_box(table.total_rows());
            })
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_search_500_1000_2000");

    for size in SIZES {
        let mut table = ProcessTable::new(50, SortMode::Name);
        table.set_snapshot(make_processes(size));
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                table.set_query(black_box("proc_1"));
                black_box(table.total_rows());
            })
        });
    }

    group.finish();
}

fn bench_table_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_widget_render_500_1000_2000");
    let theme = Theme::dark();

    for size in SIZES {
        let mut table = ProcessTable::new(50, SortMode::Cpu);
        table.set_snapshot(make_processes(size));

        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| {
                let backend = TestBackend::new(160, 50);
                let mut terminal = Terminal::new(backend).expect("bench terminal init failed");
                terminal
                    .draw(|frame| {
                        table_widget::render(
                            frame,
                            Rect::new(0, 0, 160, 50),
                            black_box(table),
                            1_700_000_000,
                            &theme,
                        );
                    })
                    .expect("bench draw failed");
                black_box(terminal.backend());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_set_snapshot, bench_search, bench_table_render);
criterion_main!(benches);
