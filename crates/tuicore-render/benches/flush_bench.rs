use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tuicore_pen::PenValue;
use tuicore_render::RenderBuffer;
use tuicore_terminal::RecordingDriver;

const DIMENSIONS: &[(u32, u32)] = &[(24, 80), (40, 120), (100, 200)];

fn fill_fraction(buf: &mut RenderBuffer, lines: u32, cols: u32, fraction: u32) {
    let pen = PenValue::new();
    for line in 0..lines {
        for col in 0..cols {
            if (line * cols + col) % 100 < fraction {
                buf.char_at(line as i64, col as i64, 'X', pen);
            }
        }
    }
}

fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("RenderBuffer Flush");

    for &(lines, cols) in DIMENSIONS {
        for fraction in [0u32, 10, 100] {
            group.bench_with_input(
                BenchmarkId::new(format!("{fraction}pct painted"), format!("{lines}x{cols}")),
                &(lines, cols, fraction),
                |b, &(lines, cols, fraction)| {
                    b.iter_batched(
                        || {
                            let mut buf = RenderBuffer::new(lines, cols);
                            fill_fraction(&mut buf, lines, cols, fraction);
                            buf
                        },
                        |mut buf| {
                            let mut driver = RecordingDriver::new((lines, cols));
                            black_box(&mut buf).flush(&mut driver);
                            black_box(driver);
                        },
                        criterion::BatchSize::SmallInput,
                    )
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_flush);
criterion_main!(benches);
