use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use dotex_core::{ColorValue, StimulusSpec};
use dotex_render::{render_stimulus, Renderer as _, SkiaRenderer};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn harness() -> (SkiaRenderer, StdRng) {
    let mut r = SkiaRenderer::new();
    r.attach("situation", 600, 400).unwrap();
    (r, StdRng::seed_from_u64(40))
}

pub fn bench_trial_draw(c: &mut Criterion) {
    let mut g = c.benchmark_group("trial_draw");
    g.sample_size(40);

    for total in [5usize, 100] {
        let spec =
            StimulusSpec::new(total, total / 3, ColorValue::BLACK, ColorValue::WHITE).unwrap();
        g.bench_function(format!("clear_and_draw_{total}"), |b| {
            b.iter_batched(
                harness,
                |(mut r, mut rng)| {
                    r.clear("situation").unwrap();
                    let stats = render_stimulus(&mut r, "situation", black_box(&spec), &mut rng);
                    black_box(stats.map(|s| s.points))
                },
                BatchSize::SmallInput,
            )
        });
    }

    g.finish();
}

criterion_group!(benches, bench_trial_draw);
criterion_main!(benches);
