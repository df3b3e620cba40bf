use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use frame_difference::capture::{FrameSource, SequenceConfig, SyntheticSource};
use frame_difference::{FrameDifferenceModel, FOREGROUND_LABEL};

fn sequence(width: u32, height: u32, frames: usize) -> Vec<Vec<u8>> {
    let config = SequenceConfig {
        noise: 8,
        ..SequenceConfig::with_dimensions(width, height)
    };
    let mut source = SyntheticSource::new();
    source.open(&config).expect("valid config");
    (0..frames)
        .map(|_| source.next_frame().expect("open source").pixels().to_vec())
        .collect()
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    for &(w, h) in &[(320u32, 240u32), (1280, 720)] {
        let frames = sequence(w, h, 4);
        let mut model = FrameDifferenceModel::new();
        model.initialize(&frames[0], w, h).expect("initialize");

        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &frames, |b, frames| {
            let mut i = 1;
            b.iter(|| {
                model.ingest(black_box(&frames[i])).expect("ingest");
                i = i % 3 + 1;
            });
        });
    }
    group.finish();
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    for &(w, h) in &[(320u32, 240u32), (1280, 720)] {
        let frames = sequence(w, h, 3);
        let mut model = FrameDifferenceModel::new();
        model.initialize(&frames[0], w, h).expect("initialize");
        model.ingest(&frames[1]).expect("ingest");
        model.ingest(&frames[2]).expect("ingest");

        let pixels = (w * h) as usize;
        let mut segmentation = vec![FOREGROUND_LABEL; pixels];
        let mut indicator = vec![0u8; pixels];

        group.bench_function(BenchmarkId::from_parameter(format!("{w}x{h}")), |b| {
            b.iter(|| {
                segmentation.fill(FOREGROUND_LABEL);
                model
                    .compute(black_box(&mut segmentation), black_box(&mut indicator))
                    .expect("compute")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ingest, bench_compute);
criterion_main!(benches);
