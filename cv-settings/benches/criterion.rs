use criterion::{criterion_group, criterion_main, Criterion};
use cv_settings::{
    create_index_params, keys, select_detector, select_extractor, DetectorType, NoAccelerator,
    ParameterStore, Strategy, WindowLayout,
};

fn decode(c: &mut Criterion) {
    let code = DetectorType::Brisk.code();
    c.bench_function("decode_strategy_code", |b| {
        b.iter(|| cv_settings::select::<DetectorType>(&code))
    });
}

fn select(c: &mut Criterion) {
    let mut store = ParameterStore::default();
    store.set(keys::DETECTOR, DetectorType::Orb.code()).unwrap();
    c.bench_function("select_detector", |b| {
        b.iter(|| select_detector(&store, &NoAccelerator).unwrap())
    });
    c.bench_function("select_extractor", |b| {
        b.iter(|| select_extractor(&store, &NoAccelerator).unwrap())
    });
    c.bench_function("create_index_params", |b| {
        b.iter(|| create_index_params(&store))
    });
}

criterion_group!(
    name = strategies;
    config = Criterion::default();
    targets = decode, select
);

fn persistence(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.ini");
    let store = ParameterStore::default();
    c.bench_function("save", |b| {
        b.iter(|| store.save(&path, &WindowLayout::default()).unwrap())
    });
    let mut loaded = ParameterStore::default();
    c.bench_function("load", |b| b.iter(|| loaded.load(&path).unwrap()));
}

criterion_group!(
    name = settings_file;
    config = Criterion::default().sample_size(10);
    targets = persistence
);

criterion_main!(strategies, settings_file);
