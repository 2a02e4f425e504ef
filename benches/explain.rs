use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fertilizer_advisor::{
    AdvisoryTable, CategoryCodec, CategoryDomain, CodecSet, ExplanationGenerator, FeatureProfiles, ForestConfig,
    MarkdownFormatter, Observation, PredictionOracle, RandomForest,
};

/// Deterministic pseudo-data: three fertilizers keyed off nitrogen / phosphorous
fn synthetic_rows(n: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
    (0..n)
        .map(|i| {
            let t = 20.0 + (i % 17) as f64;
            let h = 40.0 + (i % 31) as f64;
            let m = 25.0 + (i % 37) as f64;
            let soil = (i % 5) as f64;
            let crop = (i % 11) as f64;
            let n_val = (i * 7 % 43) as f64;
            let k = (i % 20) as f64;
            let p = (i * 13 % 42) as f64;
            let label = if n_val > 30.0 { 0 } else if p > 20.0 { 1 } else { 2 };
            (vec![t, h, m, soil, crop, n_val, k, p], label)
        })
        .unzip()
}

fn observation() -> Observation {
    Observation {
        temperature: 26.0,
        humidity: 52.0,
        moisture: 38.0,
        soil_type: "Sandy".to_string(),
        crop_type: "Maize".to_string(),
        nitrogen: 37.0,
        potassium: 0.0,
        phosphorous: 0.0,
    }
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);

    for size in [100, 1_000].iter() {
        let (x, y) = synthetic_rows(*size);
        let config = ForestConfig { n_trees: 50, ..ForestConfig::default() };
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| RandomForest::fit(black_box(&x), black_box(&y), 3, &config));
        });
    }
    group.finish();
}

fn bench_predict_and_explain(c: &mut Criterion) {
    let (x, y) = synthetic_rows(1_000);
    let forest = RandomForest::fit(&x, &y, 3, &ForestConfig::default());
    let profiles = FeatureProfiles::from_columns(|feature| {
        x.iter().map(|row| row[feature.feature().index()]).collect()
    })
    .unwrap();
    let codecs = CodecSet {
        soil: CategoryCodec::fit(CategoryDomain::Soil, ["Black", "Clayey", "Loamy", "Red", "Sandy"]),
        crop: CategoryCodec::fit(CategoryDomain::Crop, ["Maize", "Wheat"]),
        fertilizer: CategoryCodec::fit(CategoryDomain::Fertilizer, ["DAP", "Urea", "28-28"]),
    };
    let advisories = AdvisoryTable::default();
    let obs = observation();
    let features = obs.encode(&codecs).unwrap();

    c.bench_function("forest_predict", |b| {
        b.iter(|| forest.predict(black_box(&features)).unwrap());
    });

    c.bench_function("explain_markdown", |b| {
        b.iter(|| {
            let explanation = ExplanationGenerator::explain(
                black_box(&obs),
                &profiles,
                "Sandy",
                "Maize",
                "Urea",
                &advisories,
            );
            MarkdownFormatter::format(&explanation)
        });
    });
}

criterion_group!(benches, bench_fit, bench_predict_and_explain);
criterion_main!(benches);
