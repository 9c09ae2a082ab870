//! Benchmarks for geo crate primitives.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nearby_geo::{
    bearing_degrees, encode_polyline, haversine_distance, parse_postgis_point, BoundingBox,
    Coordinate,
};
use serde_json::json;

fn grid(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            // Points in a grid around Riyadh
            let lat = 24.0 + (i as f64 * 0.01) % 2.0;
            let lng = 46.0 + (i as f64 * 0.01) % 2.0;
            Coordinate::new(lat, lng).unwrap()
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let riyadh = Coordinate::new(24.7116, 46.6846).unwrap();
    let jeddah = Coordinate::new(21.6231, 39.1104).unwrap();

    c.bench_function("haversine_single", |b| {
        b.iter(|| haversine_distance(black_box(&riyadh), black_box(&jeddah)))
    });
    c.bench_function("bearing_single", |b| {
        b.iter(|| bearing_degrees(black_box(&riyadh), black_box(&jeddah)))
    });
}

fn bench_bbox_vs_haversine(c: &mut Criterion) {
    let center = Coordinate::new(24.7136, 46.6753).unwrap();
    let points = grid(10_000);
    let bbox = BoundingBox::around(&center, 10.0);

    let mut group = c.benchmark_group("radius_filter");
    group.bench_function("bbox_contains", |b| {
        b.iter(|| points.iter().filter(|p| bbox.contains(black_box(p))).count())
    });
    group.bench_function("haversine_only", |b| {
        b.iter(|| {
            points
                .iter()
                .filter(|p| haversine_distance(&center, black_box(p)) <= 10.0)
                .count()
        })
    });
    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let path = grid(500);
    let geojson = json!({"type": "Point", "coordinates": [46.6753, 24.7136]});
    let wkt = json!("POINT(46.6753 24.7136)");

    let mut group = c.benchmark_group("encoding");
    group.bench_function("polyline_500", |b| b.iter(|| encode_polyline(black_box(&path), 5)));
    group.bench_function("postgis_geojson", |b| {
        b.iter(|| parse_postgis_point(black_box(&geojson)))
    });
    group.bench_function("postgis_wkt", |b| b.iter(|| parse_postgis_point(black_box(&wkt))));
    group.finish();
}

criterion_group!(benches, bench_single_distance, bench_bbox_vs_haversine, bench_encoding);
criterion_main!(benches);
