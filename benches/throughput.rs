use brrtrecognizer::{
    config::{parse_route_table, TableFormat},
    RouteParams, Router, RuntimeConfig,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn example_routes() -> &'static str {
    r#"
routes:
  - path: /
    handler: { id: root_handler, names: [root] }
  - path: /zoo/animals
    handler: { id: get_animals, names: [animals] }
  - path: /zoo/animals/new
    handler: { id: new_animal, names: [new_animal] }
  - path: /zoo/animals/:id
    handler: { id: get_animal, names: [animal] }
  - path: /zoo/animals/:id/toys/:toy_id
    handler: { id: animal_toy, names: [animal_toy] }
  - path: /zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id
    handler: { id: habitat_section, names: [habitat_section] }
  - path: /inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id
    handler: { id: post_item_batch, names: [post_item_batch] }
  - path: /complex/:a/:b/:c/:d/:e/:f/:g/:h/:i
    handler: { id: complex_many_params, names: [complex_many_params] }
  - path: /archive/:year?/:month?/:day?
    handler: { id: archive, names: [archive] }
  - path: /static/*path
    handler: { id: static_files, names: [static_files] }
"#
}

fn build_router() -> Router {
    let table = parse_route_table(example_routes(), TableFormat::Yaml).expect("valid table");
    Router::from_routes(&RuntimeConfig::default(), table.routes).expect("routes compile")
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("route_match", |b| {
        let test_paths = [
            "/zoo/animals/123",
            "/zoo/animals/new",
            "/zoo/animals/123/toys/456",
            "/zoo/cats/animals/123/habitats/88/sections/5",
            "/inventory/1/feeds/2/items/3/batches/4",
            "/complex/1/2/3/4/5/6/7/8/9",
            "/archive/2024/05",
            "/static/css/site.css?v=3",
        ];
        b.iter(|| {
            for path in test_paths.iter() {
                let res = router.recognize(path);
                black_box(&res);
            }
        })
    });
}

fn bench_route_miss(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("route_miss", |b| {
        b.iter(|| {
            let res = router.recognize(black_box("/zoo/animals/123/unknown/deep/path"));
            black_box(&res);
        })
    });
}

fn bench_generate(c: &mut Criterion) {
    let router = build_router();
    let params = RouteParams::from([
        ("category", "cats"),
        ("id", "123"),
        ("habitat_id", "88"),
        ("section_id", "5"),
        ("sort", "name"),
    ]);
    c.bench_function("route_generate", |b| {
        b.iter(|| {
            let path = router.generate(black_box("habitat_section"), &params);
            black_box(&path);
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_route_miss, bench_generate);
criterion_main!(benches);
