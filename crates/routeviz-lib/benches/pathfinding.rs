use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use routeviz_lib::{
    search, Coordinate, PathGraph, ProviderKind, RouteGeometry, RoutePayload, RouteSet,
    RouteSummary,
};
use std::hint::black_box;
use std::sync::Arc;

/// A winding route of `vertices` points starting in central Delhi.
fn winding_geometry(vertices: usize) -> RouteGeometry {
    let points = (0..vertices)
        .map(|i| {
            let t = i as f64 * 0.001;
            Coordinate::new(77.209 + t * 0.2 + (t * 40.0).sin() * 0.002, 28.6139 + t * 0.1)
        })
        .collect();
    RouteGeometry::new(points).expect("non-empty geometry")
}

static CITY_ROUTE: Lazy<RouteGeometry> = Lazy::new(|| winding_geometry(500));
static LONG_HAUL_ROUTE: Lazy<RouteGeometry> = Lazy::new(|| winding_geometry(20_000));

fn benchmark_pathfinding(c: &mut Criterion) {
    c.bench_function("dijkstra_city_route", |b| {
        let geometry = &*CITY_ROUTE;
        b.iter(|| {
            let result = search(geometry);
            black_box(result.visited_order.len())
        });
    });

    c.bench_function("dijkstra_long_haul_route", |b| {
        let geometry = &*LONG_HAUL_ROUTE;
        b.iter(|| {
            let result = search(geometry);
            black_box(result.total_distance_meters)
        });
    });

    c.bench_function("path_graph_build_long_haul", |b| {
        let geometry = &*LONG_HAUL_ROUTE;
        b.iter(|| {
            let graph = PathGraph::from_geometry(geometry).expect("graph builds");
            black_box(graph.vertex_count())
        });
    });

    c.bench_function("classify_route_set", |b| {
        let payload = |distance_meters: f64| {
            Arc::new(RoutePayload {
                geometry: CITY_ROUTE.clone(),
                summary: RouteSummary {
                    distance_meters,
                    duration_seconds: distance_meters / 8.0,
                },
                steps: Vec::new(),
            })
        };
        let (fastest, shortest) = (payload(5230.0), payload(4980.0));
        b.iter(|| {
            let set = RouteSet::classify(
                Arc::clone(&fastest),
                Arc::clone(&shortest),
                ProviderKind::Primary,
            );
            black_box(set.eco_source())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
