//! Performance benchmarks for roster operations

use activity_roster::config::AppConfig;
use activity_roster::roster::{RosterStore, StaticSeedProvider};
use activity_roster::service::AppState;
use activity_roster::web::build_router;
use axum::body::Body;
use axum::http::Request;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use tower::ServiceExt;

fn create_bench_store() -> RosterStore {
    RosterStore::from_provider(&StaticSeedProvider::new()).unwrap()
}

fn bench_signup_unregister_cycle(c: &mut Criterion) {
    let store = create_bench_store();

    c.bench_function("signup_unregister_cycle", |b| {
        b.iter(|| {
            black_box(store.signup("Chess Club", "bench@mergington.edu")).unwrap();
            black_box(store.unregister("Chess Club", "bench@mergington.edu")).unwrap();
        })
    });
}

fn bench_duplicate_signup(c: &mut Criterion) {
    let store = create_bench_store();

    c.bench_function("duplicate_signup_rejection", |b| {
        b.iter(|| black_box(store.signup("Chess Club", "michael@mergington.edu")))
    });
}

fn bench_list_activities(c: &mut Criterion) {
    let store = create_bench_store();

    // A larger roster than the seed alone
    for i in 0..200 {
        let _ = store.signup("Gym Class", &format!("student{}@mergington.edu", i));
    }

    c.bench_function("list_activities", |b| {
        b.iter(|| black_box(store.list_activities()))
    });
}

fn bench_http_list_activities(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = Arc::new(AppState::new(AppConfig::default()).unwrap());
    let router = build_router(state);

    c.bench_function("http_list_activities", |b| {
        b.iter(|| {
            rt.block_on(async {
                let response = router
                    .clone()
                    .oneshot(
                        Request::builder()
                            .uri("/activities")
                            .body(Body::empty())
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response.status())
            })
        })
    });
}

criterion_group!(
    benches,
    bench_signup_unregister_cycle,
    bench_duplicate_signup,
    bench_list_activities,
    bench_http_list_activities
);
criterion_main!(benches);
