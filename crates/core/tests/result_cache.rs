//! Result cache behavior seen through the service
//!
//! The counting grid provider tells how many times the full pipeline ran:
//! every engine run loads the grid exactly once.

mod common;

use common::{square_grid, CountingGrid, OfflineGrid};
use std::sync::{Arc, Barrier};
use std::thread;
use wildfire_spread_core::{
    FireSpreadService, GeoCoord, GridPointProvider, InMemoryWeatherProvider, ResultCache, SimulationError,
    SpreadConfig, Station,
};

fn counting_service(config: SpreadConfig) -> (FireSpreadService, Arc<CountingGrid>) {
    let grid = Arc::new(CountingGrid::new(square_grid(5, 0.8, GeoCoord::new(127.5, 36.5), "3")));
    let service = FireSpreadService::new(
        Arc::clone(&grid) as Arc<dyn GridPointProvider>,
        Arc::new(InMemoryWeatherProvider::new()),
        Vec::<Station>::new(),
        config,
    )
    .unwrap();
    (service, grid)
}

#[test]
fn test_repeat_request_is_served_from_cache() {
    let (service, grid) = counting_service(SpreadConfig::default());

    let first = service.run_simulation(12).unwrap();
    let second = service.run_simulation(12).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(grid.loads(), 1);
    assert_eq!(service.cache().stats().hits, 1);
}

#[test]
fn test_concurrent_identical_requests_run_once() {
    let (service, grid) = counting_service(SpreadConfig::default());
    let barrier = Barrier::new(6);
    let (service, barrier) = (&service, &barrier);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..6)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    service.run_simulation(7).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(grid.loads(), 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
}

#[test]
fn test_distinct_requests_run_concurrently() {
    let (service, grid) = counting_service(SpreadConfig::default());
    let service = &service;

    thread::scope(|s| {
        for id in [0, 6, 12, 18, 24] {
            s.spawn(move || {
                let result = service.run_simulation(id).unwrap();
                assert_eq!(result.ignition_id, id);
            });
        }
    });

    assert_eq!(grid.loads(), 5);
    assert_eq!(service.cache().len(), 5);
}

#[test]
fn test_least_recently_used_result_is_evicted() {
    let config = SpreadConfig {
        cache_capacity: Some(2),
        ..SpreadConfig::default()
    };
    let (service, grid) = counting_service(config);

    service.run_simulation(1).unwrap();
    service.run_simulation(2).unwrap();
    service.run_simulation(1).unwrap();
    service.run_simulation(3).unwrap();

    assert_eq!(service.cache().ids(), vec![1, 3]);
    assert_eq!(grid.loads(), 3);
    assert_eq!(service.cache().stats().evictions, 1);

    // 2 was evicted and must be recomputed
    service.run_simulation(2).unwrap();
    assert_eq!(grid.loads(), 4);
}

#[test]
fn test_failed_run_is_not_cached() {
    let (service, grid) = counting_service(SpreadConfig::default());

    assert!(matches!(service.run_simulation(404), Err(SimulationError::NotFound(404))));
    assert!(matches!(service.run_simulation(404), Err(SimulationError::NotFound(404))));

    assert_eq!(grid.loads(), 2);
    assert!(service.cache().is_empty());
}

#[test]
fn test_store_outage_is_a_provider_failure() {
    let service = FireSpreadService::new(
        Arc::new(OfflineGrid),
        Arc::new(InMemoryWeatherProvider::new()),
        Vec::<Station>::new(),
        SpreadConfig::default(),
    )
    .unwrap();

    let err = service.run_simulation(1).unwrap_err();
    assert!(err.is_provider_failure());
    assert!(err.to_string().contains("connection pool exhausted"));
    assert!(service.grid_listing().unwrap_err().is_provider_failure());
    assert!(service.cache().is_empty());
}

#[test]
fn test_services_can_share_a_cache() {
    let cache: Arc<ResultCache> = Arc::new(ResultCache::unbounded());
    let grid = Arc::new(CountingGrid::new(square_grid(3, 1.0, GeoCoord::new(127.0, 37.0), "2")));
    let build = || {
        FireSpreadService::with_cache(
            Arc::clone(&grid) as Arc<dyn GridPointProvider>,
            Arc::new(InMemoryWeatherProvider::new()),
            Vec::<Station>::new(),
            SpreadConfig::default(),
            Arc::clone(&cache),
        )
        .unwrap()
    };

    build().run_simulation(4).unwrap();
    build().run_simulation(4).unwrap();
    assert_eq!(grid.loads(), 1);

    build().shutdown();
    assert!(cache.is_empty());
}
