//! Tests for the VNS engine and its stop condition.

use hub_vns::instance::Instance;
use hub_vns::local_search::LocalSearch;
use hub_vns::neighborhoods::{Neighborhood, Shift};
use hub_vns::solution::Solution;
use hub_vns::vns::{StopCondition, Vns};
use hub_vns::SearchRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Three nodes on a line; only nodes 0 and 2 exchange flow.
fn create_line_instance() -> Instance {
    let mut flow = vec![vec![0.0; 3]; 3];
    flow[0][2] = 5.0;
    flow[2][0] = 5.0;

    Instance::new(
        3,
        0.5,
        vec![10.0, 10.0, 10.0],
        vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 1.0, 0.0],
        ],
        flow,
    )
    .unwrap()
}

/// A ring of twelve nodes with varied flows and installation costs.
fn create_ring_instance() -> Instance {
    let n = 12;
    let distance: Vec<Vec<f64>> = (0..n)
        .map(|i: usize| {
            (0..n)
                .map(|j: usize| {
                    let d = (i as i64 - j as i64).unsigned_abs() as usize;
                    d.min(n - d) as f64 * 3.0
                })
                .collect()
        })
        .collect();
    let flow: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { 0.0 } else { ((i * 7 + j * 3) % 5) as f64 + 1.0 })
                .collect()
        })
        .collect();
    let installation: Vec<f64> = (0..n).map(|i| 40.0 + (i % 4) as f64 * 15.0).collect();

    Instance::new(n, 0.4, installation, distance, flow).unwrap()
}

fn engine() -> Vns {
    Vns::with_default_neighborhoods(LocalSearch::new(1000))
}

#[test]
fn test_line_instance_reaches_optimum_from_all_hubs() {
    let instance = create_line_instance();
    let mut start = Solution::from_hubs(&instance, [0, 1, 2]).unwrap();
    let start_cost = start.cost(&instance);
    let mut rng = SearchRng::seed_from_u64(42);

    let outcome = engine().run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_max_iterations(200),
    );

    assert!(outcome.best_cost <= start_cost);
    assert!((outcome.best_cost - 30.0).abs() < 1e-9);
    assert!(outcome.best.is_feasible(&instance));
}

#[test]
fn test_cost_history_non_increasing() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, 0..instance.size()).unwrap();
    let mut rng = SearchRng::seed_from_u64(17);

    let outcome = engine().run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_max_iterations(300),
    );

    assert!(!outcome.cost_history.is_empty());
    for window in outcome.cost_history.windows(2) {
        assert!(
            window[1] < window[0],
            "best cost history should strictly decrease: {} >= {}",
            window[1],
            window[0]
        );
    }
    assert_eq!(outcome.improvements as usize, outcome.cost_history.len() - 1);
    assert_eq!(outcome.cost_history.last().copied(), Some(outcome.best_cost));
}

#[test]
fn test_best_cost_matches_recomputation() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [0]).unwrap();
    let mut rng = SearchRng::seed_from_u64(23);

    let outcome = engine().run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_max_iterations(200),
    );

    assert!((outcome.best_cost - outcome.best.compute_cost(&instance)).abs() < 1e-6);
    assert!(outcome.best.is_feasible(&instance));
}

#[test]
fn test_never_worse_than_start() {
    let instance = create_ring_instance();

    for seed in 0..5 {
        let mut start = Solution::from_hubs(&instance, [seed as usize, 6]).unwrap();
        let start_cost = start.cost(&instance);
        let mut rng = SearchRng::seed_from_u64(seed);

        let outcome = engine().run(
            &instance,
            start,
            &mut rng,
            &StopCondition::new().with_max_iterations(100),
        );

        assert!(outcome.best_cost <= start_cost + 1e-9);
    }
}

#[test]
fn test_fixed_seed_is_deterministic() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [3]).unwrap();
    let stop = StopCondition::new().with_max_iterations(250);

    let a = engine().run(&instance, start.clone(), &mut SearchRng::seed_from_u64(5), &stop);
    let b = engine().run(&instance, start, &mut SearchRng::seed_from_u64(5), &stop);

    assert_eq!(a.best, b.best);
    assert_eq!(a.best_cost, b.best_cost);
    assert_eq!(a.iterations, b.iterations);
    assert_eq!(a.cost_history, b.cost_history);
}

#[test]
fn test_iteration_budget_is_exact() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [0, 6]).unwrap();
    let mut rng = SearchRng::seed_from_u64(1);

    let outcome = engine().run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_max_iterations(37),
    );

    assert_eq!(outcome.iterations, 37);
}

#[test]
fn test_cancelled_before_start_runs_no_iterations() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [0, 6]).unwrap();
    let mut rng = SearchRng::seed_from_u64(1);
    let flag = Arc::new(AtomicBool::new(true));

    let outcome = engine().run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_cancel_flag(flag),
    );

    assert_eq!(outcome.iterations, 0);
    assert!(outcome.best.is_feasible(&instance));
}

#[test]
fn test_past_deadline_runs_no_iterations() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [0, 6]).unwrap();
    let mut rng = SearchRng::seed_from_u64(1);

    let outcome = engine().run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_deadline(Instant::now()),
    );

    assert_eq!(outcome.iterations, 0);
}

#[test]
fn test_time_limit_stops_search() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [0]).unwrap();
    let mut rng = SearchRng::seed_from_u64(1);
    let started = Instant::now();

    let outcome = engine().run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_time_limit(Duration::from_millis(100)),
    );

    assert!(outcome.iterations > 0);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_cancel_through_condition() {
    let flag = Arc::new(AtomicBool::new(false));
    let stop = StopCondition::new().with_cancel_flag(Arc::clone(&flag));

    assert!(!stop.should_stop(0));
    stop.cancel();
    assert!(flag.load(Ordering::Relaxed));
    assert!(stop.should_stop(0));
}

#[test]
fn test_custom_neighborhood_list() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [0, 6]).unwrap();
    let hubs = start.hubs().clone();
    let mut rng = SearchRng::seed_from_u64(12);

    let neighborhoods: Vec<Box<dyn Neighborhood>> = vec![Box::new(Shift)];
    let vns = Vns::new(neighborhoods, LocalSearch::new(1000));
    assert_eq!(vns.neighborhood_names(), vec!["shift"]);

    let outcome = vns.run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new().with_max_iterations(50),
    );

    // Shift and local search never touch the hub set
    assert_eq!(outcome.best.hubs(), &hubs);
}

#[test]
fn test_empty_neighborhood_list_only_polishes() {
    let instance = create_ring_instance();
    let start = Solution::from_hubs(&instance, [0, 6]).unwrap();
    let mut rng = SearchRng::seed_from_u64(12);

    let outcome = Vns::new(Vec::new(), LocalSearch::new(1000)).run(
        &instance,
        start,
        &mut rng,
        &StopCondition::new(),
    );

    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.cost_history.len(), 1);
}
