//! Randomized invariant checks for routing and battery integration.
//!
//! Inputs come from a seeded generator so failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use eps_sim::sim::battery::{BatteryIntegrator, BatteryState};
use eps_sim::sim::router::{BatteryPolicy, PriorityRouter, Router};

const CASES: usize = 2_000;

fn random_battery(rng: &mut StdRng) -> BatteryState {
    let capacity = rng.random_range(1.0..500.0);
    let soc: f64 = rng.random_range(0.0..=1.0);
    BatteryState::new(capacity * soc, capacity)
}

fn random_policy(rng: &mut StdRng) -> BatteryPolicy {
    if rng.random_bool(0.5) {
        BatteryPolicy::Reference
    } else {
        BatteryPolicy::HeadroomCapped {
            eta_charge: rng.random_range(0.5..=1.0),
            dt_h: rng.random_range(1e-4..0.5),
        }
    }
}

#[test]
fn allocation_always_sums_to_surplus() {
    let mut rng = StdRng::seed_from_u64(0xE95);
    for _ in 0..CASES {
        let limit = rng.random_range(0.5..=1.0);
        let router = PriorityRouter::new(limit, random_policy(&mut rng));
        let battery = random_battery(&mut rng);
        let surplus = rng.random_range(-500.0..500.0);

        let a = router.route(surplus, &battery).unwrap();
        assert!(
            (a.total_w() - surplus).abs() <= 1e-9 * surplus.abs().max(1.0),
            "surplus {surplus} routed as {a}"
        );
        assert_eq!(a.surplus_w, surplus);
        assert_eq!(a.payload_w, 0.0);
        assert_eq!(a.supercapacitor_w, 0.0);
    }
}

#[test]
fn battery_share_is_bounded_by_surplus_and_ceiling() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..CASES {
        let limit = rng.random_range(0.5..=1.0);
        let router = PriorityRouter::new(limit, random_policy(&mut rng));
        let battery = random_battery(&mut rng);
        let surplus = rng.random_range(-500.0..500.0);

        let a = router.route(surplus, &battery).unwrap();
        assert!(a.battery_w >= 0.0);
        assert!(a.battery_w <= surplus.max(0.0));
        if battery.state_of_charge >= limit || surplus <= 0.0 {
            assert_eq!(a.battery_w, 0.0);
            assert_eq!(a.shunt_w, surplus);
        }
        assert_eq!(a.battery_full, battery.state_of_charge >= limit);
    }
}

#[test]
fn reference_policy_gives_battery_everything_below_ceiling() {
    let mut rng = StdRng::seed_from_u64(42);
    let router = PriorityRouter::reference(1.0);
    for _ in 0..CASES {
        let capacity = rng.random_range(1.0..500.0);
        let soc: f64 = rng.random_range(0.0..0.999);
        let battery = BatteryState::new(capacity * soc, capacity);
        let surplus = rng.random_range(1e-3..500.0);

        let a = router.route(surplus, &battery).unwrap();
        assert_eq!(a.battery_w, surplus);
        assert_eq!(a.shunt_w, 0.0);
    }
}

#[test]
fn integrator_stays_within_capacity() {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..200 {
        let capacity = rng.random_range(1.0..500.0);
        let soc = rng.random_range(0.0..=1.0);
        let mut battery = BatteryIntegrator::new(capacity, soc).unwrap();
        for _ in 0..50 {
            let power = rng.random_range(-1_000.0..1_000.0);
            let dt = rng.random_range(1e-4..1.0);
            let s = battery.step(power, dt).unwrap();
            assert!(s.energy_wh >= 0.0 && s.energy_wh <= capacity);
            assert!((0.0..=1.0).contains(&s.state_of_charge));
        }
    }
}

#[test]
fn headroom_capped_battery_never_overshoots_ceiling() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let eta = rng.random_range(0.5..=1.0);
        let dt = rng.random_range(1e-3..0.25);
        let limit = rng.random_range(0.6..=1.0);
        let capacity = rng.random_range(10.0..500.0);
        let surplus = rng.random_range(1.0..2_000.0);
        let router = PriorityRouter::new(
            limit,
            BatteryPolicy::HeadroomCapped {
                eta_charge: eta,
                dt_h: dt,
            },
        );
        let mut battery = BatteryIntegrator::new(capacity, 0.5).unwrap();
        for _ in 0..100 {
            let a = router.route(surplus, &battery.state()).unwrap();
            let s = battery.step(eta * a.battery_w, dt).unwrap();
            assert!(s.energy_wh <= limit * capacity + 1e-9 * capacity);
        }
    }
}
