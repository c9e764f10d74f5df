use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use rocket_simulation::analytics::Trend;
use rocket_simulation::config::{Catalog, Settings};
use rocket_simulation::tracker::{ManualClock, MissionStatus};
use rocket_simulation::transfer::{ServiceError, Simulator};

fn simulator_with(settings: Settings) -> (Simulator, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    let simulator = Simulator::new(
        Catalog::builtin().unwrap(),
        settings,
        Arc::new(clock.clone()),
    )
    .unwrap();
    (simulator, clock)
}

fn simulator() -> (Simulator, ManualClock) {
    simulator_with(Settings::default())
}

#[test]
fn simulate_combines_every_subsystem() {
    let (sim, _) = simulator();
    let profile = sim.simulate("Mars", Some(300)).unwrap();

    assert_eq!(profile.target, "mars");
    assert_eq!(profile.trajectory.len(), 300);
    assert_eq!(profile.trajectory.transfer_time_days as i64, 258);
    let fuel = profile.fuel.expect("fuel calculator enabled");
    assert!(fuel.total_dv_km_s > 5.5 && fuel.total_dv_km_s < 5.7);
    // Beating the reference optimum caps the score.
    assert_eq!(profile.efficiency, 100.0);
    let historical = profile.historical.expect("mars has flown missions");
    assert!(!historical.is_empty());
}

#[test]
fn steps_are_clamped_not_rejected() {
    let (sim, _) = simulator();
    assert_eq!(sim.simulate("venus", Some(-5)).unwrap().trajectory.len(), 50);
    assert_eq!(sim.simulate("venus", Some(5_000)).unwrap().trajectory.len(), 1000);
    assert_eq!(sim.simulate("venus", None).unwrap().trajectory.len(), 200);
}

#[test]
fn earth_and_unknown_bodies_are_not_targets() {
    let (sim, _) = simulator();
    for name in ["earth", "pluto", ""] {
        let err = sim.simulate(name, None).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)), "{name}: {err}");
        assert_eq!(err.status_code(), 400);
    }
}

#[test]
fn tracking_replays_against_the_clock() {
    let (sim, clock) = simulator();
    let started = sim.start_tracking(Some("ares"), "mars").unwrap();
    assert_eq!(started.mission_id, "ares");
    assert_eq!(started.status, "started");
    assert_eq!(started.update_interval_ms, 1000);

    let at_start = sim.mission_status("ares").unwrap();
    assert_eq!(at_start.progress_fraction, 0.0);
    assert_eq!(at_start.status, MissionStatus::Active);

    // 13 s at 10 days/s is 130 of ~259 days.
    clock.advance(TimeDelta::seconds(13));
    let midway = sim.mission_status("ares").unwrap();
    assert_eq!(midway, sim.mission_status("ares").unwrap());
    assert!((midway.elapsed_days - 130.0).abs() < 1e-9);
    assert!(midway.progress_fraction > 0.49 && midway.progress_fraction < 0.51);

    clock.advance(TimeDelta::seconds(60));
    let done = sim.mission_status("ares").unwrap();
    assert_eq!(done.progress_fraction, 1.0);
    assert_eq!(done.remaining_days, 0.0);
    assert_eq!(done.status, MissionStatus::Completed);
}

#[test]
fn tracking_ids_are_unique_and_lookups_checked() {
    let (sim, _) = simulator();
    sim.start_tracking(None, "venus").unwrap();
    let all = sim.active_missions().unwrap();
    assert!(all.contains_key("mission_1893456000"));

    let dup = sim.start_tracking(Some("mission_1893456000"), "mars").unwrap_err();
    assert_eq!(dup.status_code(), 400);
    assert_eq!(sim.mission_status("ghost").unwrap_err().status_code(), 404);
    assert_eq!(sim.add_mission_event("ghost", "burn").unwrap_err().status_code(), 404);

    sim.add_mission_event("mission_1893456000", "launch").unwrap();
    let events = sim.mission_events("mission_1893456000").unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "launch");
}

#[test]
fn analytics_keeps_a_bounded_history() {
    let settings = Settings {
        history_capacity: 12,
        ..Settings::default()
    };
    let (sim, _) = simulator_with(settings);
    for i in 0..15 {
        let target = if i % 3 == 0 { "venus" } else { "mars" };
        sim.simulate(target, Some(50)).unwrap();
    }

    let export = sim.analytics().unwrap();
    assert_eq!(export.user_stats.total_simulations, 12);
    assert_eq!(export.user_stats.favorite_target.as_deref(), Some("mars"));
    assert_eq!(export.recent_missions.len(), 10);
    assert_eq!(export.performance_trends.total_missions, 12);
    assert_ne!(export.performance_trends.trend, Trend::InsufficientData);
    assert_eq!(export.target_analytics.len(), 2);
}

#[test]
fn disabled_subsystems_degrade_gracefully() {
    let mut settings = Settings::default();
    settings.features.fuel_calculator = false;
    settings.features.mission_database = false;
    settings.features.gravity_assist = false;
    settings.features.mission_tracker = false;
    let (sim, _) = simulator_with(settings);

    let profile = sim.simulate("mars", None).unwrap();
    assert!(profile.fuel.is_none());
    assert!(profile.historical.is_none());

    assert_eq!(sim.gravity_assist("mars").unwrap_err().status_code(), 503);
    assert_eq!(sim.mission_status("any").unwrap_err().status_code(), 503);
    assert!(sim.launch_windows("mars").is_ok());
}

#[test]
fn respond_wraps_results_in_status_envelopes() {
    let (sim, _) = simulator();

    let ok = sim.respond(r#"{"route":"launch-windows","target":"mars"}"#);
    assert_eq!(ok.status, 200);
    let windows = ok.body.as_array().unwrap();
    assert_eq!(windows.len(), 3);
    assert_eq!(windows[0]["launch_date"], "2030-01-01");
    assert_eq!(windows[1]["launch_date"], "2032-02-19");

    let bad = sim.respond("not json");
    assert_eq!(bad.status, 400);
    assert!(bad.body["error"].is_string());

    let missing = sim.respond(r#"{"route":"tutorial-step","tutorial_id":"nope","step":0}"#);
    assert_eq!(missing.status, 404);
}

#[test]
fn near_resonant_catalog_planet_is_a_client_error() {
    let mut catalog = Catalog::builtin().unwrap();
    let mut twin = catalog.planet("mars").unwrap().clone();
    twin.name = "twin".to_string();
    twin.orbital_period_days = Some(365.25 + 1e-9);
    catalog.planets.push(twin);
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    let sim = Simulator::new(catalog, Settings::default(), Arc::new(clock)).unwrap();

    let err = sim.launch_windows("twin").unwrap_err();
    assert!(matches!(err, ServiceError::Numeric(_)), "{err}");
    let response = sim.respond(r#"{"route":"launch-windows","target":"twin"}"#);
    assert_eq!(response.status, 400);
}

#[test]
fn tracking_reports_configured_poll_interval() {
    let settings = Settings {
        tracking_update_interval_ms: 250,
        ..Settings::default()
    };
    let (sim, _) = simulator_with(settings);
    let response = sim.respond(r#"{"route":"start-tracking","mission_id":"pathfinder"}"#);
    assert_eq!(response.status, 200);
    assert_eq!(response.body["update_interval_ms"], 250);
    assert_eq!(response.body["mission_id"], "pathfinder");
}
