use rocket_simulation::analytics::EfficiencyScorer;
use rocket_simulation::common::vector::norm;
use rocket_simulation::config::Catalog;
use rocket_simulation::flyby::GravityAssistModel;
use rocket_simulation::impulsive::delta_v_hohmann;
use rocket_simulation::orbits::{synodic_period, trajectory, transfer_time_years};
use rocket_simulation::propulsion::fuel_mass;

#[test]
fn trajectory_closes_between_orbits_for_many_radii() {
    for &r in &[0.387, 0.723, 0.9, 1.2, 1.524, 2.77, 5.204, 9.58] {
        let traj = trajectory(1.0, r, 64).expect("valid radii");
        assert_eq!(traj.departure.len(), 64);
        assert_eq!(traj.target.len(), 64);
        assert_eq!(traj.rocket.len(), 64);
        assert!((0.0..1.0).contains(&traj.orbit.eccentricity), "r = {r}");

        let first = norm(&traj.rocket[0]);
        let last = norm(&traj.rocket[63]);
        assert!((first - 1.0).abs() < 1e-9, "r = {r}: start {first}");
        assert!((last - r).abs() < 1e-9, "r = {r}: end {last}");

        // The target reaches the vehicle's arrival point.
        let target_end = traj.target[63];
        let rocket_end = traj.rocket[63];
        assert!((target_end[0] - rocket_end[0]).abs() < 1e-9);
        assert!((target_end[1] - rocket_end[1]).abs() < 1e-9);
    }
}

#[test]
fn mars_transfer_time_matches_closed_form() {
    let years = transfer_time_years(1.0, 1.524).unwrap();
    assert!((years - 0.709).abs() < 1e-3, "years = {years}");
    assert!((years * 365.25 - 259.0).abs() < 0.5);
}

#[test]
fn degenerate_transfers_are_rejected() {
    assert!(trajectory(1.0, 1.0, 100).is_err());
    assert!(trajectory(1.0, -2.0, 100).is_err());
    assert!(trajectory(1.0, 1.524, 1).is_err());
    assert!(synodic_period(365.25).is_err());
}

#[test]
fn synodic_periods_of_catalog_targets() {
    let catalog = Catalog::builtin().unwrap();
    let mars = synodic_period(catalog.planet("mars").unwrap().period_days()).unwrap();
    let venus = synodic_period(catalog.planet("venus").unwrap().period_days()).unwrap();
    assert!((mars - 779.9).abs() < 0.1, "mars = {mars}");
    assert!((venus - 583.9).abs() < 0.1, "venus = {venus}");
}

#[test]
fn fuel_tracks_hohmann_budget() {
    let (dv1, dv2) = delta_v_hohmann(1.0, 1.524).unwrap();
    assert!((dv1 - 2.946).abs() < 0.05);
    assert!((dv2 - 2.650).abs() < 0.05);

    let fuel = fuel_mass(dv1 + dv2, 1000.0, 450.0, 9.81).unwrap();
    assert!((fuel - 2552.0).abs() < 30.0, "fuel = {fuel}");
    assert!(fuel_mass(dv1 + dv2 + 0.1, 1000.0, 450.0, 9.81).unwrap() > fuel);
    assert_eq!(fuel_mass(0.0, 1000.0, 450.0, 9.81).unwrap(), 0.0);
}

#[test]
fn efficiency_scores_against_reference_optimum() {
    let scorer = EfficiencyScorer::new(Catalog::builtin().unwrap().optimal_delta_v());
    assert_eq!(scorer.score("mars", 6.3), 100.0);
    assert_eq!(scorer.score("mars", 12.6), 50.0);
}

#[test]
fn suggested_routes_are_sorted_and_start_at_earth() {
    let catalog = Catalog::builtin().unwrap();
    let model = GravityAssistModel::new(catalog.planets.clone(), catalog.routes.clone());
    for destination in ["venus", "mars", "jupiter"] {
        let routes = model.suggest_routes(destination).unwrap();
        assert!(!routes.is_empty());
        assert!(routes
            .windows(2)
            .all(|w| w[0].total_dv_km_s <= w[1].total_dv_km_s));
        assert!(routes.iter().all(|r| r.route[0] == "earth"));
        assert!(routes.iter().all(|r| r.route.last().map(String::as_str) == Some(destination)));
    }
}
