//! Truck registration, removal, weighing, scheduling, and relocation.

use fleet_core::error::FleetError;
use fleet_core::fleet::{Cargo, FleetState, NewDriver, NewTruck};
use fleet_core::geo::{GeoLookup, GeoPoint, UNKNOWN_LOCATION};
use fleet_core::store::SnapshotStore;

fn build(seed: u64) -> FleetState {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = SnapshotStore::in_memory().expect("in-memory store");
    FleetState::load(store, GeoLookup::builtin(), seed).expect("load fleet")
}

fn new_truck(id: &str, city: &str) -> NewTruck {
    NewTruck {
        id: id.to_string(),
        brand: "Volvo".to_string(),
        model: "VNL".to_string(),
        license: "VNL7777".to_string(),
        current_city: city.to_string(),
    }
}

/// An empty store seeds the three-truck demo fleet.
#[test]
fn seed_fleet_has_three_trucks() {
    let fleet = build(42);
    assert_eq!(fleet.truck_count(), 3);
    for id in ["001", "002", "003"] {
        assert!(fleet.truck(id).is_some(), "seed truck {id} missing");
    }
    let first = fleet.truck("001").unwrap();
    assert_eq!(first.brand, "Peterbilt");
    assert_eq!(
        first.location,
        GeoPoint { lat: 34.0522, lng: -118.2437 }
    );
}

/// A freshly added truck takes its location from the geo table and starts
/// with no weight, no cargo, no driver, and an empty history.
#[test]
fn added_truck_gets_location_from_geo_lookup() {
    let mut fleet = build(42);
    fleet.add_truck(new_truck("200", "New York, NY")).unwrap();

    let truck = fleet.truck("200").unwrap();
    assert_eq!(truck.location, GeoPoint { lat: 40.7128, lng: -74.006 });
    assert_eq!(truck.weight, None);
    assert!(truck.cargo.is_none());
    assert!(truck.driver.is_none());
    assert!(truck.maintenance_history.is_empty());
}

/// Unknown cities are not an error; the truck lands at the origin.
#[test]
fn unknown_city_lands_at_origin() {
    let mut fleet = build(42);
    fleet.add_truck(new_truck("201", "Nowhere, ZZ")).unwrap();
    assert_eq!(fleet.truck("201").unwrap().location, UNKNOWN_LOCATION);
}

#[test]
fn duplicate_truck_id_is_a_conflict() {
    let mut fleet = build(42);
    let err = fleet.add_truck(new_truck("001", "Dallas, TX")).unwrap_err();
    assert!(matches!(err, FleetError::Conflict(_)), "got {err}");

    // The rejected call left state unchanged.
    assert_eq!(fleet.truck_count(), 3);
    assert_eq!(fleet.truck("001").unwrap().brand, "Peterbilt");
}

#[test]
fn missing_truck_field_is_a_validation_error() {
    let mut fleet = build(42);
    let mut truck = new_truck("202", "Dallas, TX");
    truck.brand = "  ".to_string();
    let err = fleet.add_truck(truck).unwrap_err();
    assert!(matches!(err, FleetError::Validation(_)), "got {err}");
    assert_eq!(fleet.truck_count(), 3);
}

#[test]
fn remove_truck_deletes_it_once() {
    let mut fleet = build(42);
    fleet.remove_truck("002").unwrap();
    assert!(fleet.truck("002").is_none());
    assert_eq!(fleet.truck_count(), 2);

    let err = fleet.remove_truck("002").unwrap_err();
    assert!(matches!(err, FleetError::NotFound(_)), "got {err}");
}

/// Removing a truck releases its driver record and returns held cargo to
/// the available pool.
#[test]
fn remove_truck_cascades_driver_and_cargo() {
    let mut fleet = build(42);
    fleet
        .add_driver(NewDriver {
            id: "D1".to_string(),
            name: "Alice".to_string(),
            license: "AB12345".to_string(),
            experience: 5,
            truck_id: "001".to_string(),
        })
        .unwrap();
    fleet
        .add_cargo(Cargo {
            id: "C1".to_string(),
            company: "Acme Freight".to_string(),
            cargo_type: "Electronics".to_string(),
            loading_place: "Miami, FL".to_string(),
            unloading_place: "New York, NY".to_string(),
        })
        .unwrap();
    fleet.assign_cargo("001", "C1").unwrap();

    fleet.remove_truck("001").unwrap();

    assert!(fleet.drivers().is_empty(), "driver record must not outlive its truck");
    assert!(fleet.cargo_in_pool("C1"), "cargo must return to the pool");
}

#[test]
fn weigh_truck_rejects_nonpositive_weight() {
    let mut fleet = build(42);
    let err = fleet.weigh_truck("002", -5.0).unwrap_err();
    assert!(matches!(err, FleetError::Validation(_)), "got {err}");
    assert_eq!(fleet.truck("002").unwrap().weight, None);

    let err = fleet.weigh_truck("002", f64::NAN).unwrap_err();
    assert!(matches!(err, FleetError::Validation(_)), "got {err}");
}

#[test]
fn weigh_truck_records_a_valid_weight() {
    let mut fleet = build(42);
    fleet.weigh_truck("002", 12000.0).unwrap();
    assert_eq!(fleet.truck("002").unwrap().weight, Some(12000.0));
}

#[test]
fn weigh_missing_truck_is_not_found() {
    let mut fleet = build(42);
    let err = fleet.weigh_truck("999", 1000.0).unwrap_err();
    assert!(matches!(err, FleetError::NotFound(_)), "got {err}");
}

#[test]
fn schedule_appointment_validates_the_date() {
    let mut fleet = build(42);

    let err = fleet.schedule_appointment("001", "").unwrap_err();
    assert!(matches!(err, FleetError::Validation(_)), "got {err}");

    let err = fleet.schedule_appointment("001", "15/09/2026").unwrap_err();
    assert!(matches!(err, FleetError::Validation(_)), "got {err}");

    assert_eq!(fleet.truck("001").unwrap().appointment_date, None);

    fleet.schedule_appointment("001", "2026-09-15").unwrap();
    let date = fleet.truck("001").unwrap().appointment_date.unwrap();
    assert_eq!(date.to_string(), "2026-09-15");
}

#[test]
fn relocate_truck_updates_city_and_location() {
    let mut fleet = build(42);
    fleet.relocate_truck("001", "Miami, FL").unwrap();

    let truck = fleet.truck("001").unwrap();
    assert_eq!(truck.current_city, "Miami, FL");
    assert_eq!(truck.location, GeoPoint { lat: 25.7617, lng: -80.1918 });
}
