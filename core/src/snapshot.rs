//! Snapshot serialization: full fleet state to/from JSON.
//!
//! The snapshot is one structured document holding every truck, every
//! driver record, and the available cargo pool. It is written whole on
//! every successful mutation and read whole at engine construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fleet::{Cargo, Driver, Truck};
use crate::geo::GeoLookup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub trucks: Vec<Truck>,
    pub drivers: Vec<Driver>,
    pub cargos: Vec<Cargo>,
}

impl FleetSnapshot {
    /// The default demo fleet used when the store holds no snapshot yet:
    /// three trucks, no drivers, empty cargo pool.
    pub fn seed() -> Self {
        let geo = GeoLookup::builtin();
        Self {
            trucks: vec![
                demo_truck(
                    "001",
                    "Peterbilt",
                    "389",
                    "ABC1234",
                    "Los Angeles, CA",
                    NaiveDate::from_ymd_opt(2024, 6, 15),
                    &geo,
                ),
                demo_truck(
                    "002",
                    "Kenworth",
                    "W900",
                    "XYZ5678",
                    "Dallas, TX",
                    NaiveDate::from_ymd_opt(2024, 5, 20),
                    &geo,
                ),
                demo_truck(
                    "003",
                    "Freightliner",
                    "Cascadia",
                    "LMN4321",
                    "Chicago, IL",
                    NaiveDate::from_ymd_opt(2024, 4, 10),
                    &geo,
                ),
            ],
            drivers: Vec::new(),
            cargos: Vec::new(),
        }
    }
}

fn demo_truck(
    id: &str,
    brand: &str,
    model: &str,
    license: &str,
    city: &str,
    last_maintenance: Option<NaiveDate>,
    geo: &GeoLookup,
) -> Truck {
    Truck {
        id: id.to_string(),
        brand: brand.to_string(),
        model: model.to_string(),
        license: license.to_string(),
        current_city: city.to_string(),
        location: geo.lookup(city),
        last_maintenance,
        weight: None,
        cargo: None,
        driver: None,
        maintenance_history: Vec::new(),
        appointment_date: None,
        needs_maintenance: false,
        maintenance_type: None,
    }
}
