//! City-to-coordinate lookup.
//!
//! Geocoding is an external static table as far as the engine is concerned:
//! a fixed set of known cities, with an "unknown" origin fallback for
//! everything else. An unknown city is not an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A WGS-84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Coordinate returned for cities the table does not know.
pub const UNKNOWN_LOCATION: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };

#[derive(Debug, Clone)]
pub struct GeoLookup {
    cities: HashMap<String, GeoPoint>,
}

impl GeoLookup {
    /// The built-in demo city table.
    pub fn builtin() -> Self {
        let mut cities = HashMap::new();
        for (name, lat, lng) in [
            ("Los Angeles, CA", 34.0522, -118.2437),
            ("Dallas, TX", 32.7767, -96.797),
            ("Chicago, IL", 41.8781, -87.6298),
            ("New York, NY", 40.7128, -74.006),
            ("Miami, FL", 25.7617, -80.1918),
        ] {
            cities.insert(name.to_string(), GeoPoint { lat, lng });
        }
        Self { cities }
    }

    /// Extend the table with an extra city. Used by demos and tests.
    pub fn with_city(mut self, name: &str, lat: f64, lng: f64) -> Self {
        self.cities.insert(name.to_string(), GeoPoint { lat, lng });
        self
    }

    pub fn lookup(&self, city: &str) -> GeoPoint {
        self.cities.get(city).copied().unwrap_or(UNKNOWN_LOCATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_resolves() {
        let geo = GeoLookup::builtin();
        let p = geo.lookup("Chicago, IL");
        assert_eq!(p, GeoPoint { lat: 41.8781, lng: -87.6298 });
    }

    #[test]
    fn unknown_city_falls_back_to_origin() {
        let geo = GeoLookup::builtin();
        assert_eq!(geo.lookup("Atlantis"), UNKNOWN_LOCATION);
    }
}
