//! On-demand maintenance inspection.
//!
//! Inspecting a truck is a stochastic check, not a consequence of time
//! passing: a coin flip decides whether the truck needs maintenance, and if
//! so a category is drawn from the fixed five-item list. Every inspection
//! appends a history entry with a back-dated pseudo-historical date, even
//! when nothing is needed, so the service log always looks lived-in.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::rng::SimRng;

/// Probability that an inspection flags the truck.
pub const MAINTENANCE_CHANCE: f64 = 0.5;

/// History entries are back-dated by a uniform 0..BACKDATE_DAYS days.
pub const BACKDATE_DAYS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Transmission,
    Suspension,
    Engine,
    Electrical,
    Brakes,
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 5] = [
        MaintenanceType::Transmission,
        MaintenanceType::Suspension,
        MaintenanceType::Engine,
        MaintenanceType::Electrical,
        MaintenanceType::Brakes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Transmission => "transmission",
            Self::Suspension => "suspension",
            Self::Engine => "engine",
            Self::Electrical => "electrical",
            Self::Brakes => "brakes",
        }
    }
}

/// One row of a truck's append-only maintenance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceEntry {
    #[serde(rename = "type")]
    pub entry_type: Option<MaintenanceType>,
    pub date: NaiveDate,
}

/// Outcome of a single inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub needs_maintenance: bool,
    pub maintenance_type: Option<MaintenanceType>,
    pub entry: MaintenanceEntry,
}

/// Run one inspection against the given RNG stream.
///
/// The draw order is stable: the need flag first, then (only when flagged)
/// the category, then the back-date offset. Changing the order would change
/// every seeded test.
pub fn inspect(rng: &mut SimRng, today: NaiveDate) -> Inspection {
    let needs_maintenance = rng.chance(MAINTENANCE_CHANCE);
    let maintenance_type = if needs_maintenance {
        let idx = rng.next_u64_below(MaintenanceType::ALL.len() as u64) as usize;
        Some(MaintenanceType::ALL[idx])
    } else {
        None
    };

    let offset = rng.next_u64_below(BACKDATE_DAYS) as i64;
    let entry = MaintenanceEntry {
        entry_type: maintenance_type,
        date: today - Duration::days(offset),
    };

    Inspection {
        needs_maintenance,
        maintenance_type,
        entry,
    }
}
