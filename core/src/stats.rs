//! Read-side aggregation over the fleet. Pure functions, no mutation.

use crate::fleet::FleetState;

pub fn total_trucks(fleet: &FleetState) -> usize {
    fleet.truck_count()
}

/// Mean of all recorded weights. Trucks that were never weighed are left
/// out of the average; with no weights at all the answer is 0.0, never NaN.
pub fn average_weight(fleet: &FleetState) -> f64 {
    let weights: Vec<f64> = fleet.trucks().filter_map(|t| t.weight).collect();
    if weights.is_empty() {
        return 0.0;
    }
    weights.iter().sum::<f64>() / weights.len() as f64
}

/// Count of trucks whose most recent inspection flagged them. Session
/// scoped: the flag is transient and resets when the fleet is reloaded.
pub fn trucks_needing_maintenance(fleet: &FleetState) -> usize {
    fleet.trucks().filter(|t| t.needs_maintenance).count()
}
