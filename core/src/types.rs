//! Shared primitive types used across the fleet engine.

/// A caller-assigned truck identifier. Immutable once created.
pub type TruckId = String;

/// A caller-assigned driver identifier.
pub type DriverId = String;

/// A caller-assigned cargo identifier.
pub type CargoId = String;

/// A movement-ticker tick counter.
pub type Tick = u64;
