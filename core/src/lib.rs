//! fleet-core: the state engine behind a small truck-fleet demo.
//!
//! The engine owns trucks, drivers, and the available cargo pool, exposes
//! the invariant-preserving mutations (registration, assignment, weighing,
//! scheduling, inspection, movement drift), and mirrors its full state into
//! a key-value snapshot store after every successful mutation. Rendering,
//! login, and map tiles live elsewhere; callers of the mutating operations
//! are assumed to be authorized.

pub mod error;
pub mod fleet;
pub mod geo;
pub mod maintenance;
pub mod movement;
pub mod rng;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod types;
