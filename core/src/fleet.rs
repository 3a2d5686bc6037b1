//! The fleet state engine.
//!
//! RULES:
//!   - FleetState is the single owner of trucks, drivers, and the available
//!     cargo pool. Collaborators never write a record field directly.
//!   - Cross-record links (truck<->driver, truck<->cargo) are updated inside
//!     one method per operation, so they are never observably inconsistent.
//!   - Every operation validates completely before mutating anything: a
//!     rejected call leaves state byte-for-byte unchanged.
//!   - Every successful mutation mirrors the full state into the snapshot
//!     store before returning.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};
use crate::geo::{GeoLookup, GeoPoint};
use crate::maintenance::{self, Inspection, MaintenanceEntry, MaintenanceType};
use crate::movement::DRIFT_HALF_WIDTH;
use crate::rng::{RngBank, SimRng, SimSlot};
use crate::snapshot::FleetSnapshot;
use crate::store::SnapshotStore;
use crate::types::{CargoId, DriverId, TruckId};

/// Minimum length of a driver's license number.
pub const MIN_LICENSE_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: TruckId,
    pub brand: String,
    pub model: String,
    pub license: String,
    pub current_city: String,
    pub location: GeoPoint,
    pub last_maintenance: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub cargo: Option<Cargo>,
    pub driver: Option<String>,
    pub maintenance_history: Vec<MaintenanceEntry>,
    pub appointment_date: Option<NaiveDate>,
    /// Last inspection outcome. Session-scoped; recomputed on the next
    /// inspection and never persisted.
    #[serde(skip)]
    pub needs_maintenance: bool,
    #[serde(skip)]
    pub maintenance_type: Option<MaintenanceType>,
}

/// A driver record exists only while assigned to exactly one truck.
/// There is no unassigned driver pool: removing the assignment deletes
/// the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub license: String,
    /// Years of experience.
    pub experience: u32,
    pub truck_id: TruckId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub id: CargoId,
    pub company: String,
    #[serde(rename = "type")]
    pub cargo_type: String,
    pub loading_place: String,
    pub unloading_place: String,
}

/// Caller-supplied fields for `add_truck`.
#[derive(Debug, Clone)]
pub struct NewTruck {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub license: String,
    pub current_city: String,
}

/// Caller-supplied fields for `add_driver`.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub id: String,
    pub name: String,
    pub license: String,
    pub experience: u32,
    pub truck_id: String,
}

pub struct FleetState {
    trucks: BTreeMap<TruckId, Truck>,
    drivers: Vec<Driver>,
    /// Cargo records not yet loaded onto any truck.
    cargos: BTreeMap<CargoId, Cargo>,
    store: SnapshotStore,
    geo: GeoLookup,
    maintenance_rng: SimRng,
    movement_rng: SimRng,
}

impl FleetState {
    /// Construct the engine from the store's snapshot (or the default seed
    /// fleet when no snapshot exists). `seed` drives both simulator streams.
    pub fn load(store: SnapshotStore, geo: GeoLookup, seed: u64) -> FleetResult<Self> {
        let snapshot = store.load()?;
        let bank = RngBank::new(seed);

        let mut trucks = BTreeMap::new();
        for truck in snapshot.trucks {
            trucks.insert(truck.id.clone(), truck);
        }
        let mut cargos = BTreeMap::new();
        for cargo in snapshot.cargos {
            cargos.insert(cargo.id.clone(), cargo);
        }

        log::info!(
            "fleet loaded: trucks={} drivers={} cargos={} seed={seed}",
            trucks.len(),
            snapshot.drivers.len(),
            cargos.len()
        );

        Ok(Self {
            trucks,
            drivers: snapshot.drivers,
            cargos,
            store,
            geo,
            maintenance_rng: bank.for_slot(SimSlot::Maintenance),
            movement_rng: bank.for_slot(SimSlot::Movement),
        })
    }

    // ── Read side ──────────────────────────────────────────────

    pub fn truck(&self, id: &str) -> Option<&Truck> {
        self.trucks.get(id)
    }

    pub fn trucks(&self) -> impl Iterator<Item = &Truck> {
        self.trucks.values()
    }

    pub fn truck_count(&self) -> usize {
        self.trucks.len()
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// Cargo records still in the available pool.
    pub fn cargo_pool(&self) -> impl Iterator<Item = &Cargo> {
        self.cargos.values()
    }

    pub fn cargo_in_pool(&self, id: &str) -> bool {
        self.cargos.contains_key(id)
    }

    /// The full state as one snapshot document.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            trucks: self.trucks.values().cloned().collect(),
            drivers: self.drivers.clone(),
            cargos: self.cargos.values().cloned().collect(),
        }
    }

    /// Explicit save, for teardown. Unlike the per-mutation mirror this one
    /// surfaces storage errors to the caller.
    pub fn save(&self) -> FleetResult<()> {
        self.store.save(&self.snapshot())
    }

    // ── Mutations ──────────────────────────────────────────────

    pub fn add_truck(&mut self, new: NewTruck) -> FleetResult<()> {
        require_nonempty("truck id", &new.id)?;
        require_nonempty("brand", &new.brand)?;
        require_nonempty("model", &new.model)?;
        require_nonempty("license", &new.license)?;
        require_nonempty("current city", &new.current_city)?;
        if self.trucks.contains_key(&new.id) {
            return Err(FleetError::Conflict(format!(
                "truck {} already exists",
                new.id
            )));
        }

        let location = self.geo.lookup(&new.current_city);
        let truck = Truck {
            id: new.id.clone(),
            brand: new.brand,
            model: new.model,
            license: new.license,
            current_city: new.current_city,
            location,
            last_maintenance: None,
            weight: None,
            cargo: None,
            driver: None,
            maintenance_history: Vec::new(),
            appointment_date: None,
            needs_maintenance: false,
            maintenance_type: None,
        };

        log::info!(
            "truck added: id={} brand={} city={}",
            truck.id,
            truck.brand,
            truck.current_city
        );
        self.trucks.insert(new.id, truck);
        self.persist();
        Ok(())
    }

    /// Remove a truck. Cascades: the assigned driver record (if any) is
    /// deleted with it, and held cargo returns to the available pool.
    pub fn remove_truck(&mut self, id: &str) -> FleetResult<()> {
        let truck = self
            .trucks
            .remove(id)
            .ok_or_else(|| FleetError::NotFound(format!("truck {id} not found")))?;

        if truck.driver.is_some() {
            self.drivers.retain(|d| d.truck_id != id);
            log::info!("driver record released with truck {id}");
        }
        if let Some(cargo) = truck.cargo {
            log::info!("cargo {} returned to pool from truck {id}", cargo.id);
            self.cargos.insert(cargo.id.clone(), cargo);
        }

        log::info!("truck removed: id={id}");
        self.persist();
        Ok(())
    }

    pub fn weigh_truck(&mut self, id: &str, weight: f64) -> FleetResult<()> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(FleetError::Validation(format!(
                "weight must be a positive number, got {weight}"
            )));
        }
        let truck = self
            .trucks
            .get_mut(id)
            .ok_or_else(|| FleetError::NotFound(format!("truck {id} not found")))?;

        truck.weight = Some(weight);
        log::info!("truck weighed: id={id} weight={weight}");
        self.persist();
        Ok(())
    }

    /// Register a new cargo record into the available pool.
    pub fn add_cargo(&mut self, cargo: Cargo) -> FleetResult<()> {
        require_nonempty("cargo id", &cargo.id)?;
        require_nonempty("company", &cargo.company)?;
        require_nonempty("cargo type", &cargo.cargo_type)?;
        require_nonempty("loading place", &cargo.loading_place)?;
        require_nonempty("unloading place", &cargo.unloading_place)?;
        if self.cargos.contains_key(&cargo.id)
            || self
                .trucks
                .values()
                .any(|t| t.cargo.as_ref().is_some_and(|c| c.id == cargo.id))
        {
            return Err(FleetError::Conflict(format!(
                "cargo {} already exists",
                cargo.id
            )));
        }

        log::info!("cargo added: id={} company={}", cargo.id, cargo.company);
        self.cargos.insert(cargo.id.clone(), cargo);
        self.persist();
        Ok(())
    }

    /// Move a cargo record out of the available pool and onto a truck.
    /// One-way transfer: there is no unassign operation.
    pub fn assign_cargo(&mut self, truck_id: &str, cargo_id: &str) -> FleetResult<()> {
        if !self.trucks.contains_key(truck_id) {
            return Err(FleetError::NotFound(format!("truck {truck_id} not found")));
        }
        if !self.cargos.contains_key(cargo_id) {
            return Err(FleetError::NotFound(format!(
                "cargo {cargo_id} not in available pool"
            )));
        }
        if self
            .trucks
            .get(truck_id)
            .is_some_and(|t| t.cargo.is_some())
        {
            return Err(FleetError::Conflict(format!(
                "truck {truck_id} already carries cargo"
            )));
        }

        // Checks passed: perform both sides of the transfer atomically.
        if let Some(cargo) = self.cargos.remove(cargo_id) {
            if let Some(truck) = self.trucks.get_mut(truck_id) {
                truck.cargo = Some(cargo);
            }
        }

        log::info!("cargo assigned: truck={truck_id} cargo={cargo_id}");
        self.persist();
        Ok(())
    }

    /// Schedule a maintenance appointment. `date` is the `YYYY-MM-DD` form
    /// the date picker produces.
    pub fn schedule_appointment(&mut self, truck_id: &str, date: &str) -> FleetResult<()> {
        if date.trim().is_empty() {
            return Err(FleetError::Validation(
                "appointment date must not be empty".to_string(),
            ));
        }
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            FleetError::Validation(format!("appointment date must be YYYY-MM-DD, got {date:?}"))
        })?;
        let truck = self
            .trucks
            .get_mut(truck_id)
            .ok_or_else(|| FleetError::NotFound(format!("truck {truck_id} not found")))?;

        truck.appointment_date = Some(parsed);
        log::info!("appointment scheduled: truck={truck_id} date={parsed}");
        self.persist();
        Ok(())
    }

    pub fn add_driver(&mut self, new: NewDriver) -> FleetResult<()> {
        require_nonempty("driver id", &new.id)?;
        require_nonempty("name", &new.name)?;
        require_nonempty("license", &new.license)?;
        require_nonempty("truck id", &new.truck_id)?;
        if new.license.chars().count() < MIN_LICENSE_LEN {
            return Err(FleetError::Validation(format!(
                "driver license must be at least {MIN_LICENSE_LEN} characters"
            )));
        }
        if self.drivers.iter().any(|d| d.id == new.id) {
            return Err(FleetError::Conflict(format!(
                "driver {} already exists",
                new.id
            )));
        }
        let truck = self
            .trucks
            .get(&new.truck_id)
            .ok_or_else(|| FleetError::NotFound(format!("truck {} not found", new.truck_id)))?;
        if truck.driver.is_some() {
            return Err(FleetError::Conflict(format!(
                "truck {} already has a driver",
                new.truck_id
            )));
        }

        // Both sides of the link are written here and nowhere else.
        if let Some(truck) = self.trucks.get_mut(&new.truck_id) {
            truck.driver = Some(new.name.clone());
        }
        log::info!(
            "driver added: id={} name={} truck={}",
            new.id,
            new.name,
            new.truck_id
        );
        self.drivers.push(Driver {
            id: new.id,
            name: new.name,
            license: new.license,
            experience: new.experience,
            truck_id: new.truck_id,
        });
        self.persist();
        Ok(())
    }

    /// Unassign (and thereby delete) the driver of a truck. Calling this on
    /// a driverless truck is a successful no-op, not an error.
    pub fn remove_driver(&mut self, truck_id: &str) -> FleetResult<()> {
        let truck = self
            .trucks
            .get_mut(truck_id)
            .ok_or_else(|| FleetError::NotFound(format!("truck {truck_id} not found")))?;

        if truck.driver.is_none() {
            log::debug!("remove_driver on driverless truck {truck_id}: no-op");
            return Ok(());
        }

        truck.driver = None;
        self.drivers.retain(|d| d.truck_id != truck_id);
        log::info!("driver removed: truck={truck_id}");
        self.persist();
        Ok(())
    }

    /// Explicitly relocate a truck to a city. Location comes from the same
    /// geo table used at registration.
    pub fn relocate_truck(&mut self, truck_id: &str, city: &str) -> FleetResult<()> {
        require_nonempty("city", city)?;
        let location = self.geo.lookup(city);
        let truck = self
            .trucks
            .get_mut(truck_id)
            .ok_or_else(|| FleetError::NotFound(format!("truck {truck_id} not found")))?;

        truck.current_city = city.to_string();
        truck.location = location;
        log::info!("truck relocated: id={truck_id} city={city}");
        self.persist();
        Ok(())
    }

    /// Run a maintenance inspection against a truck. Always appends a
    /// history entry, flagged or not, and refreshes the truck's transient
    /// inspection fields.
    pub fn inspect_truck(&mut self, truck_id: &str) -> FleetResult<Inspection> {
        if !self.trucks.contains_key(truck_id) {
            return Err(FleetError::NotFound(format!("truck {truck_id} not found")));
        }

        let today = Utc::now().date_naive();
        let outcome = maintenance::inspect(&mut self.maintenance_rng, today);
        if let Some(truck) = self.trucks.get_mut(truck_id) {
            truck.needs_maintenance = outcome.needs_maintenance;
            truck.maintenance_type = outcome.maintenance_type;
            truck.maintenance_history.push(outcome.entry.clone());
        }

        log::info!(
            "truck inspected: id={truck_id} needs_maintenance={} type={:?}",
            outcome.needs_maintenance,
            outcome.maintenance_type
        );
        self.persist();
        Ok(outcome)
    }

    /// One movement tick: perturb every truck's coordinate by a small
    /// uniform delta. Invoked by the movement ticker's owner; never from a
    /// timer callback writing state directly.
    pub fn drift_all(&mut self) {
        let rng = &mut self.movement_rng;
        for truck in self.trucks.values_mut() {
            truck.location.lat += rng.jitter(DRIFT_HALF_WIDTH);
            truck.location.lng += rng.jitter(DRIFT_HALF_WIDTH);
        }
        log::debug!("movement tick: drifted {} trucks", self.trucks.len());
        self.persist();
    }

    /// Mirror the full state into the snapshot store. Write failures are
    /// logged, not surfaced: memory stays authoritative for the session.
    fn persist(&self) {
        if let Err(err) = self.store.save(&self.snapshot()) {
            log::error!("snapshot save failed: {err}");
        }
    }
}

fn require_nonempty(field: &str, value: &str) -> FleetResult<()> {
    if value.trim().is_empty() {
        return Err(FleetError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
