//! fleet-runner: headless demo driver for the fleet engine.
//!
//! Usage:
//!   fleet-runner --seed 42 --ticks 10 --db fleet.db
//!   fleet-runner --ticks 5 --fast

use anyhow::Result;
use fleet_core::error::FleetError;
use fleet_core::fleet::{Cargo, FleetState, NewDriver, NewTruck};
use fleet_core::geo::GeoLookup;
use fleet_core::movement::MovementTicker;
use fleet_core::stats;
use fleet_core::store::SnapshotStore;
use fleet_core::types::Tick;
use std::env;
use std::thread;
use std::time::{Duration, Instant};

/// Stand-in for the external auth collaborator. The engine itself never
/// checks credentials; the runner refuses to issue mutations without a
/// logged-in session, marking that boundary.
struct Session {
    user: Option<String>,
}

impl Session {
    fn new() -> Self {
        Self { user: None }
    }

    fn login(&mut self, username: &str) -> bool {
        if username.chars().count() < 5 {
            return false;
        }
        self.user = Some(username.to_string());
        true
    }

    fn is_authorized(&self) -> bool {
        self.user.is_some()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 10u64);
    let fast = args.iter().any(|a| a == "--fast");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");

    println!("fleet-runner");
    println!("  seed:  {seed}");
    println!("  ticks: {ticks}");
    println!("  db:    {db}");
    println!();

    let store = if db == ":memory:" {
        SnapshotStore::in_memory()?
    } else {
        SnapshotStore::open(db)?
    };
    let mut fleet = FleetState::load(store, GeoLookup::builtin(), seed)?;

    let mut session = Session::new();
    if !session.login("dispatcher") {
        anyhow::bail!("demo login refused");
    }
    if session.is_authorized() {
        run_demo(&mut fleet);
    }

    drive_ticker(&mut fleet, ticks, fast);

    print_summary(&fleet);

    // Final save at teardown; this one surfaces storage errors.
    fleet.save()?;
    Ok(())
}

/// A small scripted session touching every operation family. Steps that
/// fail (for example on a rerun against a persisted db, where records
/// already exist) are logged and skipped.
fn run_demo(fleet: &mut FleetState) {
    demo_step(fleet.add_truck(NewTruck {
        id: "100".into(),
        brand: "Volvo".into(),
        model: "VNL".into(),
        license: "VNL7777".into(),
        current_city: "Miami, FL".into(),
    }));
    demo_step(fleet.add_cargo(Cargo {
        id: "C1".into(),
        company: "Acme Freight".into(),
        cargo_type: "Electronics".into(),
        loading_place: "Miami, FL".into(),
        unloading_place: "New York, NY".into(),
    }));
    demo_step(fleet.assign_cargo("100", "C1"));
    demo_step(fleet.add_driver(NewDriver {
        id: "D1".into(),
        name: "Alice".into(),
        license: "AB12345".into(),
        experience: 5,
        truck_id: "100".into(),
    }));
    demo_step(fleet.weigh_truck("100", 12000.0));
    demo_step(fleet.schedule_appointment("100", "2026-09-15"));

    match fleet.inspect_truck("002") {
        Ok(outcome) => log::info!(
            "demo inspection: needs_maintenance={} type={:?}",
            outcome.needs_maintenance,
            outcome.maintenance_type
        ),
        Err(err) => log::warn!("demo inspection skipped: {err}"),
    }
}

fn demo_step(result: Result<(), FleetError>) {
    if let Err(err) = result {
        log::warn!("demo step skipped: {err}");
    }
}

/// Drive the cooperative movement ticker until `ticks` drifts have fired,
/// then cancel it. `--fast` collapses the 3-second period for scripting.
fn drive_ticker(fleet: &mut FleetState, ticks: Tick, fast: bool) {
    let mut ticker = if fast {
        MovementTicker::with_period(Duration::from_millis(10), Instant::now())
    } else {
        MovementTicker::new(Instant::now())
    };
    log::info!("movement ticker started: period={:?}", ticker.period());

    let mut fired: Tick = 0;
    while fired < ticks {
        if ticker.poll(Instant::now()) {
            fleet.drift_all();
            fired += 1;
        } else {
            thread::sleep(Duration::from_millis(if fast { 1 } else { 25 }));
        }
    }
    ticker.cancel();
    log::info!("movement ticker cancelled after {fired} ticks");
}

fn print_summary(fleet: &FleetState) {
    println!("=== FLEET SUMMARY ===");
    println!("  trucks:              {}", stats::total_trucks(fleet));
    println!(
        "  average weight:      {:.2} kg",
        stats::average_weight(fleet)
    );
    println!(
        "  needing maintenance: {}",
        stats::trucks_needing_maintenance(fleet)
    );
    println!();
    for truck in fleet.trucks() {
        println!(
            "  [{}] {} {} ({}) @ {} ({:.4}, {:.4}) driver={} cargo={}",
            truck.id,
            truck.brand,
            truck.model,
            truck.license,
            truck.current_city,
            truck.location.lat,
            truck.location.lng,
            truck.driver.as_deref().unwrap_or("-"),
            truck
                .cargo
                .as_ref()
                .map(|c| c.cargo_type.as_str())
                .unwrap_or("-"),
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
