/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::building::Building;
use crate::config::{BuildingConfig, DisplayMode};
use crate::display::{DisplayEvent, DisplaySink};
use crate::elevator::ElevatorDriver;
use crate::passenger::PassengerTask;
use crate::shared::{BuildingSnapshot, Passenger, PassengerId, Result, SimError, TripEvent};

/***************************************/
/*       Public data structures        */
/***************************************/
/**
 * Outcome of a completed run.
 *
 * # Fields
 * - `snapshot`:    Building state after every passenger finished.
 * - `journal`:     Registrations, pickups and deliveries in the order they happened.
 * - `ticks`:       Number of floor moves the car made.
 */
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub snapshot: BuildingSnapshot,
    pub journal: Vec<TripEvent>,
    pub ticks: u64,
}

/**
 * Runs one building with a fixed set of passengers to completion.
 *
 * Spawns one thread per passenger, the elevator driver and (unless the
 * display is off) a display sink writing to stdout. Once every passenger
 * thread has joined the driver is told to stop and joined as well, so the
 * run ends deterministically. The first passenger failure shuts the whole
 * building down and is returned after all threads are joined.
 */
pub struct Simulation {
    config: BuildingConfig,
    display: DisplayMode,
}

/***************************************/
/*             Public API              */
/***************************************/
impl Simulation {
    pub fn new(config: BuildingConfig) -> Simulation {
        Simulation {
            config,
            display: DisplayMode::Off,
        }
    }

    pub fn display(mut self, mode: DisplayMode) -> Simulation {
        self.display = mode;
        self
    }

    pub fn run(&self, passengers: Vec<Passenger>) -> Result<SimulationReport> {
        self.config.validate()?;
        self.check_passengers(&passengers)?;
        let expected = passengers.len();

        // Initialize channels
        let (journal_tx, journal_rx) = cbc::unbounded::<TripEvent>();
        let (done_tx, done_rx) = cbc::unbounded::<(PassengerId, Result<PassengerId>)>();
        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

        let mut building = Building::new(self.config.clone()).with_journal(journal_tx);
        let display_thread = match self.display {
            DisplayMode::Off => None,
            mode => {
                let (display_tx, display_rx) = cbc::unbounded::<DisplayEvent>();
                building = building.with_display(display_tx);
                let sink = DisplaySink::new(mode, io::stdout(), display_rx);
                Some(Builder::new().name("display".into()).spawn(move || sink.run().map(|_| ()))?)
            }
        };
        let building = Arc::new(building);

        // Start the passengers
        let mut passenger_threads: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(expected);
        let mut failure: Option<SimError> = None;
        for passenger in passengers {
            let task = PassengerTask::new(passenger, Arc::clone(&building));
            let id = task.id();
            let name = format!("passenger-{}", id);
            let done_tx = done_tx.clone();

            match Builder::new()
                .name(name.clone())
                .spawn(move || {
                    let _ = done_tx.send((id, task.run()));
                }) {
                Ok(handle) => passenger_threads.push((name, handle)),
                Err(e) => {
                    failure = Some(SimError::Spawn(e));
                    break;
                }
            }
        }
        drop(done_tx);

        // Start the elevator driver
        let driver = ElevatorDriver::new(Arc::clone(&building), terminate_rx);
        let driver_thread = match Builder::new()
            .name("elevator_driver".into())
            .spawn(move || driver.run())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                failure.get_or_insert(SimError::Spawn(e));
                None
            }
        };
        if failure.is_some() {
            building.shut_down();
        }

        // Wait for every passenger to finish
        for (id, result) in done_rx.iter() {
            if let Err(e) = result {
                error!("Passenger {} failed: {}", id, e);
                if failure.is_none() {
                    building.shut_down();
                    failure = Some(e);
                }
            }
        }
        for (name, handle) in passenger_threads {
            if handle.join().is_err() {
                building.shut_down();
                failure.get_or_insert(SimError::TaskPanicked(name));
            }
        }

        // Stop the driver
        let _ = terminate_tx.send(());
        if let Some(handle) = driver_thread {
            if handle.join().is_err() {
                failure.get_or_insert(SimError::TaskPanicked("elevator_driver".into()));
            }
        }

        let snapshot = building.snapshot();
        let audit = building.registries().audit();
        let slots_held = building.gate().holders();
        drop(building);

        if let Some(handle) = display_thread {
            match handle.join() {
                Ok(Err(e)) => warn!("Display sink stopped: {}", e),
                Err(_) => warn!("Display sink panicked"),
                Ok(Ok(())) => {}
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }
        audit?;
        if snapshot.delivered_count() != expected {
            return Err(SimError::InvariantViolation(format!(
                "{} of {} passengers delivered, {} still waiting",
                snapshot.delivered_count(),
                expected,
                snapshot.waiting_count()
            )));
        }
        if slots_held != 0 {
            return Err(SimError::InvariantViolation(format!(
                "{} capacity slots still held after every passenger left",
                slots_held
            )));
        }

        let report = SimulationReport {
            ticks: snapshot.tick,
            snapshot,
            journal: journal_rx.try_iter().collect(),
        };
        info!(
            "All {} passengers delivered after {} ticks",
            expected, report.ticks
        );
        Ok(report)
    }

    fn check_passengers(&self, passengers: &[Passenger]) -> Result<()> {
        let mut ids = HashSet::with_capacity(passengers.len());

        for passenger in passengers {
            if !ids.insert(passenger.id()) {
                return Err(SimError::DuplicatePassenger(passenger.id()));
            }
            if passenger.start_floor() >= self.config.total_levels
                || passenger.destination_floor() >= self.config.total_levels
            {
                return Err(SimError::InvalidPassenger {
                    id: passenger.id(),
                    reason: format!(
                        "trip {} -> {} leaves a building with {} floors",
                        passenger.start_floor(),
                        passenger.destination_floor(),
                        self.config.total_levels
                    ),
                });
            }
        }
        Ok(())
    }
}
