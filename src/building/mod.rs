pub mod capacity;
pub mod registries;

pub use capacity::{CapacityGate, CapacitySlot};
pub use registries::Registries;

/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::BuildingConfig;
use crate::display::DisplayEvent;
use crate::elevator::Car;
use crate::shared::{BuildingSnapshot, PassengerId, TripEvent, TripKind};

/**
 * Everything the driver and the passengers share.
 *
 * Tasks hold an `Arc<Building>` and talk to each other only through the car,
 * the capacity gate and the registries. The optional channels carry a copy
 * of what happens to the display sink and to the trip journal; sending on
 * them never blocks.
 *
 * # Fields
 * - `config`:      Building size, capacity and tick period for this run.
 * - `car`:         Position and direction of the car.
 * - `gate`:        Admission control for the car.
 * - `registries`:  Waiting, onboard and delivered passengers.
 * - `display_tx`:  Sender for display events.
 * - `journal_tx`:  Sender for trip events.
 */
pub struct Building {
    config: BuildingConfig,
    car: Car,
    gate: CapacityGate,
    registries: Registries,
    display_tx: Option<cbc::Sender<DisplayEvent>>,
    journal_tx: Option<cbc::Sender<TripEvent>>,
}

impl Building {
    /// `config` must already be validated.
    pub fn new(config: BuildingConfig) -> Building {
        if let Err(e) = config.validate() {
            panic!("building created from an unchecked configuration: {}", e);
        }

        Building {
            car: Car::new(config.top_floor()),
            gate: CapacityGate::new(config.max_capacity),
            registries: Registries::new(config.total_levels, config.max_capacity),
            config,
            display_tx: None,
            journal_tx: None,
        }
    }

    pub fn with_display(mut self, display_tx: cbc::Sender<DisplayEvent>) -> Building {
        self.display_tx = Some(display_tx);
        self
    }

    pub fn with_journal(mut self, journal_tx: cbc::Sender<TripEvent>) -> Building {
        self.journal_tx = Some(journal_tx);
        self
    }

    pub fn config(&self) -> &BuildingConfig {
        &self.config
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn gate(&self) -> &CapacityGate {
        &self.gate
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Consistent view of car and registries, taken with the car held still.
    pub fn snapshot(&self) -> BuildingSnapshot {
        self.car.inspect(|car| self.registries.snapshot(car))
    }

    pub fn publish_snapshot(&self) {
        if self.display_tx.is_some() {
            self.publish(DisplayEvent::Snapshot(self.snapshot()));
        }
    }

    pub fn publish(&self, event: DisplayEvent) {
        if let Some(display_tx) = &self.display_tx {
            // The sink may already be gone during shutdown
            let _ = display_tx.send(event);
        }
    }

    pub fn record(&self, passenger: PassengerId, kind: TripKind, floor: u8, tick: u64) {
        if let Some(journal_tx) = &self.journal_tx {
            let _ = journal_tx.send(TripEvent {
                passenger,
                kind,
                floor,
                tick,
            });
        }
    }

    /// Stops the car and closes the gate, releasing every blocked passenger.
    pub fn shut_down(&self) {
        self.car.shut_down();
        self.gate.close();
    }
}
