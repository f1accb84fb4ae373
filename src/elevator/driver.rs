use crate::building::Building;
use crossbeam_channel as cbc;
use log::{info, trace};
use std::sync::Arc;
use std::time::Instant;

/**
 * # Elevator Driver
 * Moves the car through the building on a fixed period.
 *
 * Every tick the car advances one floor, reversing at the bottom and top
 * floors, and a fresh snapshot of the building is published to the display
 * sink. The driver never stops on its own; it runs until a message (or a
 * disconnect) arrives on `terminate_rx`, after which it shuts the car down
 * so no passenger is left waiting on it.
 *
 * # Fields
 *
 * - `building`:        Shared building state the car belongs to.
 * - `tick_rx`:         Fires once per `move_duration`.
 * - `terminate_rx`:    Receiver for the shutdown signal.
 */
pub struct ElevatorDriver {
    building: Arc<Building>,
    tick_rx: cbc::Receiver<Instant>,
    terminate_rx: cbc::Receiver<()>,
}

impl ElevatorDriver {
    pub fn new(building: Arc<Building>, terminate_rx: cbc::Receiver<()>) -> ElevatorDriver {
        let tick_rx = cbc::tick(building.config().tick_period());

        ElevatorDriver {
            building,
            tick_rx,
            terminate_rx,
        }
    }

    pub fn run(self) {
        // Show the starting position before the first move
        self.building.publish_snapshot();

        loop {
            cbc::select! {
                recv(self.terminate_rx) -> _ => break,
                recv(self.tick_rx) -> _ => {
                    let state = self.building.car().advance();
                    trace!(
                        "Tick {}: car at floor {} heading {}",
                        state.tick(),
                        state.floor(),
                        state.direction()
                    );
                    self.building.publish_snapshot();
                }
            }
        }

        self.building.car().shut_down();
        info!(
            "Elevator driver stopped after {} ticks",
            self.building.car().state().tick()
        );
    }
}
