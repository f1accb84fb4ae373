use crate::building::{Building, CapacitySlot};
use crate::display::DisplayEvent;
use crate::shared::{Passenger, PassengerId, Result, SimError, TripKind};
use log::{debug, info};
use std::sync::Arc;

/**
 * Carries one passenger from its start floor to its destination.
 *
 * The protocol is strictly sequential: register as waiting, wait for the
 * car, take a capacity slot, board, wait for the destination, get off and
 * hand the slot back. The passenger only ever blocks on the car's arrival
 * notification or on the capacity gate.
 *
 * A slot granted after the car has already left the start floor is handed
 * straight back and the passenger waits for the next visit.
 */
pub struct PassengerTask {
    passenger: Passenger,
    building: Arc<Building>,
}

impl PassengerTask {
    pub fn new(passenger: Passenger, building: Arc<Building>) -> PassengerTask {
        PassengerTask {
            passenger,
            building,
        }
    }

    pub fn id(&self) -> PassengerId {
        self.passenger.id()
    }

    pub fn run(self) -> Result<PassengerId> {
        self.register()?;
        let slot = self.board()?;
        self.ride(slot)?;
        Ok(self.passenger.id())
    }

    fn register(&self) -> Result<()> {
        let passenger = &self.passenger;

        self.building.car().inspect(|car| {
            self.building.registries().register(passenger)?;
            self.building.record(
                passenger.id(),
                TripKind::Registered,
                passenger.start_floor(),
                car.tick(),
            );
            Ok::<_, SimError>(())
        })?;

        debug!(
            "Passenger {} waiting at floor {} for floor {}",
            passenger.id(),
            passenger.start_floor(),
            passenger.destination_floor()
        );
        self.building.publish_snapshot();
        Ok(())
    }

    fn board(&self) -> Result<CapacitySlot> {
        let passenger = &self.passenger;
        let start = passenger.start_floor();

        loop {
            self.building
                .car()
                .wait_until_at(start, |_| ())
                .ok_or(SimError::ShutDown(passenger.id()))?;

            let slot = self
                .building
                .gate()
                .acquire()
                .ok_or(SimError::ShutDown(passenger.id()))?;

            let boarded = self.building.car().if_at(start, |car| {
                self.building.registries().board(passenger, &slot)?;
                self.building
                    .record(passenger.id(), TripKind::Boarded, start, car.tick());
                Ok::<_, SimError>(car.tick())
            });

            match boarded {
                Some(Ok(tick)) => {
                    info!(
                        "Passenger {} boarded at floor {} (tick {}, slot {})",
                        passenger.id(),
                        start,
                        tick,
                        slot.ticket()
                    );
                    self.building.publish_snapshot();
                    return Ok(slot);
                }
                Some(Err(e)) => {
                    self.building.gate().release(slot);
                    return Err(e);
                }
                None => {
                    debug!(
                        "Passenger {} got a slot after the car left floor {}, waiting for the next visit",
                        passenger.id(),
                        start
                    );
                    self.building.gate().release(slot);
                }
            }
        }
    }

    fn ride(&self, slot: CapacitySlot) -> Result<()> {
        let passenger = &self.passenger;
        let destination = passenger.destination_floor();

        let delivered = self.building.car().wait_until_at(destination, |car| {
            self.building.registries().deliver(passenger, car.floor())?;
            self.building
                .record(passenger.id(), TripKind::Delivered, destination, car.tick());
            Ok::<_, SimError>(car.tick())
        });

        // The seat is vacated in the registries before the slot goes back
        self.building.gate().release(slot);

        let tick = delivered.ok_or(SimError::ShutDown(passenger.id()))??;
        info!(
            "Passenger {} exited at floor {} (tick {})",
            passenger.id(),
            destination,
            tick
        );
        self.building.publish_snapshot();
        self.building.publish(DisplayEvent::Exited {
            passenger: passenger.id(),
            floor: destination,
        });
        Ok(())
    }
}
