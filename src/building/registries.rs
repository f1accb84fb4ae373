/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use super::capacity::CapacitySlot;
use crate::elevator::CarState;
use crate::shared::{BuildingSnapshot, Location, Passenger, PassengerId, Result, Rider, SimError};

/**
 * Who is waiting, riding and delivered, all behind one lock.
 *
 * The three lists keep insertion order for the display. `index` maps every
 * registered id to its current location so each transition can be checked
 * against where the passenger actually is. Pickup and delivery are single
 * critical sections: no observer can see a passenger in two places or in
 * none.
 */
pub struct Registries {
    capacity: usize,
    floors: Mutex<Floors>,
}

struct Floors {
    waiting: Vec<Vec<Rider>>,
    onboard: Vec<Rider>,
    delivered: Vec<Vec<Rider>>,
    occupant_count: usize,
    index: HashMap<PassengerId, Entry>,
}

#[derive(Clone, Copy)]
struct Entry {
    location: Location,
    destination: u8,
}

/***************************************/
/*             Public API              */
/***************************************/
impl Registries {
    pub fn new(total_levels: u8, capacity: usize) -> Registries {
        Registries {
            capacity,
            floors: Mutex::new(Floors {
                waiting: vec![Vec::new(); total_levels as usize],
                onboard: Vec::new(),
                delivered: vec![Vec::new(); total_levels as usize],
                occupant_count: 0,
                index: HashMap::new(),
            }),
        }
    }

    /// Adds the passenger to the waiting list of its start floor.
    pub fn register(&self, passenger: &Passenger) -> Result<()> {
        let mut floors = self.lock();
        let start = passenger.start_floor() as usize;

        if floors.index.contains_key(&passenger.id()) {
            return Err(SimError::DuplicatePassenger(passenger.id()));
        }
        if start >= floors.waiting.len() || passenger.destination_floor() as usize >= floors.delivered.len() {
            return Err(SimError::InvalidPassenger {
                id: passenger.id(),
                reason: format!("building has only {} floors", floors.waiting.len()),
            });
        }

        floors.waiting[start].push(passenger.rider());
        floors.index.insert(
            passenger.id(),
            Entry {
                location: Location::Waiting(passenger.start_floor()),
                destination: passenger.destination_floor(),
            },
        );
        Ok(())
    }

    /// Pickup transition: moves the passenger from its floor's waiting list into the car.
    ///
    /// The caller must hold a capacity slot for the passenger.
    pub fn board(&self, passenger: &Passenger, _slot: &CapacitySlot) -> Result<()> {
        let mut floors = self.lock();
        let id = passenger.id();
        let start = passenger.start_floor();

        match floors.index.get(&id).map(|entry| entry.location) {
            Some(Location::Waiting(floor)) if floor == start => {}
            _ => return Err(SimError::NotWaiting { id, floor: start }),
        }
        if floors.occupant_count >= self.capacity {
            return Err(SimError::CapacityExceeded {
                id,
                capacity: self.capacity,
            });
        }

        let position = floors.waiting[start as usize]
            .iter()
            .position(|rider| rider.id == id)
            .ok_or(SimError::NotWaiting { id, floor: start })?;
        let rider = floors.waiting[start as usize].remove(position);

        floors.onboard.push(rider);
        floors.occupant_count += 1;
        floors.set_location(id, Location::Onboard);
        Ok(())
    }

    /// Delivery transition: moves the passenger out of the car onto `floor`.
    ///
    /// `floor` is where the car is; it must be the passenger's destination.
    pub fn deliver(&self, passenger: &Passenger, floor: u8) -> Result<()> {
        let mut floors = self.lock();
        let id = passenger.id();

        if floor != passenger.destination_floor() {
            return Err(SimError::InvariantViolation(format!(
                "passenger {} would leave at floor {} instead of {}",
                id,
                floor,
                passenger.destination_floor()
            )));
        }
        match floors.index.get(&id).map(|entry| entry.location) {
            Some(Location::Onboard) => {}
            _ => return Err(SimError::NotOnboard(id)),
        }

        let position = floors
            .onboard
            .iter()
            .position(|rider| rider.id == id)
            .ok_or(SimError::NotOnboard(id))?;
        let rider = floors.onboard.remove(position);

        floors.delivered[floor as usize].push(rider);
        floors.occupant_count -= 1;
        floors.set_location(id, Location::Delivered(floor));
        Ok(())
    }

    #[cfg(test)]
    pub fn location(&self, id: PassengerId) -> Option<Location> {
        self.lock().index.get(&id).map(|entry| entry.location)
    }

    #[cfg(test)]
    pub fn occupant_count(&self) -> usize {
        self.lock().occupant_count
    }

    #[cfg(test)]
    pub fn registered(&self) -> usize {
        self.lock().index.len()
    }

    pub fn snapshot(&self, car: &CarState) -> BuildingSnapshot {
        let floors = self.lock();

        BuildingSnapshot {
            tick: car.tick(),
            floor: car.floor(),
            direction: car.direction(),
            occupants: floors.occupant_count,
            capacity: self.capacity,
            onboard: floors.onboard.clone(),
            waiting: floors.waiting.clone(),
            delivered: floors.delivered.clone(),
        }
    }

    /// Checks that every registered passenger is in exactly one place, that
    /// the occupant count matches the car and respects the capacity, and that
    /// every delivered passenger got off at its destination.
    pub fn audit(&self) -> Result<()> {
        let floors = self.lock();
        let mut seen: HashMap<PassengerId, Location> = HashMap::new();

        let listed = floors
            .waiting
            .iter()
            .enumerate()
            .flat_map(|(floor, riders)| riders.iter().map(move |rider| (Location::Waiting(floor as u8), rider)))
            .chain(floors.onboard.iter().map(|rider| (Location::Onboard, rider)))
            .chain(
                floors
                    .delivered
                    .iter()
                    .enumerate()
                    .flat_map(|(floor, riders)| riders.iter().map(move |rider| (Location::Delivered(floor as u8), rider))),
            );

        for (location, rider) in listed {
            if let Some(previous) = seen.insert(rider.id, location) {
                return Err(SimError::InvariantViolation(format!(
                    "passenger {} listed both as {:?} and {:?}",
                    rider.id, previous, location
                )));
            }

            let entry = floors.index.get(&rider.id).ok_or_else(|| {
                SimError::InvariantViolation(format!("passenger {} listed but never registered", rider.id))
            })?;
            if entry.location != location {
                return Err(SimError::InvariantViolation(format!(
                    "passenger {} listed as {:?} but indexed as {:?}",
                    rider.id, location, entry.location
                )));
            }
            if entry.destination != rider.destination {
                return Err(SimError::InvariantViolation(format!(
                    "passenger {} carries destination {} instead of {}",
                    rider.id, rider.destination, entry.destination
                )));
            }
            if let Location::Delivered(floor) = location {
                if floor != entry.destination {
                    return Err(SimError::InvariantViolation(format!(
                        "passenger {} delivered to floor {} instead of {}",
                        rider.id, floor, entry.destination
                    )));
                }
            }
        }

        if seen.len() != floors.index.len() {
            return Err(SimError::InvariantViolation(format!(
                "{} passengers registered but {} listed",
                floors.index.len(),
                seen.len()
            )));
        }
        if floors.onboard.len() != floors.occupant_count {
            return Err(SimError::InvariantViolation(format!(
                "{} riders on board but occupant count is {}",
                floors.onboard.len(),
                floors.occupant_count
            )));
        }
        if floors.occupant_count > self.capacity {
            return Err(SimError::InvariantViolation(format!(
                "{} occupants exceed capacity {}",
                floors.occupant_count, self.capacity
            )));
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Floors> {
        self.floors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/***************************************/
/*          Private functions          */
/***************************************/
impl Floors {
    fn set_location(&mut self, id: PassengerId, location: Location) {
        if let Some(entry) = self.index.get_mut(&id) {
            entry.location = location;
        }
    }
}
