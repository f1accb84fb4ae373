/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use super::error::{Result, SimError};

pub type PassengerId = u32;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
        }
    }
}

/**
 * A person travelling from one floor to another.
 *
 * Immutable once created. The constructor rejects trips that start and end
 * on the same floor and floors outside the building, so every `Passenger`
 * in circulation describes a valid trip.
 */
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Passenger {
    id: PassengerId,
    start_floor: u8,
    destination_floor: u8,
}

impl Passenger {
    pub fn new(
        id: PassengerId,
        start_floor: u8,
        destination_floor: u8,
        total_levels: u8,
    ) -> Result<Passenger> {
        if start_floor == destination_floor {
            return Err(SimError::InvalidPassenger {
                id,
                reason: format!("start and destination are both floor {}", start_floor),
            });
        }
        if start_floor >= total_levels || destination_floor >= total_levels {
            return Err(SimError::InvalidPassenger {
                id,
                reason: format!(
                    "trip {} -> {} leaves the building (floors 0..{})",
                    start_floor, destination_floor, total_levels
                ),
            });
        }

        Ok(Passenger {
            id,
            start_floor,
            destination_floor,
        })
    }

    pub fn id(&self) -> PassengerId {
        self.id
    }

    pub fn start_floor(&self) -> u8 {
        self.start_floor
    }

    pub fn destination_floor(&self) -> u8 {
        self.destination_floor
    }

    pub fn rider(&self) -> Rider {
        Rider {
            id: self.id,
            destination: self.destination_floor,
        }
    }
}

/// An `(id, destination)` entry as stored in the registries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rider {
    pub id: PassengerId,
    pub destination: u8,
}

impl fmt::Display for Rider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}t{}", self.id, self.destination)
    }
}

/// Where a registered passenger currently is.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "state", content = "floor")]
pub enum Location {
    Waiting(u8),
    Onboard,
    Delivered(u8),
}

/**
 * Read-only view of the whole building, handed to the display sink.
 *
 * # Fields
 * - `tick`:        Number of floor moves the car has made so far.
 * - `floor`:       Floor the car is at.
 * - `direction`:   Direction of the next move.
 * - `occupants`:   Number of passengers inside the car.
 * - `capacity`:    Maximum number of passengers inside the car.
 * - `onboard`:     Riders inside the car, in boarding order.
 * - `waiting`:     Riders waiting for pickup, indexed by floor.
 * - `delivered`:   Riders who got off, indexed by floor.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BuildingSnapshot {
    pub tick: u64,
    pub floor: u8,
    pub direction: Direction,
    pub occupants: usize,
    pub capacity: usize,
    pub onboard: Vec<Rider>,
    pub waiting: Vec<Vec<Rider>>,
    pub delivered: Vec<Vec<Rider>>,
}

impl BuildingSnapshot {
    pub fn delivered_count(&self) -> usize {
        self.delivered.iter().map(Vec::len).sum()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.iter().map(Vec::len).sum()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripKind {
    Registered,
    Boarded,
    Delivered,
}

/// One entry of the trip journal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripEvent {
    pub passenger: PassengerId,
    pub kind: TripKind,
    pub floor: u8,
    pub tick: u64,
}
