/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Direction;

/***************************************/
/*       Public data structures        */
/***************************************/
/**
 * Position of the car.
 *
 * The car starts at floor 0 moving up and sweeps the building end to end.
 * `tick` counts the moves made so far, which gives every observer the same
 * total order of positions.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarState {
    floor: u8,
    direction: Direction,
    tick: u64,
}

impl CarState {
    pub fn new() -> CarState {
        CarState {
            floor: 0,
            direction: Direction::Up,
            tick: 0,
        }
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Moves one floor in the current direction. Reaching either end of the
    /// building reverses the direction for the next move.
    pub fn advance(&mut self, top_floor: u8) {
        self.floor = match self.direction {
            Direction::Up => self.floor + 1,
            Direction::Down => self.floor - 1,
        };
        self.tick += 1;

        if self.floor == 0 || self.floor == top_floor {
            self.direction = self.direction.reversed();
        }
    }
}

impl Default for CarState {
    fn default() -> Self {
        CarState::new()
    }
}

struct Shared {
    state: CarState,
    running: bool,
}

/**
 * The elevator car shared between the driver and the passengers.
 *
 * Only the driver moves the car. Passengers block on `arrived` until the
 * car reaches their floor; every move wakes all of them and each re-checks
 * its own floor under the lock, so nobody polls.
 *
 * Lock order: a closure passed to `wait_until_at`, `if_at` or `inspect`
 * runs with the car locked and may lock the registries. Nothing locks the
 * car while holding the registries.
 */
pub struct Car {
    top_floor: u8,
    shared: Mutex<Shared>,
    arrived: Condvar,
}

impl Car {
    /// The car sweeps `0..=top_floor`, so `top_floor` must be at least 1.
    pub fn new(top_floor: u8) -> Car {
        assert!(top_floor > 0, "the car needs at least two floors to travel between");

        Car {
            top_floor,
            shared: Mutex::new(Shared {
                state: CarState::new(),
                running: true,
            }),
            arrived: Condvar::new(),
        }
    }

    pub fn state(&self) -> CarState {
        self.lock().state
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Moves the car one floor and wakes everybody waiting for an arrival.
    pub fn advance(&self) -> CarState {
        let mut shared = self.lock();
        shared.state.advance(self.top_floor);
        let state = shared.state;
        drop(shared);

        self.arrived.notify_all();
        state
    }

    /// Stops the car for good. Passengers still waiting are released with `None`.
    pub fn shut_down(&self) {
        self.lock().running = false;
        self.arrived.notify_all();
    }

    /// Blocks until the car is at `floor`, then runs `f` before the car can move again.
    ///
    /// Returns `None` if the car is shut down first.
    pub fn wait_until_at<R>(&self, floor: u8, f: impl FnOnce(&CarState) -> R) -> Option<R> {
        let shared = self
            .arrived
            .wait_while(self.lock(), |shared| {
                shared.running && shared.state.floor != floor
            })
            .unwrap_or_else(PoisonError::into_inner);

        if !shared.running {
            return None;
        }
        Some(f(&shared.state))
    }

    /// Runs `f` only if the car is at `floor` right now.
    pub fn if_at<R>(&self, floor: u8, f: impl FnOnce(&CarState) -> R) -> Option<R> {
        let shared = self.lock();
        if shared.running && shared.state.floor == floor {
            Some(f(&shared.state))
        } else {
            None
        }
    }

    /// Runs `f` with the car held still.
    pub fn inspect<R>(&self, f: impl FnOnce(&CarState) -> R) -> R {
        f(&self.lock().state)
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
