/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::debug;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/***************************************/
/*       Public data structures        */
/***************************************/
/// Proof of admission into the car. Not `Clone`, and `release` consumes it,
/// so a slot can only be handed back once.
#[must_use = "a capacity slot must be handed back with CapacityGate::release"]
#[derive(Debug)]
pub struct CapacitySlot {
    ticket: u64,
}

impl CapacitySlot {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

struct GateState {
    holders: usize,
    next_ticket: u64,
    now_serving: u64,
    open: bool,
}

/**
 * Bounded admission counter for the car.
 *
 * At most `capacity` slots are out at any time. Callers of `acquire` draw a
 * ticket and are admitted strictly in ticket order, so a waiter can never be
 * overtaken by later arrivals while slots keep getting released.
 */
pub struct CapacityGate {
    capacity: usize,
    state: Mutex<GateState>,
    vacancy: Condvar,
}

/***************************************/
/*             Public API              */
/***************************************/
impl CapacityGate {
    pub fn new(capacity: usize) -> CapacityGate {
        CapacityGate {
            capacity,
            state: Mutex::new(GateState {
                holders: 0,
                next_ticket: 0,
                now_serving: 0,
                open: true,
            }),
            vacancy: Condvar::new(),
        }
    }

    pub fn holders(&self) -> usize {
        self.lock().holders
    }

    /// Number of callers currently blocked in `acquire`.
    #[cfg(test)]
    pub fn queued(&self) -> u64 {
        let state = self.lock();
        state.next_ticket - state.now_serving
    }

    /// Blocks until a slot is free and every earlier caller has been admitted.
    ///
    /// Returns `None` only once the gate has been closed.
    pub fn acquire(&self) -> Option<CapacitySlot> {
        let mut state = self.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;

        if state.holders >= self.capacity {
            debug!(
                "Car full ({}/{}), ticket {} queued",
                state.holders, self.capacity, ticket
            );
        }

        let mut state = self
            .vacancy
            .wait_while(state, |state| {
                state.open && (state.now_serving != ticket || state.holders >= self.capacity)
            })
            .unwrap_or_else(PoisonError::into_inner);

        // Keep the queue moving even if this ticket is abandoned
        state.now_serving += 1;
        if !state.open {
            drop(state);
            self.vacancy.notify_all();
            return None;
        }

        state.holders += 1;
        drop(state);

        // The next ticket may fit as well
        self.vacancy.notify_all();
        Some(CapacitySlot { ticket })
    }

    pub fn release(&self, slot: CapacitySlot) {
        let mut state = self.lock();
        assert!(
            state.holders > 0,
            "capacity slot {} released but no slot is held",
            slot.ticket
        );
        state.holders -= 1;
        drop(state);

        self.vacancy.notify_all();
    }

    /// Refuses all further admissions and wakes every queued caller.
    pub fn close(&self) {
        self.lock().open = false;
        self.vacancy.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
