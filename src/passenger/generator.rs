use crate::shared::{Passenger, PassengerId, Result, SimError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces passengers with uniformly random, distinct start and destination floors.
pub struct PassengerGenerator {
    rng: StdRng,
    total_levels: u8,
    next_id: PassengerId,
}

impl PassengerGenerator {
    /// A fixed `seed` makes the generated trips reproducible.
    pub fn new(total_levels: u8, seed: Option<u64>) -> PassengerGenerator {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        PassengerGenerator {
            rng,
            total_levels,
            next_id: 0,
        }
    }

    pub fn next_passenger(&mut self) -> Result<Passenger> {
        let id = self.next_id;
        if self.total_levels < 2 {
            return Err(SimError::InvalidPassenger {
                id,
                reason: format!("no trip possible in a building with {} floors", self.total_levels),
            });
        }

        let start = self.rng.gen_range(0..self.total_levels);
        // Skip over the start floor so every other floor is equally likely
        let mut destination = self.rng.gen_range(0..self.total_levels - 1);
        if destination >= start {
            destination += 1;
        }

        let passenger = Passenger::new(id, start, destination, self.total_levels)?;
        self.next_id += 1;
        Ok(passenger)
    }

    pub fn generate(&mut self, count: usize) -> Result<Vec<Passenger>> {
        (0..count).map(|_| self.next_passenger()).collect()
    }
}
