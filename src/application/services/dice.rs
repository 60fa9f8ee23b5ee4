//! Dice rolling on top of `rand`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::entities::{RollOutcome, RollSpec};
use crate::domain::traits::DiceSource;

/// [`DiceSource`] backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<StdRng> {
    /// Seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> DiceSource for RngDice<R> {
    fn roll(&mut self, faces: u32) -> u32 {
        self.rng.gen_range(1..=faces)
    }

    fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Roll every die in `spec` independently
pub fn roll<D: DiceSource + ?Sized>(spec: RollSpec, dice: &mut D) -> RollOutcome {
    let values = (0..spec.count()).map(|_| dice.roll(spec.faces())).collect();
    RollOutcome { spec, values }
}
