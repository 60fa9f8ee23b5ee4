use std::fmt;

pub const MIN_DICE: u32 = 1;
pub const MAX_DICE: u32 = 20;
pub const MIN_FACES: u32 = 2;
pub const MAX_FACES: u32 = 1000;

/// How many dice to roll and how many faces each has.
///
/// Always within bounds: out-of-range requests are clamped, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollSpec {
    count: u32,
    faces: u32,
}

impl RollSpec {
    pub fn new(count: u64, faces: u64) -> Self {
        Self {
            count: clamp(count, MIN_DICE, MAX_DICE),
            faces: clamp(faces, MIN_FACES, MAX_FACES),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn faces(&self) -> u32 {
        self.faces
    }
}

impl Default for RollSpec {
    /// A single six-sided die
    fn default() -> Self {
        Self::new(1, 6)
    }
}

fn clamp(value: u64, min: u32, max: u32) -> u32 {
    // max fits in u32, so the narrowing is lossless after the clamp
    value.clamp(u64::from(min), u64::from(max)) as u32
}

/// Result of rolling a [`RollSpec`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    pub spec: RollSpec,
    pub values: Vec<u32>,
}

impl RollOutcome {
    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = self.spec.faces();
        match self.values.as_slice() {
            [single] => write!(f, "🎲 d{} → {}", faces, single),
            values => write!(
                f,
                "🎲 {}d{} → {:?} = {}",
                self.spec.count(),
                faces,
                values,
                self.total()
            ),
        }
    }
}
