/// Source of randomness for dice rolls and coin flips
pub trait DiceSource: Send {
    /// Uniform value in `1..=faces`
    fn roll(&mut self, faces: u32) -> u32;

    /// Fair coin, `true` for heads
    fn flip(&mut self) -> bool;
}
