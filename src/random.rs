//! Deterministic xorshift32 generator for cosmetic spread.
//!
//! Debris is the only consumer. The generator lives inside the world, so two
//! runs with the same seed shatter tiles into identical particle showers.

/// Seeded xorshift32 generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Creates a generator. A zero seed is replaced by one, since xorshift
    /// never leaves the all-zero state.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next raw value.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value in `[0, 1)`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Only the top 24 bits are kept, which f32 represents exactly."
    )]
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1_u32 << 24) as f32
    }

    /// Next value in `[min, max)`.
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }
}
