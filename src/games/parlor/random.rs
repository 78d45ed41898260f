//! Random source used for sundae timing and rewards.

/// Anything that can produce uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Small xorshift32 generator. Good enough for game events, not for anything else.
#[derive(Clone, Debug)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    pub fn new(seed: u32) -> Self {
        // xorshift never leaves the all-zero state
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Seed from a wall-clock millisecond timestamp.
    pub fn from_timestamp(now_ms: u64) -> Self {
        Self::new((now_ms ^ (now_ms >> 32)) as u32)
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for XorShiftRng {
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[cfg(test)]
pub struct SequenceRng {
    values: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl SequenceRng {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            pos: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
