//! Injectable randomness
//!
//! The simulation only ever needs uniform draws in [0, 1), so it depends on
//! this narrow trait instead of a concrete generator. Any `rand::Rng` works;
//! tests plug in scripted sources.

use rand::Rng;

/// Uniform random source consumed by the simulation
pub trait RandomSource {
    /// Uniform value in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len` (`len` must be non-zero)
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted random needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Always returns the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn pick_maps_unit_interval_to_indices() {
        let mut rng = ScriptedRandom::new(vec![0.0, 0.19, 0.2, 0.999]);
        assert_eq!(rng.pick(5), 0);
        assert_eq!(rng.pick(5), 0);
        assert_eq!(rng.pick(5), 1);
        assert_eq!(rng.pick(5), 4);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..16 {
            let x = a.next_f64();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x.to_bits(), b.next_f64().to_bits());
        }
    }
}
