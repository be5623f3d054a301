use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source of exploration noise for the match scorer
///
/// `next` returns a value in `[0, 1)`. The scorer stretches it to the configured
/// exploration range, so implementations never need to know the weights.
pub trait NoiseSource: Send + Sync {
    fn next(&self) -> f64;
}

/// Shared handle to a noise source
pub type SharedNoise = Arc<dyn NoiseSource>;

/// Thread-local RNG, used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngNoise;

impl NoiseSource for ThreadRngNoise {
    fn next(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns the same value (clamped into `[0, 1)`)
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(f64);

impl FixedNoise {
    pub fn new(value: f64) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        Self(value.clamp(0.0, 1.0 - f64::EPSILON))
    }

    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl NoiseSource for FixedNoise {
    fn next(&self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of values
pub struct SequenceNoise {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceNoise {
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| FixedNoise::new(v).value())
            .collect();
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl NoiseSource for SequenceNoise {
    fn next(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[idx % self.values.len()]
    }
}

impl fmt::Debug for SequenceNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceNoise")
            .field("values", &self.values)
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_in_range() {
        let noise = ThreadRngNoise;
        for _ in 0..1000 {
            let v = noise.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_fixed_noise_clamped() {
        assert_eq!(FixedNoise::new(-2.0).next(), 0.0);
        assert!(FixedNoise::new(5.0).next() < 1.0);
        assert_eq!(FixedNoise::new(f64::NAN).next(), 0.0);
        assert_eq!(FixedNoise::new(0.25).next(), 0.25);
    }

    #[test]
    fn test_sequence_cycles() {
        let noise = SequenceNoise::new(vec![0.1, 0.2]);
        assert_eq!(noise.next(), 0.1);
        assert_eq!(noise.next(), 0.2);
        assert_eq!(noise.next(), 0.1);
    }

    #[test]
    fn test_empty_sequence_is_zero() {
        assert_eq!(SequenceNoise::new(vec![]).next(), 0.0);
    }
}
