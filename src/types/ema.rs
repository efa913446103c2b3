//! Exponential moving averages feeding the restart and mode controllers.
use std::fmt;

/// API for observing an EMA.
pub trait EmaIF {
    /// return the current value.
    fn get(&self) -> f64;
    /// return a ratio of short / long statistics.
    fn trend(&self) -> f64;
}

/// A pair of fast and slow EMAs over the same input stream. Both windows
/// are seeded with the first sample so the trend is meaningful from the
/// start.
#[derive(Clone, Debug)]
pub struct Ema2 {
    fast: f64,
    slow: f64,
    fe: f64,
    se: f64,
    from_scratch: bool,
}

impl fmt::Display for Ema2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ema2[fast:{:.3}, slow:{:.3}]", self.fast, self.slow)
    }
}

impl EmaIF for Ema2 {
    fn get(&self) -> f64 {
        self.fast
    }
    fn trend(&self) -> f64 {
        if self.slow == 0.0 {
            0.0
        } else {
            self.fast / self.slow
        }
    }
}

impl Ema2 {
    pub fn new(len: usize) -> Ema2 {
        Ema2 {
            fast: 0.0,
            slow: 0.0,
            fe: 1.0 / (len as f64),
            se: 1.0 / (len as f64),
            from_scratch: true,
        }
    }
    /// set the secondary window length.
    pub fn with_slow(mut self, s: usize) -> Ema2 {
        self.se = 1.0 / (s as f64);
        self
    }
    pub fn get_slow(&self) -> f64 {
        self.slow
    }
    pub fn update(&mut self, x: f64) {
        if self.from_scratch {
            self.fast = x;
            self.slow = x;
            self.from_scratch = false;
            return;
        }
        self.fast = self.fe * x + (1.0 - self.fe) * self.fast;
        self.slow = self.se * x + (1.0 - self.se) * self.slow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema2_seeds_with_first_sample() {
        let mut e = Ema2::new(2).with_slow(64);
        e.update(4.0);
        assert_eq!(e.get(), 4.0);
        assert_eq!(e.get_slow(), 4.0);
        assert!((e.trend() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ema2_trend() {
        let mut e = Ema2::new(2).with_slow(64);
        for _ in 0..16 {
            e.update(1.0);
        }
        for _ in 0..4 {
            e.update(10.0);
        }
        // the fast window reacts earlier than the slow one
        assert!(1.0 < e.trend());
    }
}
