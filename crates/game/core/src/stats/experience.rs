use crate::config::{ExpCurveConfig, GameConfig};

/// Cumulative experience required to reach a level.
///
/// `exp_for_level(1) = 0` and `exp_for_level(l) = round(base * (l - 1) ^ exponent)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpCurve {
    base: f64,
    exponent: f64,
}

impl ExpCurve {
    pub const fn new(base: f64, exponent: f64) -> Self {
        Self { base, exponent }
    }

    pub fn exp_for_level(&self, level: u32) -> u64 {
        if level <= 1 {
            return 0;
        }
        let value = (self.base * f64::from(level - 1).powf(self.exponent)).round();
        if value.is_finite() && value > 0.0 {
            value as u64
        } else {
            0
        }
    }
}

impl From<ExpCurveConfig> for ExpCurve {
    fn from(config: ExpCurveConfig) -> Self {
        Self::new(config.base, config.exponent)
    }
}

/// Experience thresholds precomputed up to the maximum level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpTable {
    /// `thresholds[i]` is the cumulative experience for level `i + 1`.
    thresholds: Vec<u64>,
}

impl ExpTable {
    pub fn new(curve: ExpCurve, max_level: u32) -> Self {
        let max_level = max_level.max(1);
        let mut thresholds: Vec<u64> = Vec::with_capacity(max_level as usize);
        for level in 1..=max_level {
            let value = curve.exp_for_level(level);
            // keep strictly increasing even for degenerate curves
            let value = match thresholds.last() {
                Some(&prev) if value <= prev => prev + 1,
                _ => value,
            };
            thresholds.push(value);
        }
        Self { thresholds }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.exp_curve.into(), config.max_level)
    }

    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Cumulative experience for `level`, saturating at the maximum level.
    pub fn exp_for_level(&self, level: u32) -> u64 {
        let index = level.clamp(1, self.max_level()) as usize - 1;
        self.thresholds[index]
    }

    /// Experience still needed to reach the level after `level`, or `None` at the cap.
    pub fn exp_to_next(&self, level: u32, exp: u64) -> Option<u64> {
        (level < self.max_level()).then(|| self.exp_for_level(level + 1).saturating_sub(exp))
    }

    /// Highest level whose threshold `exp` has reached.
    pub fn level_for_exp(&self, exp: u64) -> u32 {
        self.thresholds.partition_point(|threshold| *threshold <= exp) as u32
    }
}

impl Default for ExpTable {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_fixed_points() {
        let table = ExpTable::default();
        assert_eq!(table.exp_for_level(1), 0);
        assert_eq!(table.exp_for_level(2), 100);
        assert_eq!(table.exp_for_level(3), 214);
    }

    #[test]
    fn strictly_increasing() {
        let table = ExpTable::default();
        for level in 1..table.max_level() {
            assert!(table.exp_for_level(level) < table.exp_for_level(level + 1));
        }
    }

    #[test]
    fn level_lookup() {
        let table = ExpTable::default();
        assert_eq!(table.level_for_exp(0), 1);
        assert_eq!(table.level_for_exp(99), 1);
        assert_eq!(table.level_for_exp(100), 2);
        assert_eq!(table.level_for_exp(213), 2);
        assert_eq!(table.level_for_exp(214), 3);
        assert_eq!(table.level_for_exp(u64::MAX), 99);
        assert_eq!(table.exp_to_next(2, 150), Some(64));
        assert_eq!(table.exp_to_next(99, 0), None);
    }

    #[test]
    fn degenerate_curve_still_increases() {
        let table = ExpTable::new(ExpCurve::new(0.0, 1.0), 4);
        assert_eq!(table.exp_for_level(4), 3);
        assert_eq!(table.level_for_exp(0), 1);
    }
}
