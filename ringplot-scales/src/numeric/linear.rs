#[derive(Clone, Debug)]
pub struct LinearNumericScaleConfig {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub clamp: bool,
}

impl Default for LinearNumericScaleConfig {
    fn default() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
            clamp: false,
        }
    }
}

/// A linear scale that maps numeric input values from a domain to a range.
#[derive(Clone, Debug)]
pub struct LinearNumericScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    clamp: bool,
}

impl LinearNumericScale {
    pub fn new(config: &LinearNumericScaleConfig) -> Self {
        Self {
            domain_start: config.domain.0,
            domain_end: config.domain.1,
            range_start: config.range.0,
            range_end: config.range.1,
            clamp: config.clamp,
        }
    }

    /// True when the domain has zero (or undefined) span, so every input
    /// maps to the start of the range.
    pub fn is_degenerate(&self) -> bool {
        self.domain_start == self.domain_end
            || self.domain_start.is_nan()
            || self.domain_end.is_nan()
    }

    /// Maps a value from domain to range
    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() || self.range_start.is_nan() || self.range_end.is_nan() {
            return self.range_start;
        }

        // Halved so a domain spanning most of f64 does not overflow
        let t = (value / 2.0 - self.domain_start / 2.0)
            / (self.domain_end / 2.0 - self.domain_start / 2.0);
        let v = self.range_start + t * (self.range_end - self.range_start);
        if self.clamp {
            let (range_min, range_max) = if self.range_start <= self.range_end {
                (self.range_start, self.range_end)
            } else {
                (self.range_end, self.range_start)
            };
            v.clamp(range_min, range_max)
        } else {
            v
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn scale(domain: (f64, f64), range: (f64, f64), clamp: bool) -> LinearNumericScale {
        LinearNumericScale::new(&LinearNumericScaleConfig {
            domain,
            range,
            clamp,
        })
    }

    #[test]
    fn test_defaults() {
        let scale = LinearNumericScale::new(&Default::default());
        assert!(!scale.clamp);
        assert_approx_eq!(f64, scale.scale(0.5), 0.5);
    }

    #[test]
    fn test_scale() {
        let scale = scale((10.0, 30.0), (0.0, 100.0), true);
        let result: Vec<f64> = [0.0, 10.0, 15.0, 20.0, 30.0, 40.0]
            .iter()
            .map(|v| scale.scale(*v))
            .collect();

        assert_approx_eq!(f64, result[0], 0.0); // clamped
        assert_approx_eq!(f64, result[1], 0.0);
        assert_approx_eq!(f64, result[2], 25.0);
        assert_approx_eq!(f64, result[3], 50.0);
        assert_approx_eq!(f64, result[4], 100.0);
        assert_approx_eq!(f64, result[5], 100.0); // clamped
    }

    #[test]
    fn test_scale_unclamped() {
        let scale = scale((0.0, 10.0), (0.0, 1.0), false);
        assert_approx_eq!(f64, scale.scale(20.0), 2.0);
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = scale((7.0, 7.0), (0.0, 1.0), false);
        assert!(scale.is_degenerate());
        assert_eq!(scale.scale(7.0), 0.0);
    }

    #[test]
    fn test_reversed_range() {
        let scale = scale((0.0, 1.0), (1.0, 0.0), true);
        assert_approx_eq!(f64, scale.scale(0.25), 0.75);
        assert_approx_eq!(f64, scale.scale(2.0), 0.0);
    }

    #[test]
    fn test_extreme_domain_stays_finite() {
        let scale = scale((-f64::MAX, f64::MAX), (0.0, 1.0), true);
        assert_approx_eq!(f64, scale.scale(f64::MAX), 1.0);
        assert_approx_eq!(f64, scale.scale(-f64::MAX), 0.0);
        assert_approx_eq!(f64, scale.scale(0.0), 0.5);
    }
}
