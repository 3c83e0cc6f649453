//! Linear scales
//!
//! A continuous linear map from a domain interval onto a range interval,
//! with "nice" domain rounding and tick generation for axis labels.

/// Step multipliers: past sqrt(50) round to 10, past sqrt(10) to 5, past sqrt(2) to 2.
const E10: f64 = 7.0710678118654755;
const E5: f64 = 3.1622776601683795;
const E2: f64 = std::f64::consts::SQRT_2;

/// Default number of ticks requested when niceing a domain
pub const DEFAULT_TICKS: f64 = 10.0;

/// Linear map `domain → range`.
///
/// Interpolation is `r0 * (1 - t) + r1 * t`, which is exact at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Identity scale over `[0, extent]`
    pub fn identity(extent: f64) -> Self {
        Self::new((0.0, extent), (0.0, extent))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to the range.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        let t = (x - d0) / (d1 - d0);
        r0 * (1.0 - t) + r1 * t
    }

    /// Map a range value back to the domain.
    pub fn invert(&self, y: f64) -> f64 {
        LinearScale::new(self.range, self.domain).map(y)
    }

    /// Extend the domain outward to round tick-step boundaries.
    ///
    /// The range is untouched, so the niced scale maps differently from the
    /// original one; use it for axes, not for data.
    pub fn nice(&self, count: f64) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut previous_step: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if Some(step) == previous_step {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous_step = Some(step);
        }

        let domain = if reversed { (stop, start) } else { (start, stop) };
        Self::new(domain, self.range)
    }

    /// Roughly `count` round values spanning the domain.
    pub fn ticks(&self, count: f64) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Signed tick step for `count` ticks over `[start, stop]`.
///
/// Positive values are the step itself; negative values are the reciprocal
/// of the step (so fractional steps stay exact).
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = step_factor(error);
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

fn step_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Tick values for `count` ticks over `[start, stop]`, inclusive where round.
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    if stop < start {
        let mut reversed = ticks(stop, start, count);
        reversed.reverse();
        return reversed;
    }

    let (i1, i2, inc) = tick_spec(start, stop, count);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    (0..n)
        .map(|i| {
            let k = (i1 + i as i64) as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect()
}

/// First/last tick index and signed increment.
fn tick_spec(start: f64, stop: f64, count: f64) -> (i64, i64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = step_factor(error);

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scaled = 10f64.powf(-power) / factor;
        i1 = (start * scaled).round() as i64;
        i2 = (stop * scaled).round() as i64;
        if (i1 as f64) / scaled < start {
            i1 += 1;
        }
        if (i2 as f64) / scaled > stop {
            i2 -= 1;
        }
        inc = -scaled;
    } else {
        let scaled = 10f64.powf(power) * factor;
        i1 = (start / scaled).round() as i64;
        i2 = (stop / scaled).round() as i64;
        if (i1 as f64) * scaled < start {
            i1 += 1;
        }
        if (i2 as f64) * scaled > stop {
            i2 -= 1;
        }
        inc = scaled;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_map_is_exact_at_endpoints() {
        let scale = LinearScale::new((0.0, 2000.0), (0.0, 800.0));
        assert_eq!(scale.map(0.0), 0.0);
        assert_eq!(scale.map(2000.0), 800.0);
        assert_eq!(scale.map(1000.0), 400.0);
    }

    #[test]
    fn test_inverted_range() {
        let scale = LinearScale::new((0.0, 100.0), (400.0, 0.0));
        assert_eq!(scale.map(0.0), 400.0);
        assert_eq!(scale.map(100.0), 0.0);
        assert_eq!(scale.map(50.0), 200.0);
        assert_relative_eq!(scale.invert(100.0), 75.0);
    }

    #[test]
    fn test_zero_width_domain_maps_to_midpoint() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 300.0));
        assert_eq!(scale.map(5.0), 150.0);
        assert_eq!(scale.map(-10.0), 150.0);
    }

    #[test]
    fn test_nice_rounds_outward() {
        let scale = LinearScale::new((0.0, 187_345.0), (0.0, 710.0));
        let niced = scale.nice(DEFAULT_TICKS);
        assert_eq!(niced.domain(), (0.0, 200_000.0));
        assert_eq!(niced.range(), (0.0, 710.0));

        let fractional = LinearScale::new((0.13, 0.87), (0.0, 1.0)).nice(DEFAULT_TICKS);
        assert_relative_eq!(fractional.domain().0, 0.1);
        assert_relative_eq!(fractional.domain().1, 0.9);
    }

    #[test]
    fn test_nice_keeps_round_domain() {
        let scale = LinearScale::new((0.0, 120_000.0), (0.0, 710.0));
        assert_eq!(scale.nice(DEFAULT_TICKS).domain(), (0.0, 120_000.0));
    }

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(0.0, 10.0, 10.0), (0..=10).map(f64::from).collect::<Vec<_>>());
        assert_eq!(ticks(0.0, 1.0, 5.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(0.0, 120_000.0, 50.0).len(), 61);
        assert_eq!(ticks(10.0, 0.0, 2.0), vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_ticks_degenerate() {
        assert!(ticks(0.0, 10.0, 0.0).is_empty());
        assert!(ticks(0.0, f64::NAN, 5.0).is_empty());
        assert_eq!(ticks(3.0, 3.0, 5.0), vec![3.0]);
    }
}
