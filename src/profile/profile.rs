use log::debug;
use serde::Serialize;

use crate::math::curve::curve::{
    Curve,
    CurveIntegration,
    ScanDirection
};
use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;
use crate::math::curve::nonparametriccurve::piecewiselinear::PiecewiseLinear;
use crate::profile::profileerror::ProfileError;

/// Number type the dose readings arrived in.
///
/// `Integral` doses can be translated exactly but dividing them needs a new
/// real-valued buffer, see `allow_cast` on the normalization methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DosePrecision {
    Integral,
    Real
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfileState {
    Raw,
    Normalized
}

/// Sampled dose curve shared by depth and lateral profiles.
///
/// Positions are sorted ascending at construction. Only normalization
/// mutates the samples, and it may run once.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    curve: PiecewiseLinear,
    precision: DosePrecision,
    state: ProfileState
}

impl Profile {
    pub fn new(points: Vec<Point2D>) -> Result<Profile, ProfileError> {
        Self::with_precision(points, DosePrecision::Real)
    }

    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Profile, ProfileError> {
        Self::new(pairs.iter().map(|&pair| Point2D::from(pair)).collect())
    }

    /// Build from integer readings; the dose buffer is marked `Integral`.
    pub fn from_integer_pairs(pairs: &[[i64; 2]]) -> Result<Profile, ProfileError> {
        let points = pairs
            .iter()
            .map(|&[x, y]| Point2D::new(x as f64, y as f64))
            .collect();
        Self::with_precision(points, DosePrecision::Integral)
    }

    fn with_precision(points: Vec<Point2D>, precision: DosePrecision) -> Result<Profile, ProfileError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ProfileError::NonFiniteSample { index });
        }
        let curve = PiecewiseLinear::new(points).ok_or(ProfileError::EmptyProfile)?;
        Ok(Profile {
            curve,
            precision,
            state: ProfileState::Raw
        })
    }

    /// Sorted positions.
    pub fn x(&self) -> &[f64] {
        self.curve.x_data()
    }

    /// Doses paired with [`Profile::x`].
    pub fn y(&self) -> &[f64] {
        self.curve.y_data()
    }

    pub fn len(&self) -> usize {
        self.curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }

    pub fn curve(&self) -> &PiecewiseLinear {
        &self.curve
    }

    pub fn precision(&self) -> DosePrecision {
        self.precision
    }

    pub fn state(&self) -> ProfileState {
        self.state
    }

    pub fn is_normalized(&self) -> bool {
        self.state == ProfileState::Normalized
    }

    pub fn y_min(&self) -> f64 {
        self.curve.min_y()
    }

    pub fn y_max(&self) -> f64 {
        self.curve.max_y()
    }

    pub fn require_samples(&self, required: usize) -> Result<(), ProfileError> {
        if self.len() < required {
            return Err(ProfileError::TooFewSamples { required, actual: self.len() });
        }
        Ok(())
    }

    /// Crossing lookup, `None` when `level` is not bracketed from that edge.
    pub fn crossing(&self, level: f64, direction: ScanDirection) -> Result<Option<f64>, ProfileError> {
        self.require_samples(2)?;
        Ok(self.curve.crossing(level, direction))
    }

    /// Position where dose equals `level` scanning from `direction`, `NaN` if absent.
    pub fn x_at_y(&self, level: f64, direction: ScanDirection) -> Result<f64, ProfileError> {
        Ok(self.crossing(level, direction)?.unwrap_or(f64::NAN))
    }

    /// `x_at_y(level, FromRight) - x_at_y(level, FromLeft)`.
    pub fn width(&self, level: f64) -> Result<f64, ProfileError> {
        self.require_samples(2)?;
        Ok(self.curve.width(level).unwrap_or(f64::NAN))
    }

    /// Interpolated dose at `x`, `NaN` outside the sampled positions.
    pub fn y_at_x(&self, x: f64) -> f64 {
        self.curve.value(x).unwrap_or(f64::NAN)
    }

    /// Trapezoid dose integral over `[a, b]` clipped to the sampled range.
    pub fn integral(&self, a: f64, b: f64) -> Result<f64, ProfileError> {
        self.require_samples(2)?;
        Ok(self.curve.integral(a, b))
    }

    /// Checks every normalization shares: runs once, and an integral buffer
    /// may only be divided when casting is allowed.
    pub(crate) fn check_normalizable(&self, allow_cast: bool) -> Result<(), ProfileError> {
        if self.is_normalized() {
            return Err(ProfileError::AlreadyNormalized);
        }
        if self.precision == DosePrecision::Integral && !allow_cast {
            return Err(ProfileError::CastNotAllowed);
        }
        Ok(())
    }

    /// `y <- (y - dose_offset) / divisor`, `x <- x - position_offset`.
    ///
    /// With `allow_cast` the scaled doses land in a freshly allocated real
    /// buffer; otherwise the existing buffer is divided in place.
    pub(crate) fn apply_normalization(
        &mut self,
        dose_offset: f64,
        position_offset: f64,
        divisor: f64,
        allow_cast: bool,
    ) {
        debug!(
            "normalizing {} samples: dose offset {}, position offset {}, divisor {}",
            self.len(),
            dose_offset,
            position_offset,
            divisor
        );
        self.curve.translate_y(-dose_offset);
        if position_offset != 0.0 {
            self.curve.translate_x(-position_offset);
        }
        if allow_cast {
            self.curve = self.curve.scaled_y(divisor);
            self.precision = DosePrecision::Real;
        } else {
            self.curve.scale_y(divisor);
        }
        self.state = ProfileState::Normalized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_sorts_samples() {
        let profile = Profile::from_pairs(&[[10.0, 20.0], [0.0, 1.0]]).unwrap();
        assert_eq!(profile.x(), &[0.0, 10.0]);
        assert_eq!(profile.y(), &[1.0, 20.0]);
        assert_eq!(profile.state(), ProfileState::Raw);
        assert_eq!(profile.precision(), DosePrecision::Real);
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        assert_eq!(Profile::from_pairs(&[]), Err(ProfileError::EmptyProfile));
        assert_eq!(
            Profile::from_pairs(&[[0.0, 1.0], [1.0, f64::NAN]]),
            Err(ProfileError::NonFiniteSample { index: 1 })
        );
        assert_eq!(
            Profile::from_pairs(&[[f64::INFINITY, 1.0]]),
            Err(ProfileError::NonFiniteSample { index: 0 })
        );
    }

    #[test]
    fn test_integer_pairs_are_integral() {
        let profile = Profile::from_integer_pairs(&[[0, 1], [10, 20]]).unwrap();
        assert_eq!(profile.precision(), DosePrecision::Integral);
        assert_eq!(profile.x(), &[0.0, 10.0]);
    }

    #[test]
    fn test_single_sample_metrics_fail() {
        let profile = Profile::from_pairs(&[[0.0, 1.0]]).unwrap();
        let err = ProfileError::TooFewSamples { required: 2, actual: 1 };
        assert_eq!(profile.width(0.5), Err(err.clone()));
        assert_eq!(profile.x_at_y(1.0, ScanDirection::FromLeft), Err(err.clone()));
        assert_eq!(profile.integral(0.0, 1.0), Err(err));
        assert_eq!(profile.y_at_x(0.0), 1.0);
    }

    #[test]
    fn test_width_nan_iff_a_crossing_is_nan() {
        let profile = Profile::from_pairs(&[[0.0, 0.0], [1.0, 2.0], [2.0, 3.0], [3.0, 1.0]]).unwrap();
        for level in [0.0, 0.5, 1.0, 1.5, 2.5, 3.0, 3.5] {
            let left = profile.x_at_y(level, ScanDirection::FromLeft).unwrap();
            let right = profile.x_at_y(level, ScanDirection::FromRight).unwrap();
            let width = profile.width(level).unwrap();
            if left.is_nan() || right.is_nan() {
                assert!(width.is_nan(), "level {}", level);
            } else {
                assert_eq!(width, right - left, "level {}", level);
            }
        }
    }

    #[test]
    fn test_y_at_x_outside_is_nan() {
        let profile = Profile::from_pairs(&[[0.0, 0.0], [2.0, 4.0]]).unwrap();
        assert_eq!(profile.y_at_x(1.0), 2.0);
        assert!(profile.y_at_x(-0.1).is_nan());
        assert!(profile.y_at_x(2.1).is_nan());
    }

    #[test]
    fn test_apply_normalization_paths() {
        let mut cast = Profile::from_integer_pairs(&[[0, 2], [1, 6]]).unwrap();
        assert_eq!(cast.check_normalizable(false), Err(ProfileError::CastNotAllowed));
        assert!(cast.check_normalizable(true).is_ok());
        cast.apply_normalization(2.0, 0.5, 4.0, true);
        assert_eq!(cast.x(), &[-0.5, 0.5]);
        assert_eq!(cast.y(), &[0.0, 1.0]);
        assert_eq!(cast.precision(), DosePrecision::Real);
        assert_eq!(cast.check_normalizable(true), Err(ProfileError::AlreadyNormalized));

        let mut in_place = Profile::from_pairs(&[[0.0, 2.0], [1.0, 6.0]]).unwrap();
        in_place.apply_normalization(2.0, 0.0, 4.0, false);
        assert_eq!(in_place.y(), &[0.0, 1.0]);
        assert!(in_place.is_normalized());
    }
}
