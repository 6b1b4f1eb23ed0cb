use std::ops::Deref;

use log::debug;

use crate::math::curve::curve::ScanDirection;
use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;
use crate::profile::profile::Profile;
use crate::profile::profileerror::ProfileError;

/// Dose against penetration depth.
///
/// Metrics assume doses already scaled to `[0, 1]`, see
/// [`DepthProfile::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct DepthProfile {
    profile: Profile
}

impl DepthProfile {
    pub fn new(points: Vec<Point2D>) -> Result<DepthProfile, ProfileError> {
        Ok(DepthProfile { profile: Profile::new(points)? })
    }

    pub fn from_profile(profile: Profile) -> DepthProfile {
        DepthProfile { profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }

    /// Depth where the distal edge falls through `level`.
    pub fn range(&self, level: f64) -> Result<f64, ProfileError> {
        self.profile.x_at_y(level, ScanDirection::FromRight)
    }

    /// `max(dose) / dose[0]`, flatness of the build-up region.
    pub fn max_plateau_ratio(&self) -> Result<f64, ProfileError> {
        let entrance = self.profile.y()[0];
        if entrance == 0.0 {
            return Err(ProfileError::ZeroEntranceDose);
        }
        Ok(self.profile.y_max() / entrance)
    }

    /// Distance over which the distal edge falls from 0.9 to 0.1.
    pub fn distal_falloff(&self) -> Result<f64, ProfileError> {
        let low = self.profile.crossing(0.1, ScanDirection::FromRight)?;
        let high = self.profile.crossing(0.9, ScanDirection::FromRight)?;
        Ok(match (low, high) {
            (Some(low), Some(high)) => low - high,
            _ => f64::NAN
        })
    }

    /// Spread of the region above `level`.
    ///
    /// Build-up curves often start above low levels, so when the rising edge
    /// never crosses `level` the entrance depth stands in for it.
    pub fn modulation(&self, level: f64) -> Result<f64, ProfileError> {
        let Some(distal) = self.profile.crossing(level, ScanDirection::FromRight)? else {
            return Ok(f64::NAN);
        };
        let proximal = self
            .profile
            .crossing(level, ScanDirection::FromLeft)?
            .unwrap_or(self.profile.x()[0]);
        Ok(distal - proximal)
    }

    /// Shift doses so the minimum is 0, then scale so the maximum is 1.
    ///
    /// `allow_cast` picks between scaling into a new real buffer and dividing
    /// the existing one in place; the latter fails on integral doses. Nothing
    /// is mutated when an error is returned.
    pub fn normalize(&mut self, allow_cast: bool) -> Result<(), ProfileError> {
        self.profile.check_normalizable(allow_cast)?;

        let floor = self.profile.y_min();
        let span = self.profile.y_max() - floor;
        if span <= 0.0 {
            return Err(ProfileError::FlatProfile);
        }

        debug!("depth normalization: floor {}, span {}", floor, span);
        self.profile.apply_normalization(floor, 0.0, span, allow_cast);
        Ok(())
    }
}

impl Deref for DepthProfile {
    type Target = Profile;

    fn deref(&self) -> &Profile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::profile::profile::DosePrecision;

    fn depth(pairs: &[[f64; 2]]) -> DepthProfile {
        DepthProfile::from_profile(Profile::from_pairs(pairs).unwrap())
    }

    /// Bragg-peak-like curve already scaled to [0, 1].
    fn bragg() -> DepthProfile {
        depth(&[
            [0.0, 0.3],
            [10.0, 0.35],
            [20.0, 0.45],
            [25.0, 0.7],
            [27.0, 1.0],
            [28.0, 0.5],
            [29.0, 0.1],
            [30.0, 0.0],
        ])
    }

    #[test]
    fn test_range() {
        let profile = bragg();
        // distal edge between (27, 1.0) and (28, 0.5)
        assert_relative_eq!(profile.range(0.9).unwrap(), 27.2, epsilon = 1e-12);
        assert_relative_eq!(profile.range(0.5).unwrap(), 28.0, epsilon = 1e-12);
        assert!(profile.range(1.1).unwrap().is_nan());
    }

    #[test]
    fn test_max_plateau_ratio() {
        let profile = bragg();
        assert_relative_eq!(profile.max_plateau_ratio().unwrap(), 1.0 / 0.3, epsilon = 1e-12);

        let zero_entrance = depth(&[[0.0, 0.0], [1.0, 1.0]]);
        assert_eq!(zero_entrance.max_plateau_ratio(), Err(ProfileError::ZeroEntranceDose));
    }

    #[test]
    fn test_distal_falloff() {
        let profile = bragg();
        // 0.1 at 29.0, 0.9 at 27.2
        assert_relative_eq!(profile.distal_falloff().unwrap(), 1.8, epsilon = 1e-12);

        let never_falls = depth(&[[0.0, 0.0], [1.0, 0.5], [2.0, 1.0]]);
        assert!(never_falls.distal_falloff().unwrap().is_nan());
    }

    #[test]
    fn test_modulation_uses_both_edges() {
        let profile = bragg();
        // rising edge reaches 0.5 between (20, 0.45) and (25, 0.7) at 21.0
        assert_relative_eq!(profile.modulation(0.5).unwrap(), 28.0 - 21.0, epsilon = 1e-12);
    }

    #[test]
    fn test_modulation_falls_back_to_entrance() {
        let profile = bragg();
        // entrance dose 0.3 is already above 0.2: no rising crossing
        assert!(profile.x_at_y(0.2, ScanDirection::FromLeft).unwrap().is_nan());
        let distal = profile.range(0.2).unwrap();
        assert_relative_eq!(profile.modulation(0.2).unwrap(), distal - 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_modulation_without_distal_crossing() {
        let profile = bragg();
        assert!(profile.modulation(1.5).unwrap().is_nan());
    }

    #[test]
    fn test_normalize_scales_to_unit_range() {
        let mut profile = depth(&[[0.0, 2.0], [1.0, 10.0], [2.0, 6.0], [3.0, 2.0]]);
        profile.normalize(true).unwrap();
        assert_eq!(profile.y(), &[0.0, 1.0, 0.5, 0.0]);
        assert_eq!(profile.x(), &[0.0, 1.0, 2.0, 3.0]);
        assert!(profile.is_normalized());
    }

    #[test]
    fn test_normalize_in_place_on_real_buffer() {
        let mut profile = depth(&[[0.0, 1.0], [10.0, 3.0]]);
        profile.normalize(false).unwrap();
        assert_eq!(profile.y(), &[0.0, 1.0]);
    }

    #[test]
    fn test_normalize_integral_buffer() {
        let mut strict = DepthProfile::from_profile(Profile::from_integer_pairs(&[[0, 1], [10, 20]]).unwrap());
        assert_eq!(strict.normalize(false), Err(ProfileError::CastNotAllowed));
        // untouched after the failure
        assert_eq!(strict.y(), &[1.0, 20.0]);
        assert!(!strict.is_normalized());

        strict.normalize(true).unwrap();
        assert_eq!(strict.precision(), DosePrecision::Real);
        assert_eq!(strict.y(), &[0.0, 1.0]);
    }

    #[test]
    fn test_normalize_rejects_flat_and_repeated_calls() {
        let mut flat = depth(&[[0.0, 2.0], [1.0, 2.0]]);
        assert_eq!(flat.normalize(true), Err(ProfileError::FlatProfile));

        let mut once = depth(&[[0.0, 0.0], [1.0, 2.0]]);
        once.normalize(true).unwrap();
        assert_eq!(once.normalize(true), Err(ProfileError::AlreadyNormalized));
    }
}
