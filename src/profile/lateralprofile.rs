use std::ops::Deref;

use log::debug;

use crate::math::curve::curve::{
    Curve,
    CurveIntegration,
    ScanDirection
};
use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;
use crate::profile::profile::Profile;
use crate::profile::profileerror::ProfileError;

/// Dose level a flatness region is anchored to.
///
/// `Fifty` trims two mean penumbra widths inside the 50% crossings, `Ninety`
/// one mean penumbra width inside the 90% crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatnessLevel {
    Fifty,
    Ninety
}

impl FlatnessLevel {
    pub fn level(&self) -> f64 {
        match self {
            FlatnessLevel::Fifty => 0.5,
            FlatnessLevel::Ninety => 0.9
        }
    }

    /// Penumbra widths trimmed from each side of the anchor crossings.
    pub fn margin(&self) -> f64 {
        match self {
            FlatnessLevel::Fifty => 2.0,
            FlatnessLevel::Ninety => 1.0
        }
    }
}

fn check_level(level: f64) -> Result<(), ProfileError> {
    if !(0.0..=1.0).contains(&level) {
        return Err(ProfileError::LevelOutOfRange(level));
    }
    Ok(())
}

/// Relative spread `(a - b) / (a + b)` scaled by `factor`.
fn relative_difference(a: f64, b: f64, factor: f64) -> f64 {
    (a - b) / (a + b) * factor
}

/// Dose across the beam, roughly symmetric about its centre.
///
/// Penumbra, symmetry and flatness read absolute dose levels, so they are
/// meaningful once [`LateralProfile::normalize`] has removed the noise floor
/// and scaled the central dose to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct LateralProfile {
    profile: Profile
}

impl LateralProfile {
    pub fn new(points: Vec<Point2D>) -> Result<LateralProfile, ProfileError> {
        Ok(LateralProfile { profile: Profile::new(points)? })
    }

    pub fn from_profile(profile: Profile) -> LateralProfile {
        LateralProfile { profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }

    fn penumbra(&self, direction: ScanDirection) -> Result<Option<f64>, ProfileError> {
        let low = self.profile.crossing(0.1, direction)?;
        let high = self.profile.crossing(0.9, direction)?;
        Ok(match (low, high) {
            (Some(low), Some(high)) => Some(match direction {
                ScanDirection::FromLeft => high - low,
                ScanDirection::FromRight => low - high
            }),
            _ => None
        })
    }

    /// Width of the rising 10%-90% edge, `NaN` if either level is not crossed.
    pub fn penumbra_left(&self) -> Result<f64, ProfileError> {
        Ok(self.penumbra(ScanDirection::FromLeft)?.unwrap_or(f64::NAN))
    }

    /// Width of the falling 90%-10% edge, `NaN` if either level is not crossed.
    pub fn penumbra_right(&self) -> Result<f64, ProfileError> {
        Ok(self.penumbra(ScanDirection::FromRight)?.unwrap_or(f64::NAN))
    }

    /// `width(level) / width(0.5)`.
    pub fn field_ratio(&self, level: f64) -> Result<f64, ProfileError> {
        check_level(level)?;
        Ok(self.profile.width(level)? / self.profile.width(0.5)?)
    }

    /// Relative difference of the left and right crossing distances from
    /// the origin, in percent of their mean.
    pub fn symmetry(&self, level: f64) -> Result<f64, ProfileError> {
        check_level(level)?;
        let left = self.profile.crossing(level, ScanDirection::FromLeft)?;
        let right = self.profile.crossing(level, ScanDirection::FromRight)?;
        Ok(match (left, right) {
            (Some(left), Some(right)) => {
                let (a, b) = (left.abs(), right.abs());
                relative_difference(a.max(b), a.min(b), 200.0)
            }
            _ => f64::NAN
        })
    }

    /// Dose variation over the flat region, in percent.
    ///
    /// The region is bounded by the `variant` crossings pulled inwards by the
    /// mean penumbra. Its extrema also consider the interpolated dose right at
    /// both bounds, so a peak or dip falling between two samples at the edge
    /// still counts. A region that collapses (`left > right`) reduces to those
    /// two interpolated doses.
    pub fn flatness(&self, variant: FlatnessLevel) -> Result<f64, ProfileError> {
        let (Some(penumbra_left), Some(penumbra_right)) =
            (self.penumbra(ScanDirection::FromLeft)?, self.penumbra(ScanDirection::FromRight)?)
        else {
            return Ok(f64::NAN);
        };
        let (Some(anchor_left), Some(anchor_right)) = (
            self.profile.crossing(variant.level(), ScanDirection::FromLeft)?,
            self.profile.crossing(variant.level(), ScanDirection::FromRight)?,
        ) else {
            return Ok(f64::NAN);
        };

        let d = (penumbra_left + penumbra_right) / 2.0;
        let left = anchor_left + variant.margin() * d;
        let right = anchor_right - variant.margin() * d;

        let curve = self.profile.curve();
        let doses: Vec<f64> = curve
            .points_within(left, right)
            .map(|p| p.y())
            .chain(curve.value(left))
            .chain(curve.value(right))
            .collect();
        if doses.is_empty() {
            return Ok(f64::NAN);
        }

        let p_max = doses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let p_min = doses.iter().copied().fold(f64::INFINITY, f64::min);
        Ok(relative_difference(p_max, p_min, 100.0))
    }

    pub fn flatness_50(&self) -> Result<f64, ProfileError> {
        self.flatness(FlatnessLevel::Fifty)
    }

    pub fn flatness_90(&self) -> Result<f64, ProfileError> {
        self.flatness(FlatnessLevel::Ninety)
    }

    /// Relative difference of the dose integrated left and right of
    /// position 0, in percent. Both halves are closed at exactly 0.
    pub fn asymmetry(&self) -> Result<f64, ProfileError> {
        self.profile.require_samples(2)?;
        let curve = self.profile.curve();
        let area_left = curve.integral(f64::NEG_INFINITY, 0.0);
        let area_right = curve.integral(0.0, f64::INFINITY);
        Ok(relative_difference(area_left, area_right, 100.0))
    }

    /// Remove the noise floor, centre the profile on its half-maximum
    /// crossings and scale doses so their mean over `[-dt, dt]` is 1.
    ///
    /// The window mean is the trapezoid integral over `[-dt, dt]` (closed with
    /// interpolated doses at `±dt`) divided by `2 * dt`. Every check, including
    /// the half-maximum lookup and the zero-area guard, runs on a scratch copy
    /// before the profile is touched, so an error leaves it unchanged.
    pub fn normalize(&mut self, dt: f64, allow_cast: bool) -> Result<(), ProfileError> {
        self.profile.check_normalizable(allow_cast)?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ProfileError::InvalidWindow(dt));
        }
        self.profile.require_samples(2)?;

        let floor = self.profile.y_min();
        let mut scratch = self.profile.curve().clone();
        scratch.translate_y(-floor);

        let half_max = scratch.max_y() / 2.0;
        let (Some(left), Some(width)) =
            (scratch.crossing(half_max, ScanDirection::FromLeft), scratch.width(half_max))
        else {
            return Err(ProfileError::MissingHalfMaximum);
        };
        let mid = left + width / 2.0;
        scratch.translate_x(-mid);

        let area = scratch.integral(-dt, dt);
        let reference = area / (2.0 * dt);
        if !(reference.is_finite() && reference != 0.0) {
            return Err(ProfileError::ZeroReferenceDose);
        }

        debug!(
            "lateral normalization: floor {}, half maximum {}, centre {}, window area {}",
            floor, half_max, mid, area
        );
        self.profile.apply_normalization(floor, mid, reference, allow_cast);
        Ok(())
    }
}

impl Deref for LateralProfile {
    type Target = Profile;

    fn deref(&self) -> &Profile {
        &self.profile
    }
}
