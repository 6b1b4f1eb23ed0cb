use std::fmt;

use serde::{
    Deserialize,
    Serialize
};

use crate::configuration::NormalizationSettings;
use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;
use crate::profile::depthprofile::DepthProfile;
use crate::profile::lateralprofile::LateralProfile;
use crate::profile::profile::Profile;
use crate::profile::profileerror::ProfileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Depth,
    Lateral
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::Depth => write!(f, "depth"),
            ProfileKind::Lateral => write!(f, "lateral")
        }
    }
}

/// A profile together with the metric family that applies to it.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedProfile {
    Depth(DepthProfile),
    Lateral(LateralProfile)
}

impl TaggedProfile {
    pub fn new(kind: ProfileKind, points: Vec<Point2D>) -> Result<TaggedProfile, ProfileError> {
        Ok(Self::from_profile(kind, Profile::new(points)?))
    }

    pub fn from_profile(kind: ProfileKind, profile: Profile) -> TaggedProfile {
        match kind {
            ProfileKind::Depth => TaggedProfile::Depth(DepthProfile::from_profile(profile)),
            ProfileKind::Lateral => TaggedProfile::Lateral(LateralProfile::from_profile(profile))
        }
    }

    pub fn kind(&self) -> ProfileKind {
        match self {
            TaggedProfile::Depth(_) => ProfileKind::Depth,
            TaggedProfile::Lateral(_) => ProfileKind::Lateral
        }
    }

    pub fn profile(&self) -> &Profile {
        match self {
            TaggedProfile::Depth(depth) => depth.profile(),
            TaggedProfile::Lateral(lateral) => lateral.profile()
        }
    }

    /// Run the normalization matching the profile kind. Depth profiles ignore
    /// the window half-width.
    pub fn normalize(&mut self, settings: &NormalizationSettings) -> Result<(), ProfileError> {
        match self {
            TaggedProfile::Depth(depth) => depth.normalize(settings.allow_cast()),
            TaggedProfile::Lateral(lateral) => {
                lateral.normalize(settings.window_half_width(), settings.allow_cast())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[[f64; 2]]) -> Vec<Point2D> {
        pairs.iter().map(|&p| Point2D::from(p)).collect()
    }

    #[test]
    fn test_tag_selects_metric_family() {
        let depth = TaggedProfile::new(ProfileKind::Depth, points(&[[0.0, 1.0], [10.0, 20.0]])).unwrap();
        assert_eq!(depth.kind(), ProfileKind::Depth);
        assert!(matches!(depth, TaggedProfile::Depth(_)));
        assert_eq!(depth.profile().x(), &[0.0, 10.0]);

        let lateral = TaggedProfile::new(ProfileKind::Lateral, points(&[[1.0, 0.0], [0.0, 1.0]])).unwrap();
        assert_eq!(lateral.kind(), ProfileKind::Lateral);
        assert_eq!(lateral.profile().x(), &[0.0, 1.0]);
    }

    #[test]
    fn test_normalize_dispatch() {
        let settings = NormalizationSettings::new(true, 1.0, true);

        let mut depth = TaggedProfile::new(ProfileKind::Depth, points(&[[0.0, 2.0], [1.0, 6.0]])).unwrap();
        depth.normalize(&settings).unwrap();
        assert_eq!(depth.profile().y(), &[0.0, 1.0]);

        let mut lateral = TaggedProfile::new(
            ProfileKind::Lateral,
            points(&[[-3.0, 4.0], [-1.0, 8.0], [0.0, 8.0], [1.0, 4.0]]),
        )
        .unwrap();
        lateral.normalize(&settings).unwrap();
        assert_eq!(lateral.profile().x()[0], -2.25);
        assert!(lateral.profile().is_normalized());
    }

    #[test]
    fn test_kind_serde_names() {
        assert_eq!(serde_json::to_string(&ProfileKind::Depth).unwrap(), "\"depth\"");
        let kind: ProfileKind = serde_json::from_str("\"lateral\"").unwrap();
        assert_eq!(kind, ProfileKind::Lateral);
        assert_eq!(ProfileKind::Depth.to_string(), "depth");
    }
}
