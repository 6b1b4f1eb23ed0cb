use std::path::PathBuf;

use chrono::NaiveDateTime;
use log::warn;
use serde::Serialize;

use crate::configuration::{
    AnalysisConfiguration,
    MetricLevels
};
use crate::math::round::round;
use crate::profile::depthprofile::DepthProfile;
use crate::profile::lateralprofile::LateralProfile;
use crate::profile::profile::ProfileState;
use crate::profile::profileerror::ProfileError;
use crate::profile::profilekind::{
    ProfileKind,
    TaggedProfile
};
use crate::reader::measurement::Measurement;

/// Metric value as reported: `None` when the curve shape does not allow it.
///
/// A metric error other than too few samples (zero entrance dose for the
/// plateau ratio, say) only blanks that one metric and is logged.
fn reported(name: &str, value: Result<f64, ProfileError>, digits: Option<u32>) -> Option<f64> {
    match value {
        Ok(v) if v.is_finite() => Some(digits.map_or(v, |d| round(v, d))),
        Ok(_) => None,
        Err(error) => {
            warn!("{} not reported: {}", name, error);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthSummary {
    range: Option<f64>,
    max_plateau_ratio: Option<f64>,
    distal_falloff: Option<f64>,
    modulation: Option<f64>
}

impl DepthSummary {
    pub fn new(depth: &DepthProfile, levels: &MetricLevels, digits: Option<u32>) -> DepthSummary {
        DepthSummary {
            range: reported("range", depth.range(levels.range()), digits),
            max_plateau_ratio: reported("max_plateau_ratio", depth.max_plateau_ratio(), digits),
            distal_falloff: reported("distal_falloff", depth.distal_falloff(), digits),
            modulation: reported("modulation", depth.modulation(levels.modulation()), digits)
        }
    }

    pub fn range(&self) -> Option<f64> {
        self.range
    }

    pub fn max_plateau_ratio(&self) -> Option<f64> {
        self.max_plateau_ratio
    }

    pub fn distal_falloff(&self) -> Option<f64> {
        self.distal_falloff
    }

    pub fn modulation(&self) -> Option<f64> {
        self.modulation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LateralSummary {
    penumbra_left: Option<f64>,
    penumbra_right: Option<f64>,
    field_ratio: Option<f64>,
    symmetry: Option<f64>,
    flatness_50: Option<f64>,
    flatness_90: Option<f64>,
    asymmetry: Option<f64>
}

impl LateralSummary {
    pub fn new(lateral: &LateralProfile, levels: &MetricLevels, digits: Option<u32>) -> LateralSummary {
        LateralSummary {
            penumbra_left: reported("penumbra_left", lateral.penumbra_left(), digits),
            penumbra_right: reported("penumbra_right", lateral.penumbra_right(), digits),
            field_ratio: reported("field_ratio", lateral.field_ratio(levels.field_ratio()), digits),
            symmetry: reported("symmetry", lateral.symmetry(levels.symmetry()), digits),
            flatness_50: reported("flatness_50", lateral.flatness_50(), digits),
            flatness_90: reported("flatness_90", lateral.flatness_90(), digits),
            asymmetry: reported("asymmetry", lateral.asymmetry(), digits)
        }
    }

    pub fn penumbra_left(&self) -> Option<f64> {
        self.penumbra_left
    }

    pub fn penumbra_right(&self) -> Option<f64> {
        self.penumbra_right
    }

    pub fn field_ratio(&self) -> Option<f64> {
        self.field_ratio
    }

    pub fn symmetry(&self) -> Option<f64> {
        self.symmetry
    }

    pub fn flatness_50(&self) -> Option<f64> {
        self.flatness_50
    }

    pub fn flatness_90(&self) -> Option<f64> {
        self.flatness_90
    }

    pub fn asymmetry(&self) -> Option<f64> {
        self.asymmetry
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricSummary {
    Depth(DepthSummary),
    Lateral(LateralSummary)
}

impl MetricSummary {
    /// Evaluate every metric of the profile's family.
    pub fn new(profile: &TaggedProfile, config: &AnalysisConfiguration) -> Result<MetricSummary, ProfileError> {
        profile.profile().require_samples(2)?;
        let digits = config.rounding_digits();
        Ok(match profile {
            TaggedProfile::Depth(depth) => MetricSummary::Depth(DepthSummary::new(depth, config.levels(), digits)),
            TaggedProfile::Lateral(lateral) => {
                MetricSummary::Lateral(LateralSummary::new(lateral, config.levels(), digits))
            }
        })
    }
}

/// Serializable report of one measured profile and its metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    kind: ProfileKind,
    axis: String,
    source: Option<PathBuf>,
    measured_at: Option<NaiveDateTime>,
    samples: usize,
    state: ProfileState,
    metrics: MetricSummary
}

impl ProfileSummary {
    pub fn new(measurement: &Measurement, config: &AnalysisConfiguration) -> Result<ProfileSummary, ProfileError> {
        let profile = measurement.profile();
        Ok(ProfileSummary {
            kind: measurement.kind(),
            axis: measurement.axis().to_owned(),
            source: measurement.source().map(|path| path.to_path_buf()),
            measured_at: measurement.measured_at(),
            samples: profile.profile().len(),
            state: profile.profile().state(),
            metrics: MetricSummary::new(profile, config)?
        })
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn axis(&self) -> &str {
        &self.axis
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn state(&self) -> ProfileState {
        self.state
    }

    pub fn metrics(&self) -> &MetricSummary {
        &self.metrics
    }
}

/// Normalize the measurement when the configuration asks for it, then
/// summarise its metrics.
pub fn analyse(mut measurement: Measurement, config: &AnalysisConfiguration) -> Result<ProfileSummary, ProfileError> {
    let settings = config.normalization();
    if settings.enabled() {
        measurement.profile_mut().normalize(settings)?;
    }
    ProfileSummary::new(&measurement, config)
}
