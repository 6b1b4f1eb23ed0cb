use std::path::{
    Path,
    PathBuf
};

use chrono::NaiveDateTime;
use log::debug;

use crate::configuration::ReaderSettings;
use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;
use crate::profile::profile::Profile;
use crate::profile::profilekind::{
    ProfileKind,
    TaggedProfile
};
use crate::reader::dattable::DatTable;
use crate::reader::readererror::ReaderError;

/// Name of the one candidate column whose consecutive values never repeat.
///
/// Axes held fixed during a scan repeat their value on every row, so exactly
/// one candidate is expected to survive; none or several is an error.
pub fn find_axis(table: &DatTable, candidates: &[String]) -> Result<String, ReaderError> {
    let moving: Vec<String> = candidates
        .iter()
        .filter_map(|name| table.column(name).map(|values| (name, values)))
        .filter(|(_, values)| values.windows(2).all(|pair| pair[1] - pair[0] != 0.0))
        .map(|(name, _)| name.to_owned())
        .collect();

    match moving.as_slice() {
        [axis] => Ok(axis.to_owned()),
        _ => Err(ReaderError::AxisNotFound { candidates: moving })
    }
}

/// Pair positions with doses, dropping rows where either is not finite.
pub fn finite_samples(positions: &[f64], doses: &[f64]) -> Vec<Point2D> {
    let points: Vec<Point2D> = positions
        .iter()
        .zip(doses.iter())
        .map(|(&x, &y)| Point2D::new(x, y))
        .filter(|p| p.is_finite())
        .collect();
    let dropped = positions.len().min(doses.len()) - points.len();
    if dropped > 0 {
        debug!("dropped {} row(s) with non-finite values", dropped);
    }
    points
}

pub fn classify(axis: &str, settings: &ReaderSettings) -> ProfileKind {
    if settings.depth_axes().iter().any(|depth_axis| depth_axis == axis) {
        ProfileKind::Depth
    } else {
        ProfileKind::Lateral
    }
}

/// One measured profile with where and when it was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    source: Option<PathBuf>,
    measured_at: Option<NaiveDateTime>,
    axis: String,
    profile: TaggedProfile
}

impl Measurement {
    pub fn new(axis: String, profile: TaggedProfile) -> Measurement {
        Measurement {
            source: None,
            measured_at: None,
            axis,
            profile
        }
    }

    /// Pick the scan axis and dose column, clean the rows and build the
    /// profile kind the axis classifies to.
    pub fn from_table(table: &DatTable, settings: &ReaderSettings) -> Result<Measurement, ReaderError> {
        let axis = find_axis(table, settings.axis_candidates())?;
        let doses = table
            .column(settings.dose_column())
            .ok_or_else(|| ReaderError::DoseColumnMissing(settings.dose_column().to_owned()))?;
        let positions = table
            .column(&axis)
            .ok_or_else(|| ReaderError::AxisNotFound { candidates: vec![axis.clone()] })?;

        let profile = Profile::new(finite_samples(positions, doses))?;
        let kind = classify(&axis, settings);
        Ok(Measurement::new(axis, TaggedProfile::from_profile(kind, profile)))
    }

    pub fn from_path(path: &Path, settings: &ReaderSettings) -> Result<Measurement, ReaderError> {
        let table = DatTable::from_path(path)?;
        let mut measurement = Self::from_table(&table, settings)?;
        measurement.source = Some(path.to_path_buf());
        Ok(measurement)
    }

    /// Re-tag the profile, overriding the axis classification.
    pub fn with_kind(self, kind: ProfileKind) -> Measurement {
        if kind == self.profile.kind() {
            return self;
        }
        let profile = match self.profile {
            TaggedProfile::Depth(depth) => depth.into_profile(),
            TaggedProfile::Lateral(lateral) => lateral.into_profile()
        };
        Measurement {
            profile: TaggedProfile::from_profile(kind, profile),
            ..self
        }
    }

    pub fn with_measured_at(mut self, measured_at: Option<NaiveDateTime>) -> Measurement {
        self.measured_at = measured_at;
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn measured_at(&self) -> Option<NaiveDateTime> {
        self.measured_at
    }

    pub fn axis(&self) -> &str {
        &self.axis
    }

    pub fn kind(&self) -> ProfileKind {
        self.profile.kind()
    }

    pub fn profile(&self) -> &TaggedProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut TaggedProfile {
        &mut self.profile
    }
}
