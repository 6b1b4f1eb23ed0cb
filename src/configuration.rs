use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("cannot open configuration: {0}")]
    IOError(#[from] std::io::Error),

    #[error("cannot parse configuration: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String)
}

// ─────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────

/// How measurement tables are located and read.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReaderSettings {
    dose_column: String,
    axis_candidates: Vec<String>,
    depth_axes: Vec<String>,
    file_extension: String,
    directory_date_format: String
}

impl Default for ReaderSettings {
    fn default() -> Self {
        ReaderSettings {
            dose_column: "Wylicz".to_owned(),
            axis_candidates: ["X", "Y", "Z", "PB"].iter().map(|s| s.to_string()).collect(),
            depth_axes: vec!["Z".to_owned()],
            file_extension: "dat".to_owned(),
            directory_date_format: "%Y-%m-%d_%H_%M_%S".to_owned()
        }
    }
}

impl ReaderSettings {
    pub fn dose_column(&self) -> &str {
        &self.dose_column
    }

    /// Column names that may hold the scanned spatial axis.
    pub fn axis_candidates(&self) -> &[String] {
        &self.axis_candidates
    }

    /// Axes along which a scan is a depth profile; any other axis is lateral.
    pub fn depth_axes(&self) -> &[String] {
        &self.depth_axes
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// `chrono` format of the directory name holding a measurement.
    pub fn directory_date_format(&self) -> &str {
        &self.directory_date_format
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizationSettings {
    enabled: bool,
    window_half_width: f64,
    allow_cast: bool
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        NormalizationSettings {
            enabled: true,
            window_half_width: 1.0,
            allow_cast: true
        }
    }
}

impl NormalizationSettings {
    pub fn new(enabled: bool, window_half_width: f64, allow_cast: bool) -> NormalizationSettings {
        NormalizationSettings { enabled, window_half_width, allow_cast }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Lateral normalization window is `[-window_half_width, window_half_width]`.
    pub fn window_half_width(&self) -> f64 {
        self.window_half_width
    }

    pub fn allow_cast(&self) -> bool {
        self.allow_cast
    }
}

/// Dose levels the metric summary evaluates level-parametrised metrics at.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricLevels {
    range: f64,
    modulation: f64,
    field_ratio: f64,
    symmetry: f64
}

impl Default for MetricLevels {
    fn default() -> Self {
        MetricLevels {
            range: 0.9,
            modulation: 0.9,
            field_ratio: 0.8,
            symmetry: 0.8
        }
    }
}

impl MetricLevels {
    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn modulation(&self) -> f64 {
        self.modulation
    }

    pub fn field_ratio(&self) -> f64 {
        self.field_ratio
    }

    pub fn symmetry(&self) -> f64 {
        self.symmetry
    }

    fn all(&self) -> [(&'static str, f64); 4] {
        [
            ("range", self.range),
            ("modulation", self.modulation),
            ("field_ratio", self.field_ratio),
            ("symmetry", self.symmetry),
        ]
    }
}

// ─────────────────────────────────────────────
// AnalysisConfiguration
// ─────────────────────────────────────────────

/// Settings for reading measurements and summarising their metrics.
///
/// Every field is optional in the JSON file; missing ones take the defaults
/// of [`AnalysisConfiguration::new`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfiguration {
    reader: ReaderSettings,
    normalization: NormalizationSettings,
    levels: MetricLevels,
    rounding_digits: Option<u32>
}

impl Default for AnalysisConfiguration {
    fn default() -> Self {
        AnalysisConfiguration {
            reader: ReaderSettings::default(),
            normalization: NormalizationSettings::default(),
            levels: MetricLevels::default(),
            rounding_digits: Some(4)
        }
    }
}

impl AnalysisConfiguration {
    pub fn new() -> AnalysisConfiguration {
        AnalysisConfiguration::default()
    }

    pub fn reader(&self) -> &ReaderSettings {
        &self.reader
    }

    pub fn normalization(&self) -> &NormalizationSettings {
        &self.normalization
    }

    pub fn levels(&self) -> &MetricLevels {
        &self.levels
    }

    /// Decimals kept in the metric summary, `None` for full precision.
    pub fn rounding_digits(&self) -> Option<u32> {
        self.rounding_digits
    }

    /// Same settings with normalization switched off.
    pub fn without_normalization(mut self) -> AnalysisConfiguration {
        self.normalization.enabled = false;
        self
    }

    pub fn from_reader(file_path: &Path) -> Result<AnalysisConfiguration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let config: AnalysisConfiguration = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<AnalysisConfiguration, ConfigurationError> {
        let config: AnalysisConfiguration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let half_width = self.normalization.window_half_width;
        if !(half_width.is_finite() && half_width > 0.0) {
            return Err(ConfigurationError::Invalid(format!(
                "normalization window half-width must be positive, got {}",
                half_width
            )));
        }
        for (name, level) in self.levels.all() {
            if !(0.0..=1.0).contains(&level) {
                return Err(ConfigurationError::Invalid(format!(
                    "{} level must lie in [0, 1], got {}",
                    name, level
                )));
            }
        }
        if self.reader.axis_candidates.is_empty() {
            return Err(ConfigurationError::Invalid("no axis candidates given".to_owned()));
        }
        if self.reader.dose_column.is_empty() {
            return Err(ConfigurationError::Invalid("dose column name is empty".to_owned()));
        }
        Ok(())
    }
}
