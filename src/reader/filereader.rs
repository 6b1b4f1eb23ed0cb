use std::path::{
    Path,
    PathBuf
};

use chrono::NaiveDateTime;
use log::{
    info,
    warn
};
use walkdir::WalkDir;

use crate::configuration::ReaderSettings;
use crate::profile::profilekind::ProfileKind;
use crate::reader::measurement::Measurement;
use crate::reader::readererror::ReaderError;

/// Measurement timestamp encoded in the name of the directory holding `path`.
pub fn parse_directory_date(path: &Path, format: &str) -> Result<NaiveDateTime, ReaderError> {
    let name = path
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .ok_or_else(|| ReaderError::NoDirectory { path: path.to_path_buf() })?;
    NaiveDateTime::parse_from_str(name, format).map_err(|source| ReaderError::DirectoryDate {
        name: name.to_owned(),
        source
    })
}

/// Every measurement found under a directory tree, split by profile kind.
///
/// Files that cannot be turned into a profile (no unique scan axis, no dose
/// column, malformed rows) are logged and skipped, and so are entries the walk
/// cannot read (unreadable directories, broken links). A file whose directory
/// name is not a date is kept without a timestamp. Only an unreadable root is
/// an error.
#[derive(Debug, Default)]
pub struct FileReader {
    depth_profiles: Vec<Measurement>,
    lateral_profiles: Vec<Measurement>,
    skipped: Vec<PathBuf>
}

impl FileReader {
    pub fn new(source: &Path, settings: &ReaderSettings) -> Result<FileReader, ReaderError> {
        let mut file_reader = FileReader::default();

        for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) if error.depth() == 0 => return Err(error.into()),
                Err(error) => {
                    warn!("Skipping entry under {}: {}", source.display(), error);
                    if let Some(path) = error.path() {
                        file_reader.skipped.push(path.to_path_buf());
                    }
                    continue;
                }
            };
            let path = entry.path();
            let is_measurement = entry.file_type().is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(settings.file_extension()));
            if !is_measurement {
                continue;
            }

            let measurement = match Measurement::from_path(path, settings) {
                Ok(measurement) => measurement,
                Err(error) => {
                    warn!("Profile in file: {}: {}", path.display(), error);
                    file_reader.skipped.push(path.to_path_buf());
                    continue;
                }
            };

            let measured_at = match parse_directory_date(path, settings.directory_date_format()) {
                Ok(date) => Some(date),
                Err(error) => {
                    warn!("Profile in file: {}: {}", path.display(), error);
                    None
                }
            };
            file_reader.push(measurement.with_measured_at(measured_at));
        }

        info!(
            "read {} depth and {} lateral profile(s) from {}, skipped {} file(s)",
            file_reader.depth_profiles.len(),
            file_reader.lateral_profiles.len(),
            source.display(),
            file_reader.skipped.len()
        );
        Ok(file_reader)
    }

    fn push(&mut self, measurement: Measurement) {
        match measurement.kind() {
            ProfileKind::Depth => self.depth_profiles.push(measurement),
            ProfileKind::Lateral => self.lateral_profiles.push(measurement)
        }
    }

    pub fn depth_profiles(&self) -> &[Measurement] {
        &self.depth_profiles
    }

    pub fn lateral_profiles(&self) -> &[Measurement] {
        &self.lateral_profiles
    }

    /// Files that could not be read as a profile and entries the walk could not open.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}
