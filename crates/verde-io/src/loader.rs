//! Reads the configured CSV sources into a [`Registry`].

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use verde_core::{Dataset, Registry, VerdeError, VerdeResult};

use crate::report::LoadReport;
use crate::sources::DatasetSource;

/// Loads every configured source under `data_dir`.
///
/// A missing or unparsable file leaves its dataset out of the registry and
/// records the skip in the report; it never fails the load as a whole.
pub fn load_registry(data_dir: &Path, sources: &[DatasetSource]) -> (Registry, LoadReport) {
    let mut registry = Registry::new();
    let mut report = LoadReport::new();

    for source in sources {
        let path = data_dir.join(source.file);
        if !path.exists() {
            report.add_missing(source.name, &path);
            continue;
        }
        match read_csv(&path) {
            Ok(frame) => {
                report.add_loaded(source.name, &path, frame.height());
                registry.insert(Dataset::new(source.name, frame));
            }
            Err(err) => report.add_failed(source.name, &path, &err.to_string()),
        }
    }

    (registry, report)
}

fn read_csv(path: &Path) -> VerdeResult<DataFrame> {
    let mut file = File::open(path)?;
    CsvReader::new(&mut file)
        .has_header(true)
        .finish()
        .map_err(|err| VerdeError::Parse(err.to_string()))
}
