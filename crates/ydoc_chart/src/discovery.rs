//! Locating values files to document.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ChartError, ChartResult};
use crate::reader::CHART_DESCRIPTOR_FILE;

/// Finds the values files of the charts to document.
pub struct ChartDiscovery;

impl ChartDiscovery {
    /// Expand values-file arguments, which may be glob patterns.
    ///
    /// Order follows the arguments; duplicates are dropped. A literal path with no
    /// match is kept so its absence is reported for that chart.
    pub fn expand_values_files(patterns: &[String]) -> ChartResult<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for pattern in patterns {
            let entries = glob::glob(pattern).map_err(|e| ChartError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;

            let mut matched = false;
            for entry in entries {
                match entry {
                    Ok(path) => {
                        matched = true;
                        if seen.insert(path.clone()) {
                            files.push(path);
                        }
                    }
                    Err(e) => warn!("Skipping unreadable path for {}: {}", pattern, e),
                }
            }

            if !matched {
                debug!("Pattern {} matched nothing, keeping it literally", pattern);
                let path = PathBuf::from(pattern);
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }

        Ok(files)
    }

    /// Walk `search_root` for chart directories holding both `Chart.yaml` and
    /// `values_file_name`, returning the values file paths in sorted order.
    pub fn find_values_files(search_root: &Path, values_file_name: &str) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(search_root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == CHART_DESCRIPTOR_FILE)
            .filter_map(|e| {
                let values = e.path().parent()?.join(values_file_name);
                values.is_file().then_some(values)
            })
            .collect();

        files.sort();
        debug!("Found {} chart(s) under {:?}", files.len(), search_root);
        files
    }
}
