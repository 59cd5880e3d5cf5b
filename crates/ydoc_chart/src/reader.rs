//! Chart metadata reading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ChartError, ChartResult};
use crate::models::{ChartDescriptor, ChartDocumentationInfo, Dependency, RequirementsFile};
use crate::values::ValuesParser;

/// Chart descriptor file name.
pub const CHART_DESCRIPTOR_FILE: &str = "Chart.yaml";

/// Legacy dependency list used by older charts.
pub const REQUIREMENTS_FILE: &str = "requirements.yaml";

/// Reads one chart into a [`ChartDocumentationInfo`].
#[derive(Default)]
pub struct ChartReader {
    tool_version: Option<String>,
    values_parser: ValuesParser,
}

impl ChartReader {
    /// Create a new chart reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every chart read with the tool version (used by the footer).
    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = Some(version.into());
        self
    }

    /// Read a chart given the path to its values file.
    ///
    /// The chart directory is the values file's parent. `Chart.yaml` is optional.
    pub fn read(&self, values_file: impl AsRef<Path>) -> ChartResult<ChartDocumentationInfo> {
        let values_file = values_file.as_ref();
        if !values_file.is_file() {
            return Err(ChartError::NotFound(values_file.to_path_buf()));
        }

        let chart_dir = chart_directory(values_file);
        debug!("Reading chart metadata from {:?}", chart_dir);

        let descriptor = self.read_descriptor(&chart_dir)?;
        let mut dependencies = descriptor.dependencies;
        if dependencies.is_empty() {
            dependencies = self.read_requirements(&chart_dir)?;
        }

        let values = self.values_parser.parse_file(values_file)?;

        info!(
            "Parsed chart {} ({} values)",
            chart_dir.display(),
            values.len()
        );

        Ok(ChartDocumentationInfo {
            chart_directory: chart_dir.to_string_lossy().into_owned(),
            name: descriptor.name,
            description: descriptor.description,
            version: descriptor.version,
            app_version: descriptor.app_version,
            chart_type: descriptor.chart_type,
            home: descriptor.home,
            kube_version: descriptor.kube_version,
            deprecated: descriptor.deprecated,
            sources: descriptor.sources,
            maintainers: descriptor.maintainers,
            dependencies,
            values,
            yaml_docs_version: self.tool_version.clone(),
        })
    }

    /// Read `Chart.yaml`, or an empty descriptor when the chart has none.
    fn read_descriptor(&self, chart_dir: &Path) -> ChartResult<ChartDescriptor> {
        let path = chart_dir.join(CHART_DESCRIPTOR_FILE);
        if !path.exists() {
            debug!("No {} in {:?}", CHART_DESCRIPTOR_FILE, chart_dir);
            return Ok(ChartDescriptor::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(ChartDescriptor::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ChartError::InvalidFormat {
            path,
            message: e.to_string(),
        })
    }

    fn read_requirements(&self, chart_dir: &Path) -> ChartResult<Vec<Dependency>> {
        let path = chart_dir.join(REQUIREMENTS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        debug!("Reading legacy dependencies from {:?}", path);
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let requirements: RequirementsFile =
            serde_yaml::from_str(&content).map_err(|e| ChartError::InvalidFormat {
                path,
                message: e.to_string(),
            })?;
        Ok(requirements.dependencies)
    }
}

fn chart_directory(values_file: &Path) -> PathBuf {
    match values_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_directory_of_bare_file() {
        assert_eq!(chart_directory(Path::new("values.yaml")), PathBuf::from("."));
        assert_eq!(
            chart_directory(Path::new("charts/demo/values.yaml")),
            PathBuf::from("charts/demo")
        );
    }

    #[test]
    fn test_missing_values_file() {
        let result = ChartReader::new().read("does/not/exist/values.yaml");
        assert!(matches!(result, Err(ChartError::NotFound(_))));
    }
}
