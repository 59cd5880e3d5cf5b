//! Generate command - Render documentation for each chart.
//!
//! Charts are independent: each one is read, resolved and rendered on its own
//! blocking task, and a failure only affects that chart. With `--dry-run` all
//! output shares stdout, so charts are processed one after another.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use ydoc_chart::{ChartDiscovery, ChartError, ChartReader};
use ydoc_templates::{TemplateError, TemplateResolver};

#[derive(Args)]
pub struct GenerateArgs {
    /// Values files (or glob patterns) of the charts to document
    #[arg(
        short = 'f',
        long = "values-file",
        env = "YAML_DOCS_VALUES_FILE",
        value_delimiter = ','
    )]
    values_files: Vec<String>,

    /// Search this directory for charts when no values file is given
    #[arg(short = 'c', long, env = "YAML_DOCS_CHART_SEARCH_ROOT")]
    chart_search_root: Option<PathBuf>,

    /// Values file name to look for while searching for charts
    #[arg(long, default_value = "values.yaml")]
    values_file_name: String,

    /// Override templates; relative paths resolve against each chart directory
    #[arg(
        short = 't',
        long = "template-files",
        env = "YAML_DOCS_TEMPLATE_FILES",
        value_delimiter = ',',
        default_value = "README.md.tera"
    )]
    template_files: Vec<PathBuf>,

    /// Output file name, written inside each chart directory
    #[arg(
        short,
        long,
        env = "YAML_DOCS_OUTPUT_FILE",
        default_value = "README.md"
    )]
    output_file: PathBuf,

    /// Print documentation to stdout instead of writing files
    #[arg(short, long, env = "YAML_DOCS_DRY_RUN")]
    dry_run: bool,
}

/// Batch-level failures of the generate command.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No charts to document: pass --values-file or --chart-search-root")]
    NoCharts,

    #[error("{failed} of {total} chart(s) failed to generate documentation")]
    ChartsFailed {
        failed: usize,
        total: usize,
        template_failures: usize,
    },
}

/// Why a single chart could not be documented.
#[derive(Debug, Error)]
pub enum ChartFailure {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where rendered documentation goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write `<chart directory>/<file name>`.
    File(PathBuf),
    /// Stream to stdout.
    Stdout,
}

/// Settings shared by every chart in one batch.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template_files: Vec<PathBuf>,
    pub output: OutputTarget,
}

impl GenerateOptions {
    /// Override template candidates for one chart directory.
    fn template_paths(&self, chart_dir: &Path) -> Vec<PathBuf> {
        self.template_files
            .iter()
            .map(|t| {
                if t.is_absolute() {
                    t.clone()
                } else {
                    chart_dir.join(t)
                }
            })
            .collect()
    }
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub template_failures: usize,
}

impl BatchReport {
    fn record(&mut self, values_file: PathBuf, outcome: Result<(), ChartFailure>) {
        match outcome {
            Ok(()) => self.succeeded.push(values_file),
            Err(e) => {
                match &e {
                    ChartFailure::Chart(_) => {
                        warn!("Error parsing information for chart {:?}, skipping: {}", values_file, e)
                    }
                    _ => error!("Failed to document chart {:?}: {}", values_file, e),
                }
                if matches!(e, ChartFailure::Template(_)) {
                    self.template_failures += 1;
                }
                self.failed.push((values_file, e.to_string()));
            }
        }
    }

    fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let values_files = if !args.values_files.is_empty() {
        ChartDiscovery::expand_values_files(&args.values_files)?
    } else if let Some(root) = &args.chart_search_root {
        ChartDiscovery::find_values_files(root, &args.values_file_name)
    } else {
        Vec::new()
    };

    if values_files.is_empty() {
        warn!("At least one values file must be provided");
        return Err(GenerateError::NoCharts.into());
    }

    debug!(
        "Rendering from optional template files [{}]",
        args.template_files
            .iter()
            .map(|t| t.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let options = GenerateOptions {
        template_files: args.template_files,
        output: if args.dry_run {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(args.output_file)
        },
    };
    let reader = ChartReader::new().with_tool_version(env!("CARGO_PKG_VERSION"));

    let report = generate_all(values_files, reader, options).await;

    info!(
        "Documented {} of {} chart(s)",
        report.succeeded.len(),
        report.total()
    );

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(GenerateError::ChartsFailed {
            failed: report.failed.len(),
            total: report.total(),
            template_failures: report.template_failures,
        }
        .into())
    }
}

/// Document every chart; concurrently unless output goes to stdout.
pub async fn generate_all(
    values_files: Vec<PathBuf>,
    reader: ChartReader,
    options: GenerateOptions,
) -> BatchReport {
    let mut report = BatchReport::default();

    if options.output == OutputTarget::Stdout {
        for values_file in values_files {
            let outcome = document_chart(&reader, &values_file, &options);
            report.record(values_file, outcome);
        }
        return report;
    }

    let reader = Arc::new(reader);
    let options = Arc::new(options);

    let handles: Vec<_> = values_files
        .into_iter()
        .map(|values_file| {
            let reader = Arc::clone(&reader);
            let options = Arc::clone(&options);
            let path = values_file.clone();
            let handle = tokio::task::spawn_blocking(move || {
                document_chart(&reader, &values_file, &options)
            });
            (path, handle)
        })
        .collect();

    for (values_file, handle) in handles {
        match handle.await {
            Ok(outcome) => report.record(values_file, outcome),
            Err(e) => {
                error!("Worker for chart {:?} did not complete: {}", values_file, e);
                report.failed.push((values_file, e.to_string()));
            }
        }
    }

    report
}

/// Name of a chart's root template.
///
/// Namespaced so a chart directory such as `version` never collides with a fragment.
pub fn root_template_name(chart_directory: &str) -> String {
    format!("chart:{}", chart_directory)
}

/// Read, resolve, render and emit documentation for one chart.
pub fn document_chart(
    reader: &ChartReader,
    values_file: &Path,
    options: &GenerateOptions,
) -> Result<(), ChartFailure> {
    let info = reader.read(values_file)?;
    let chart_dir = PathBuf::from(&info.chart_directory);

    let template_paths = options.template_paths(&chart_dir);
    let set = TemplateResolver::new()
        .resolve(template_paths.as_slice(), &root_template_name(&info.chart_directory))?;

    match &options.output {
        OutputTarget::Stdout => {
            // Render fully first so a failing chart prints nothing.
            let mut buffer = Vec::new();
            set.render_to(&info, &mut buffer)?;
            buffer.push(b'\n');
            io::stdout()
                .lock()
                .write_all(&buffer)
                .map_err(|source| ChartFailure::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
        OutputTarget::File(file_name) => {
            let markdown = set.render(&info)?;
            let path = chart_dir.join(file_name);
            fs::write(&path, markdown).map_err(|source| ChartFailure::Write {
                path: path.clone(),
                source,
            })?;
            info!("Wrote documentation to {:?}", path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use ydoc_templates::resolve;

    fn write_chart(root: &Path, name: &str, values: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Chart.yaml"), format!("name: {}\nversion: 0.1.0\n", name)).unwrap();
        let values_file = dir.join("values.yaml");
        fs::write(&values_file, values).unwrap();
        values_file
    }

    fn file_options() -> GenerateOptions {
        GenerateOptions {
            template_files: vec![PathBuf::from("README.md.tera")],
            output: OutputTarget::File(PathBuf::from("README.md")),
        }
    }

    #[test]
    fn test_template_paths_resolve_against_chart() {
        let options = GenerateOptions {
            template_files: vec![PathBuf::from("README.md.tera"), PathBuf::from("/abs/t.tera")],
            output: OutputTarget::Stdout,
        };
        let paths = options.template_paths(Path::new("charts/demo"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("charts/demo/README.md.tera"),
                PathBuf::from("/abs/t.tera")
            ]
        );
    }

    #[test]
    fn test_document_chart_writes_readme() {
        let temp = tempdir().unwrap();
        let values_file = write_chart(
            temp.path(),
            "demo",
            "# -- Number of replicas\nreplicaCount: 1\n",
        );

        document_chart(&ChartReader::new(), &values_file, &file_options()).unwrap();

        let readme = fs::read_to_string(temp.path().join("demo/README.md")).unwrap();
        assert!(readme.contains("## Values"));
        assert!(readme.contains("| replicaCount | int | `1` | Number of replicas |"));
    }

    #[test]
    fn test_document_chart_uses_chart_template() {
        let temp = tempdir().unwrap();
        let values_file = write_chart(temp.path(), "custom", "enabled: true\n");
        fs::write(
            temp.path().join("custom/README.md.tera"),
            "{% include \"header\" %}\n",
        )
        .unwrap();

        document_chart(&ChartReader::new(), &values_file, &file_options()).unwrap();

        let readme = fs::read_to_string(temp.path().join("custom/README.md")).unwrap();
        assert_eq!(readme, "# custom\n");
    }

    #[tokio::test]
    async fn test_failing_chart_does_not_abort_batch() {
        let temp = tempdir().unwrap();
        let good = write_chart(temp.path(), "good", "x: 1\n");
        let broken = write_chart(temp.path(), "broken", "x: 1\n");
        fs::write(
            temp.path().join("broken/README.md.tera"),
            "{% if name %}never closed",
        )
        .unwrap();
        let missing = temp.path().join("missing/values.yaml");

        let report = generate_all(
            vec![good.clone(), broken.clone(), missing.clone()],
            ChartReader::new(),
            file_options(),
        )
        .await;

        assert_eq!(report.succeeded, vec![good]);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.template_failures, 1);
        assert!(temp.path().join("good/README.md").exists());
        assert!(!temp.path().join("broken/README.md").exists());
    }

    #[test]
    fn test_chart_named_after_fragment_resolves() {
        let temp = tempdir().unwrap();
        let template = temp.path().join("README.md.tera");
        fs::write(&template, "{% include \"header\" %}\n").unwrap();

        for chart_directory in ["version", "name", "description", "type"] {
            let set = TemplateResolver::new()
                .resolve(&[&template], &root_template_name(chart_directory))
                .unwrap();
            assert_eq!(set.root_name(), format!("chart:{}", chart_directory));
        }
    }

    #[test]
    fn test_document_chart_in_fragment_named_directory() {
        let temp = tempdir().unwrap();
        let values_file = write_chart(temp.path(), "version", "replicaCount: 2\n");
        fs::write(
            temp.path().join("version/README.md.tera"),
            "{% include \"header\" %}\n\n{% include \"values-section\" %}",
        )
        .unwrap();

        document_chart(&ChartReader::new(), &values_file, &file_options()).unwrap();

        let readme = fs::read_to_string(temp.path().join("version/README.md")).unwrap();
        assert!(readme.starts_with("# version\n"));
        assert!(readme.contains("| replicaCount | int | `2` |"));
    }

    #[tokio::test]
    async fn test_dry_run_batch_writes_no_files() {
        let temp = tempdir().unwrap();
        let good = write_chart(temp.path(), "good", "x: 1\n");
        let broken = write_chart(temp.path(), "broken", "x: 1\n");
        fs::write(
            temp.path().join("broken/README.md.tera"),
            "{% if name %}never closed",
        )
        .unwrap();

        let options = GenerateOptions {
            template_files: vec![PathBuf::from("README.md.tera")],
            output: OutputTarget::Stdout,
        };
        let report = generate_all(vec![good.clone(), broken.clone()], ChartReader::new(), options).await;

        assert_eq!(report.succeeded, vec![good]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, broken);
        assert_eq!(report.template_failures, 1);
        assert!(!temp.path().join("good/README.md").exists());
        assert!(!temp.path().join("broken/README.md").exists());
    }

    #[tokio::test]
    async fn test_concurrent_batch_matches_sequential_render() {
        let temp = tempdir().unwrap();
        let values_files: Vec<PathBuf> = (0..50)
            .map(|i| {
                write_chart(
                    temp.path(),
                    &format!("chart-{}", i),
                    &format!("# -- Setting {}\nkey{}: {}\n", i, i, i),
                )
            })
            .collect();

        let reader = ChartReader::new().with_tool_version("0.1.0");
        let expected: Vec<String> = values_files
            .iter()
            .map(|values_file| {
                let info = reader.read(values_file).unwrap();
                let set = resolve::<&str>(&[], &root_template_name(&info.chart_directory)).unwrap();
                set.render(&info).unwrap()
            })
            .collect();

        let report = generate_all(values_files.clone(), reader, file_options()).await;
        assert_eq!(report.succeeded.len(), 50);
        assert!(report.failed.is_empty());

        for (values_file, expected) in values_files.iter().zip(expected) {
            let readme = values_file.parent().unwrap().join("README.md");
            assert_eq!(fs::read_to_string(readme).unwrap(), expected);
        }
    }
}
