//! Integration tests for chart metadata extraction.

use std::fs;
use std::path::Path;

use tempfile::tempdir;
use ydoc_chart::{ChartError, ChartReader};

fn write_chart(dir: &Path, chart_yaml: Option<&str>, values_yaml: &str) {
    fs::create_dir_all(dir).unwrap();
    if let Some(chart_yaml) = chart_yaml {
        fs::write(dir.join("Chart.yaml"), chart_yaml).unwrap();
    }
    fs::write(dir.join("values.yaml"), values_yaml).unwrap();
}

/// Test a full chart with descriptor, dependencies and annotated values.
#[test]
fn test_read_complete_chart() {
    let temp = tempdir().unwrap();
    let chart_dir = temp.path().join("demo");
    write_chart(
        &chart_dir,
        Some(
            r#"
apiVersion: v2
name: demo
description: A demo chart
version: 1.0
appVersion: "2.3.4"
type: application
home: https://example.com/demo
kubeVersion: ">=1.22.0"
sources:
  - https://github.com/example/demo
  - https://github.com/example/demo-image
maintainers:
  - name: Jane
    email: jane@example.com
  - name: Ops
    url: https://example.com/ops
dependencies:
  - name: postgresql
    alias: db
    version: 12.1.0
    repository: https://charts.bitnami.com/bitnami
  - name: redis
    version: 17.0.0
    repository: https://charts.bitnami.com/bitnami
"#,
        ),
        r#"
# -- Number of replicas
replicaCount: 1

image:
  # -- Image repository
  repository: nginx
  # @default -- the chart appVersion
  tag: ""
"#,
    );

    let info = ChartReader::new()
        .with_tool_version("0.1.0")
        .read(chart_dir.join("values.yaml"))
        .unwrap();

    assert_eq!(info.chart_directory, chart_dir.to_string_lossy());
    assert_eq!(info.name.as_deref(), Some("demo"));
    assert_eq!(info.version.as_deref(), Some("1.0"));
    assert_eq!(info.app_version.as_deref(), Some("2.3.4"));
    assert_eq!(info.chart_type.as_deref(), Some("application"));
    assert_eq!(info.kube_version.as_deref(), Some(">=1.22.0"));
    assert_eq!(info.yaml_docs_version.as_deref(), Some("0.1.0"));
    assert_eq!(info.sources.len(), 2);
    assert_eq!(info.sources[0], "https://github.com/example/demo");

    assert_eq!(info.maintainers.len(), 2);
    assert_eq!(info.maintainers[0].email.as_deref(), Some("jane@example.com"));
    assert_eq!(info.maintainers[1].email, None);

    assert_eq!(info.dependencies.len(), 2);
    assert_eq!(info.dependencies[0].alias.as_deref(), Some("db"));
    assert_eq!(info.dependencies[1].name, "redis");

    let keys: Vec<_> = info.values.iter().map(|v| v.key.as_str()).collect();
    assert_eq!(keys, vec!["replicaCount", "image.repository", "image.tag"]);
    assert_eq!(
        info.values[0].description.as_deref(),
        Some("Number of replicas")
    );
    assert_eq!(
        info.values[2].effective_default(),
        Some("the chart appVersion")
    );
}

/// Test that the chart descriptor is optional.
#[test]
fn test_read_values_without_descriptor() {
    let temp = tempdir().unwrap();
    let chart_dir = temp.path().join("bare");
    write_chart(&chart_dir, None, "enabled: true\n");

    let info = ChartReader::new().read(chart_dir.join("values.yaml")).unwrap();

    assert_eq!(info.name, None);
    assert!(info.maintainers.is_empty());
    assert_eq!(info.values.len(), 1);
    assert_eq!(info.values[0].value_type, "bool");
    assert_eq!(info.yaml_docs_version, None);
}

/// Test the legacy requirements.yaml fallback.
#[test]
fn test_requirements_fallback() {
    let temp = tempdir().unwrap();
    let chart_dir = temp.path().join("legacy");
    write_chart(&chart_dir, Some("name: legacy\n"), "x: 1\n");
    fs::write(
        chart_dir.join("requirements.yaml"),
        r#"
dependencies:
  - name: mysql
    version: 1.6.9
    repository: https://charts.helm.sh/stable
"#,
    )
    .unwrap();

    let info = ChartReader::new().read(chart_dir.join("values.yaml")).unwrap();
    assert_eq!(info.dependencies.len(), 1);
    assert_eq!(info.dependencies[0].name, "mysql");
    assert_eq!(info.dependencies[0].alias, None);
}

/// Test that malformed descriptors are reported with their path.
#[test]
fn test_invalid_descriptor() {
    let temp = tempdir().unwrap();
    let chart_dir = temp.path().join("broken");
    write_chart(&chart_dir, Some("maintainers: not-a-list\n"), "x: 1\n");

    let result = ChartReader::new().read(chart_dir.join("values.yaml"));
    match result {
        Err(ChartError::InvalidFormat { path, .. }) => {
            assert!(path.ends_with("Chart.yaml"));
        }
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}

/// Test that a non-mapping values file is rejected with its path.
#[test]
fn test_invalid_values_document() {
    let temp = tempdir().unwrap();
    let chart_dir = temp.path().join("list");
    write_chart(&chart_dir, None, "- a\n- b\n");

    let result = ChartReader::new().read(chart_dir.join("values.yaml"));
    match result {
        Err(ChartError::InvalidFormat { path, .. }) => {
            assert!(path.ends_with("values.yaml"));
        }
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}
