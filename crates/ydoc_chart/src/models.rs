//! Data models for chart documentation.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Chart descriptors often carry versions as bare YAML numbers (`version: 1.0`).
mod scalar {
    use serde::{Deserialize, Deserializer};
    use serde_yaml::Value;

    pub(crate) fn option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => serde_yaml::to_string(&other)
                .ok()
                .map(|s| s.trim_end().to_string()),
        })
    }

    pub(crate) fn required<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(option(deserializer)?.unwrap_or_default())
    }
}

/// A chart maintainer as listed in the chart descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Maintainer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Maintainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A chart dependency (Chart.yaml `dependencies` or legacy `requirements.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Dependency {
    #[serde(default)]
    pub repository: String,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, deserialize_with = "scalar::required")]
    pub version: String,
}

impl Dependency {
    pub fn new(
        repository: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            alias: None,
            version: version.into(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// One documented row of the values table.
///
/// `default` and `description` come from explicit annotations and always take
/// precedence over the inferred `auto_default` and `auto_description`, even when
/// empty. Templates see the chosen text as `effective_default` and
/// `effective_description`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct ValueRow {
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub default: Option<String>,
    pub auto_default: Option<String>,
    pub description: Option<String>,
    pub auto_description: Option<String>,
}

impl ValueRow {
    pub fn new(key: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_type: value_type.into(),
            ..Default::default()
        }
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn auto_default(mut self, default: impl Into<String>) -> Self {
        self.auto_default = Some(default.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn auto_description(mut self, description: impl Into<String>) -> Self {
        self.auto_description = Some(description.into());
        self
    }

    /// The default shown in documentation: explicit first, then inferred.
    pub fn effective_default(&self) -> Option<&str> {
        self.default.as_deref().or(self.auto_default.as_deref())
    }

    /// The description shown in documentation: explicit first, then inferred.
    pub fn effective_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.auto_description.as_deref())
    }
}

impl Serialize for ValueRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("ValueRow", 8)?;
        row.serialize_field("key", &self.key)?;
        row.serialize_field("type", &self.value_type)?;
        row.serialize_field("default", &self.default)?;
        row.serialize_field("auto_default", &self.auto_default)?;
        row.serialize_field("description", &self.description)?;
        row.serialize_field("auto_description", &self.auto_description)?;
        row.serialize_field("effective_default", &self.effective_default())?;
        row.serialize_field("effective_description", &self.effective_description())?;
        row.end()
    }
}

/// Everything the templates can see about one chart.
///
/// Serialized field names are the variable names available to templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChartDocumentationInfo {
    pub chart_directory: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub app_version: Option<String>,
    #[serde(rename = "type")]
    pub chart_type: Option<String>,
    pub home: Option<String>,
    pub kube_version: Option<String>,
    pub deprecated: bool,
    pub sources: Vec<String>,
    pub maintainers: Vec<Maintainer>,
    pub dependencies: Vec<Dependency>,
    pub values: Vec<ValueRow>,
    pub yaml_docs_version: Option<String>,
}

impl ChartDocumentationInfo {
    pub fn new(chart_directory: impl Into<String>) -> Self {
        Self {
            chart_directory: chart_directory.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_value(mut self, row: ValueRow) -> Self {
        self.values.push(row);
        self
    }

    pub fn with_maintainer(mut self, maintainer: Maintainer) -> Self {
        self.maintainers.push(maintainer);
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.yaml_docs_version = Some(version.into());
        self
    }
}

/// The subset of `Chart.yaml` that ends up in documentation.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar::option")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "scalar::option")]
    pub app_version: Option<String>,
    #[serde(default, rename = "type")]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default, deserialize_with = "scalar::option")]
    pub kube_version: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub maintainers: Vec<Maintainer>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// Legacy `requirements.yaml` layout.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RequirementsFile {
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}
