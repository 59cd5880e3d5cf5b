//! Values file flattening and comment annotations.
//!
//! Keys are documented by the comment block directly above them:
//!
//! ```yaml
//! # -- (int) Number of replicas
//! # spread across the cluster
//! replicaCount: 1
//!
//! image:
//!   # @default -- chart appVersion
//!   # -- Image tag override
//!   tag: ""
//! ```

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::models::ValueRow;

/// Annotation collected from the comments above one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct KeyComment {
    description: Option<String>,
    default: Option<String>,
    type_override: Option<String>,
    auto_description: Vec<String>,
}

impl KeyComment {
    fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.default.is_none()
            && self.type_override.is_none()
            && self.auto_description.is_empty()
    }

    fn auto_description(&self) -> Option<String> {
        if self.auto_description.is_empty() {
            None
        } else {
            Some(self.auto_description.join(" "))
        }
    }
}

/// Parser that turns a values document into ordered [`ValueRow`]s.
pub struct ValuesParser {
    key_pattern: Regex,
    type_pattern: Regex,
}

impl Default for ValuesParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ValuesParser {
    /// Create a new values parser.
    pub fn new() -> Self {
        Self {
            // Match `  key:` / `  "quoted.key":` mapping lines, not list items
            key_pattern: Regex::new(
                r#"^(\s*)(?:"([^"]+)"|'([^']+)'|([^\s#'"\-][^:#]*?))\s*:(?:\s|$)"#,
            )
            .expect("key pattern is valid"),
            // Match `(type) description`
            type_pattern: Regex::new(r"^\(([^)]+)\)\s*(.*)$").expect("type pattern is valid"),
        }
    }

    /// Parse a values file from disk.
    pub fn parse_file(&self, path: &Path) -> ChartResult<Vec<ValueRow>> {
        debug!("Reading values from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        self.parse(&content).map_err(|e| match e {
            ChartError::InvalidFormat { message, .. } => ChartError::InvalidFormat {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse values content into rows, in document order.
    pub fn parse(&self, content: &str) -> ChartResult<Vec<ValueRow>> {
        let has_content = content.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#') && line != "---"
        });
        if !has_content {
            return Ok(Vec::new());
        }

        let document: Value = serde_yaml::from_str(content)?;
        let mapping = match document {
            Value::Null => return Ok(Vec::new()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(ChartError::InvalidFormat {
                    path: Default::default(),
                    message: format!(
                        "values document must be a mapping, found {}",
                        yaml_type(&other)
                    ),
                })
            }
        };

        let comments = self.collect_comments(content);
        let mut rows = Vec::new();
        flatten(&mapping, "", &comments, &mut rows);
        Ok(rows)
    }

    /// Scan raw lines and attach comment blocks to dotted key paths.
    fn collect_comments(&self, content: &str) -> HashMap<String, KeyComment> {
        let mut comments = HashMap::new();
        let mut stack: Vec<(usize, String)> = Vec::new();
        let mut pending = KeyComment::default();
        let mut in_description = false;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                pending = KeyComment::default();
                in_description = false;
                continue;
            }

            if let Some(comment) = trimmed.strip_prefix('#') {
                let comment = comment.trim();
                if let Some(rest) = comment.strip_prefix("@default --") {
                    pending.default = Some(rest.trim().to_string());
                    in_description = false;
                } else if let Some(rest) = comment.strip_prefix("--") {
                    let rest = rest.trim();
                    match self.type_pattern.captures(rest) {
                        Some(caps) => {
                            pending.type_override = Some(caps[1].trim().to_string());
                            pending.description = Some(caps[2].trim().to_string());
                        }
                        None => pending.description = Some(rest.to_string()),
                    }
                    in_description = true;
                } else if in_description {
                    if !comment.is_empty() {
                        if let Some(description) = pending.description.as_mut() {
                            if !description.is_empty() {
                                description.push(' ');
                            }
                            description.push_str(comment);
                        }
                    }
                } else if !comment.is_empty() {
                    pending.auto_description.push(comment.to_string());
                }
                continue;
            }

            let Some(caps) = self.key_pattern.captures(line) else {
                pending = KeyComment::default();
                in_description = false;
                continue;
            };

            let indent = caps[1].len();
            let key = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            while stack.last().is_some_and(|(level, _)| *level >= indent) {
                stack.pop();
            }
            stack.push((indent, key));

            let path = stack
                .iter()
                .map(|(_, k)| k.as_str())
                .collect::<Vec<_>>()
                .join(".");

            let comment = std::mem::take(&mut pending);
            in_description = false;
            if !comment.is_empty() {
                comments.insert(path, comment);
            }
        }

        comments
    }
}

fn flatten(
    mapping: &Mapping,
    prefix: &str,
    comments: &HashMap<String, KeyComment>,
    rows: &mut Vec<ValueRow>,
) {
    for (key, value) in mapping {
        let key = scalar_key(key);
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        let comment = comments.get(&path);

        match value {
            Value::Mapping(child) if !child.is_empty() => {
                // A documented map gets its own row in addition to its children
                if comment.is_some_and(|c| c.description.is_some()) {
                    rows.push(build_row(&path, value, comment));
                }
                flatten(child, &path, comments, rows);
            }
            _ => rows.push(build_row(&path, value, comment)),
        }
    }
}

fn build_row(path: &str, value: &Value, comment: Option<&KeyComment>) -> ValueRow {
    let mut row = ValueRow::new(path, yaml_type(value));
    row.auto_default = Some(format!("`{}`", compact_json(value)));

    if let Some(comment) = comment {
        if let Some(type_override) = &comment.type_override {
            row.value_type = type_override.clone();
        }
        row.default = comment.default.clone();
        row.description = comment.description.clone();
        row.auto_description = comment.auto_description();
    }

    row
}

fn scalar_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => compact_json(other),
    }
}

fn yaml_type(value: &Value) -> &'static str {
    match value {
        Value::Null | Value::String(_) => "string",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "object",
        Value::Tagged(tagged) => yaml_type(&tagged.value),
    }
}

fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| {
        serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default()
    })
}
