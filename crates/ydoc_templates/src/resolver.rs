//! Template resolution: merging the fragment library with override templates.
//!
//! The resolver handles:
//! - Skipping missing override files and falling back to the default root
//! - Splitting `{% define "name" %}...{% enddefine %}` blocks out of override files
//! - Registering definitions in a fixed order (library, user defines, root)
//! - Detecting competing definitions of the root template

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tera::Tera;
use tracing::{debug, error};

use crate::error::{describe, TemplateError, TemplateOrigin, TemplateResult};
use crate::filters;
use crate::fragments::{self, DEFAULT_ROOT_TEMPLATE, FRAGMENTS};

/// A named definition in a resolved set, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefinition {
    pub name: String,
    pub origin: TemplateOrigin,
}

/// The merged collection of fragment and root definitions, ready for rendering.
///
/// Immutable once built; safe to share across threads.
#[derive(Debug)]
pub struct ResolvedTemplateSet {
    root_name: String,
    pub(crate) tera: Tera,
    definitions: Vec<ResolvedDefinition>,
    used_default_root: bool,
}

impl ResolvedTemplateSet {
    /// Name of the root (entry-point) template.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> &[ResolvedDefinition] {
        &self.definitions
    }

    /// Origin of the named definition.
    pub fn origin_of(&self, name: &str) -> Option<&TemplateOrigin> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.origin)
    }

    /// Whether the built-in default root body was appended.
    pub fn used_default_root(&self) -> bool {
        self.used_default_root
    }
}

/// One definition waiting to be registered.
#[derive(Debug, Clone)]
struct PendingDefinition {
    name: String,
    body: String,
    origin: TemplateOrigin,
}

/// Content of one override file after splitting out `define` blocks.
#[derive(Debug, Default)]
struct OverrideSource {
    root_body: String,
    defines: Vec<(String, String)>,
}

/// Resolves override template files into a [`ResolvedTemplateSet`].
pub struct TemplateResolver {
    define_pattern: Regex,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver {
    /// Create a new template resolver.
    pub fn new() -> Self {
        Self {
            // Match {% define "name" %} and {% enddefine %}, with optional whitespace control
            define_pattern: Regex::new(r#"\{%-?\s*(?:define\s+"([^"]+)"|(enddefine))\s*-?%\}"#)
                .expect("define pattern is valid"),
        }
    }

    /// Resolve the override files at `override_paths` into a template set whose
    /// root is registered as `root_name`.
    ///
    /// Missing files are skipped and cause the default root body to be appended.
    pub fn resolve<P: AsRef<Path>>(
        &self,
        override_paths: &[P],
        root_name: &str,
    ) -> TemplateResult<ResolvedTemplateSet> {
        if fragments::is_fragment_name(root_name) {
            return Err(TemplateError::RootRedefinition {
                name: root_name.to_string(),
                origins: vec![TemplateOrigin::Builtin, TemplateOrigin::Composed],
            });
        }

        let mut fallback = override_paths.is_empty();
        let mut found: Vec<PathBuf> = Vec::new();

        for path in override_paths {
            let path = path.as_ref();
            if !path.exists() {
                debug!("Did not find template file {:?}, using default template", path);
                fallback = true;
                continue;
            }
            found.push(path.to_path_buf());
        }

        debug!("Using template files {:?}", found);

        let mut sources = Vec::with_capacity(found.len());
        for path in &found {
            let content = fs::read_to_string(path).map_err(|source| TemplateError::FileRead {
                path: path.clone(),
                source,
            })?;
            let origin = TemplateOrigin::File(path.clone());
            sources.push((origin.clone(), self.split_defines(&content, &origin)?));
        }

        let mut pending: Vec<PendingDefinition> = FRAGMENTS
            .iter()
            .map(|f| PendingDefinition {
                name: f.name.to_string(),
                body: f.body.to_string(),
                origin: TemplateOrigin::Builtin,
            })
            .collect();

        let mut explicit_roots: Vec<PendingDefinition> = Vec::new();
        for (origin, source) in &sources {
            for (name, body) in &source.defines {
                let definition = PendingDefinition {
                    name: name.clone(),
                    body: body.clone(),
                    origin: origin.clone(),
                };
                if name == root_name {
                    explicit_roots.push(definition);
                } else {
                    register(&mut pending, definition);
                }
            }
        }

        let root = self.compose_root(root_name, &sources, explicit_roots, fallback)?;
        let used_default_root = root.origin == TemplateOrigin::DefaultRoot
            || (root.origin == TemplateOrigin::Composed && fallback);
        register(&mut pending, root);

        build_set(root_name, pending, used_default_root)
            .map_err(|e| attribute_root_error(e, root_name, &sources))
    }

    /// Pick the single root definition, or report the competing ones.
    fn compose_root(
        &self,
        root_name: &str,
        sources: &[(TemplateOrigin, OverrideSource)],
        mut explicit_roots: Vec<PendingDefinition>,
        fallback: bool,
    ) -> TemplateResult<PendingDefinition> {
        let body_origins: Vec<TemplateOrigin> = sources
            .iter()
            .filter(|(_, s)| !s.root_body.trim().is_empty())
            .map(|(origin, _)| origin.clone())
            .collect();

        if explicit_roots.len() > 1 || (explicit_roots.len() == 1 && !body_origins.is_empty()) {
            let mut origins: Vec<TemplateOrigin> =
                explicit_roots.iter().map(|d| d.origin.clone()).collect();
            origins.extend(body_origins);
            return Err(TemplateError::RootRedefinition {
                name: root_name.to_string(),
                origins,
            });
        }

        if let Some(root) = explicit_roots.pop() {
            debug!("Root template '{}' defined explicitly in {}", root_name, root.origin);
            return Ok(root);
        }

        let mut body: String = sources.iter().map(|(_, s)| s.root_body.as_str()).collect();
        if fallback {
            body.push_str(DEFAULT_ROOT_TEMPLATE);
        }

        let origin = match (sources, fallback) {
            ([], _) => TemplateOrigin::DefaultRoot,
            ([(origin, _)], false) => origin.clone(),
            _ => TemplateOrigin::Composed,
        };

        Ok(PendingDefinition {
            name: root_name.to_string(),
            body,
            origin,
        })
    }

    /// Split one override file into its root body and named `define` blocks.
    fn split_defines(&self, content: &str, origin: &TemplateOrigin) -> TemplateResult<OverrideSource> {
        let mut source = OverrideSource::default();
        let mut open: Option<(String, usize)> = None;
        let mut last = 0;

        for caps in self.define_pattern.captures_iter(content) {
            let tag = caps.get(0).expect("capture group 0 always matches");
            let trim_before = tag.as_str().starts_with("{%-");
            let after = if tag.as_str().ends_with("-%}") {
                skip_whitespace(content, tag.end())
            } else {
                tag.end()
            };

            match (caps.get(1), open.take()) {
                (Some(name), None) => {
                    source
                        .root_body
                        .push_str(trim_end_if(&content[last..tag.start()], trim_before));
                    open = Some((name.as_str().to_string(), after));
                }
                (Some(name), Some((outer, _))) => {
                    return Err(parse_error(
                        &outer,
                        origin,
                        format!("nested define '{}' is not allowed", name.as_str()),
                    ));
                }
                (None, Some((name, start))) => {
                    let body = trim_end_if(&content[start..tag.start()], trim_before);
                    source.defines.push((name, body.to_string()));
                    last = after;
                }
                (None, None) => {
                    return Err(parse_error(
                        "enddefine",
                        origin,
                        "enddefine without a matching define".to_string(),
                    ));
                }
            }
        }

        if let Some((name, _)) = open {
            return Err(parse_error(&name, origin, "unterminated define".to_string()));
        }

        source.root_body.push_str(&content[last..]);
        Ok(source)
    }
}

/// `{%-` on a define tag trims whitespace before it, like any Tera tag.
fn trim_end_if(text: &str, trim: bool) -> &str {
    if trim {
        text.trim_end()
    } else {
        text
    }
}

/// Position of the first non-whitespace byte at or after `from`.
fn skip_whitespace(content: &str, from: usize) -> usize {
    let rest = &content[from..];
    from + rest.len() - rest.trim_start().len()
}

/// Resolve override templates into a template set with the default resolver.
pub fn resolve<P: AsRef<Path>>(
    override_paths: &[P],
    root_name: &str,
) -> TemplateResult<ResolvedTemplateSet> {
    TemplateResolver::new().resolve(override_paths, root_name)
}

/// Register a definition; a later definition replaces an earlier one in place.
fn register(pending: &mut Vec<PendingDefinition>, definition: PendingDefinition) {
    match pending.iter_mut().find(|d| d.name == definition.name) {
        Some(existing) => {
            debug!(
                "Template '{}' from {} overrides definition from {}",
                definition.name, definition.origin, existing.origin
            );
            *existing = definition;
        }
        None => pending.push(definition),
    }
}

fn build_set(
    root_name: &str,
    pending: Vec<PendingDefinition>,
    used_default_root: bool,
) -> TemplateResult<ResolvedTemplateSet> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("badge_escape", filters::badge_escape);

    let mut definitions = Vec::with_capacity(pending.len());
    for definition in pending {
        if let Err(e) = tera.add_raw_template(&definition.name, &definition.body) {
            if definition.origin == TemplateOrigin::Builtin {
                error!(
                    "Built-in fragment '{}' failed to parse: {}",
                    definition.name,
                    describe(&e)
                );
            }
            return Err(parse_error(&definition.name, &definition.origin, describe(&e)));
        }
        definitions.push(ResolvedDefinition {
            name: definition.name,
            origin: definition.origin,
        });
    }

    Ok(ResolvedTemplateSet {
        root_name: root_name.to_string(),
        tera,
        definitions,
        used_default_root,
    })
}

/// Point a parse error in a composed root at the override file that caused it.
fn attribute_root_error(
    error: TemplateError,
    root_name: &str,
    sources: &[(TemplateOrigin, OverrideSource)],
) -> TemplateError {
    match error {
        TemplateError::Parse {
            name,
            origin: TemplateOrigin::Composed,
            message,
        } if name == root_name => {
            let culprit = sources.iter().find(|(_, source)| {
                Tera::default()
                    .add_raw_template(root_name, &source.root_body)
                    .is_err()
            });
            let origin = culprit
                .map(|(origin, _)| origin.clone())
                .unwrap_or(TemplateOrigin::Composed);
            TemplateError::Parse {
                name,
                origin,
                message,
            }
        }
        other => other,
    }
}

fn parse_error(name: &str, origin: &TemplateOrigin, message: String) -> TemplateError {
    TemplateError::Parse {
        name: name.to_string(),
        origin: origin.clone(),
        message,
    }
}
