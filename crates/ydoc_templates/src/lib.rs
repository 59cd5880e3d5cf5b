//! # ydoc_templates
//!
//! Template composition and rendering for yaml-docs.
//!
//! A fixed library of named fragments (values, maintainers and requirements tables,
//! badges, the version footer) is merged with optional override templates into a
//! single [`ResolvedTemplateSet`], whose root template is then rendered against a
//! [`ChartDocumentationInfo`](ydoc_chart::ChartDocumentationInfo).
//!
//! Override templates are [Tera](https://keats.github.io/tera/) templates. They call
//! fragments with `{% include "values-section" %}` and may replace any fragment
//! with a `{% define "name" %}...{% enddefine %}` block.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ydoc_chart::{ChartDocumentationInfo, ValueRow};
//! use ydoc_templates::{render, resolve};
//!
//! let set = resolve(&["charts/demo/README.md.tera"], "charts/demo").unwrap();
//!
//! let info = ChartDocumentationInfo::new("charts/demo")
//!     .with_name("demo")
//!     .with_value(ValueRow::new("replicaCount", "int").default_value("1"));
//!
//! let markdown = render(&set, &info).unwrap();
//! println!("{}", markdown);
//! ```

pub mod error;
mod filters;
pub mod fragments;
pub mod renderer;
pub mod resolver;

pub use error::{TemplateError, TemplateOrigin, TemplateResult};
pub use fragments::{Fragment, DEFAULT_ROOT_TEMPLATE, FRAGMENTS};
pub use renderer::render;
pub use resolver::{resolve, ResolvedDefinition, ResolvedTemplateSet, TemplateResolver};
