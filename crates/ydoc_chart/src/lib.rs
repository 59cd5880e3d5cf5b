//! # ydoc_chart
//!
//! Chart metadata extraction for yaml-docs.
//!
//! This crate turns a chart directory into the [`ChartDocumentationInfo`] record
//! that the template engine renders:
//!
//! - **Descriptor**: `Chart.yaml` (and the legacy `requirements.yaml`) supply name,
//!   versions, maintainers, sources and dependencies
//! - **Values**: the values file is flattened into dotted keys with inferred types
//!   and defaults, annotated by `# --` comments
//! - **Discovery**: glob expansion of values-file arguments and chart search
//!
//! ## Example
//!
//! ```rust,no_run
//! use ydoc_chart::ChartReader;
//!
//! let reader = ChartReader::new().with_tool_version("0.1.0");
//! let info = reader.read("charts/demo/values.yaml").unwrap();
//!
//! for row in &info.values {
//!     println!("{} ({})", row.key, row.value_type);
//! }
//! ```

pub mod discovery;
pub mod error;
pub mod models;
pub mod reader;
pub mod values;

pub use discovery::ChartDiscovery;
pub use error::{ChartError, ChartResult};
pub use models::*;
pub use reader::{ChartReader, CHART_DESCRIPTOR_FILE, REQUIREMENTS_FILE};
pub use values::ValuesParser;
