//! Rendering a resolved template set against chart metadata.

use std::io::Write;

use tera::Context;
use tracing::debug;
use ydoc_chart::ChartDocumentationInfo;

use crate::error::{describe, TemplateError, TemplateResult};
use crate::resolver::ResolvedTemplateSet;

impl ResolvedTemplateSet {
    /// Render the root template into a Markdown string.
    pub fn render(&self, info: &ChartDocumentationInfo) -> TemplateResult<String> {
        let context = self.context(info)?;
        debug!("Rendering '{}' for {}", self.root_name(), info.chart_directory);

        self.tera
            .render(self.root_name(), &context)
            .map_err(|e| self.render_error(&e))
    }

    /// Render the root template straight into `writer`.
    pub fn render_to<W: Write>(&self, info: &ChartDocumentationInfo, writer: W) -> TemplateResult<()> {
        let context = self.context(info)?;
        debug!("Streaming '{}' for {}", self.root_name(), info.chart_directory);

        self.tera
            .render_to(self.root_name(), &context, writer)
            .map_err(|e| self.render_error(&e))
    }

    fn context(&self, info: &ChartDocumentationInfo) -> TemplateResult<Context> {
        Context::from_serialize(info).map_err(|e| self.render_error(&e))
    }

    fn render_error(&self, error: &tera::Error) -> TemplateError {
        TemplateError::Render {
            name: self.root_name().to_string(),
            message: describe(error),
        }
    }
}

/// Render `set` against one chart.
pub fn render(set: &ResolvedTemplateSet, info: &ChartDocumentationInfo) -> TemplateResult<String> {
    set.render(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use ydoc_chart::{Dependency, Maintainer, ValueRow};

    fn default_set() -> ResolvedTemplateSet {
        resolve::<&str>(&[], "charts/demo").unwrap()
    }

    #[test]
    fn test_values_table_preference() {
        let info = ChartDocumentationInfo::new("charts/demo")
            .with_value(
                ValueRow::new("both", "string")
                    .default_value("explicit")
                    .auto_default("inferred")
                    .description("documented")
                    .auto_description("guessed"),
            )
            .with_value(
                ValueRow::new("auto", "string")
                    .auto_default("inferred")
                    .auto_description("guessed"),
            )
            .with_value(ValueRow::new("neither", "string"));

        let output = default_set().render(&info).unwrap();

        assert!(output.contains("| both | string | explicit | documented |"));
        assert!(output.contains("| auto | string | inferred | guessed |"));
        assert!(output.contains("| neither | string |  |  |"));
        assert!(!output.contains("| both | string | inferred"));
    }

    #[test]
    fn test_empty_explicit_default_hides_inferred() {
        let info = ChartDocumentationInfo::new("charts/demo").with_value(
            ValueRow::new("tag", "string")
                .default_value("")
                .auto_default("`\"latest\"`")
                .description("Tag"),
        );

        let output = default_set().render(&info).unwrap();

        assert!(output.contains("| tag | string |  | Tag |"));
        assert!(!output.contains("latest"));
    }

    #[test]
    fn test_values_order_preserved() {
        let info = ChartDocumentationInfo::new("charts/demo")
            .with_value(ValueRow::new("b", "int"))
            .with_value(ValueRow::new("a", "int"));

        let output = default_set().render(&info).unwrap();
        let b = output.find("| b |").unwrap();
        let a = output.find("| a |").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_empty_values_render_nothing() {
        let output = default_set()
            .render(&ChartDocumentationInfo::new("charts/demo"))
            .unwrap();
        assert!(!output.contains("## Values"));
        assert!(!output.contains("| Key |"));
        assert!(output.trim().is_empty());
    }

    #[test]
    fn test_version_footer() {
        let info = ChartDocumentationInfo::new("charts/demo").with_tool_version("0.3.1");
        let output = default_set().render(&info).unwrap();
        assert!(output.contains("[yaml-docs v0.3.1]"));
        assert!(output.contains("/releases/v0.3.1)"));
    }

    #[test]
    fn test_render_to_matches_render() {
        let info = ChartDocumentationInfo::new("charts/demo")
            .with_maintainer(Maintainer::new("Jane").email("jane@example.com"))
            .with_dependency(Dependency::new("https://charts.example.com", "redis", "1.0.0"))
            .with_value(ValueRow::new("x", "int").default_value("1"));
        let set = default_set();

        let mut buffer = Vec::new();
        set.render_to(&info, &mut buffer).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), set.render(&info).unwrap());
    }
}
