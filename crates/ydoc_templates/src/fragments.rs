//! The built-in fragment library.
//!
//! Every fragment is a Tera template body registered under a stable name.
//! Override templates call them with `{% include "<name>" %}`; the names are part
//! of the public contract and must not change. Fragments only read the chart
//! record they are rendered against.
//!
//! Section fragments (`values-section`, `maintainers-section`, ...) carry their own
//! emptiness guard, so callers never need to repeat it.

/// A named, reusable template definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Stable name callers include.
    pub name: &'static str,
    /// One-line summary for template authors.
    pub purpose: &'static str,
    /// Tera template body.
    pub body: &'static str,
}

/// Version of the default root template below.
pub const DEFAULT_ROOT_TEMPLATE_VERSION: u32 = 1;

/// Root body used when no override template is found.
pub const DEFAULT_ROOT_TEMPLATE: &str = r#"
{% include "values-section" %}

{% include "version-footer" %}
"#;

const VALUES_TABLE: &str = concat!(
    "| Key | Type | Default | Description |\n",
    "|-----|------|---------|-------------|\n",
    "{% for value in values %}",
    "| {{ value.key }} | {{ value.type }} | ",
    "{% if value.effective_default %}{{ value.effective_default }}{% endif %} | ",
    "{% if value.effective_description %}{{ value.effective_description }}{% endif %} |\n",
    "{% endfor %}",
);

const MAINTAINERS_TABLE: &str = concat!(
    "| Name | Email | Url |\n",
    "| ---- | ------ | --- |\n",
    "{% for maintainer in maintainers %}",
    "| {{ maintainer.name }} | ",
    "{% if maintainer.email %}<{{ maintainer.email }}>{% endif %} | ",
    "{% if maintainer.url %}<{{ maintainer.url }}>{% endif %} |\n",
    "{% endfor %}",
);

const REQUIREMENTS_TABLE: &str = concat!(
    "| Repository | Name | Version |\n",
    "|------------|------|---------|\n",
    "{% for dependency in dependencies %}",
    "| {{ dependency.repository }} | ",
    "{% if dependency.alias %}{{ dependency.alias }}({{ dependency.name }}){% else %}{{ dependency.name }}{% endif %} | ",
    "{{ dependency.version }} |\n",
    "{% endfor %}",
);

const REQUIREMENTS_SECTION: &str = concat!(
    "{% if dependencies or kube_version %}",
    "{% include \"requirements-header\" %}\n\n",
    "{% if kube_version %}{% include \"kube-version-line\" %}\n\n{% endif %}",
    "{% if dependencies %}{% include \"requirements-table\" %}{% endif %}",
    "{% endif %}",
);

const VERSION_FOOTER: &str = concat!(
    "{% if yaml_docs_version %}",
    "----------------------------------------------\n",
    "Autogenerated from chart metadata using ",
    "[yaml-docs v{{ yaml_docs_version }}]",
    "(https://github.com/andbron/yaml-docs/releases/v{{ yaml_docs_version }})",
    "{% endif %}",
);

/// The fragment library, in registration order.
pub const FRAGMENTS: &[Fragment] = &[
    Fragment {
        name: "name",
        purpose: "Chart name",
        body: "{% if name %}{{ name }}{% endif %}",
    },
    Fragment {
        name: "header",
        purpose: "Level-one heading with the chart name",
        body: "{% if name %}# {{ name }}{% endif %}",
    },
    Fragment {
        name: "deprecation-warning",
        purpose: "Warning block for deprecated charts",
        body: "{% if deprecated %}> **:exclamation: This chart is deprecated!**{% endif %}",
    },
    Fragment {
        name: "description",
        purpose: "Chart description",
        body: "{% if description %}{{ description }}{% endif %}",
    },
    Fragment {
        name: "version",
        purpose: "Chart version",
        body: "{% if version %}{{ version }}{% endif %}",
    },
    Fragment {
        name: "version-badge",
        purpose: "shields.io badge for the chart version",
        body: "{% if version %}![Version: {{ version }}](https://img.shields.io/badge/Version-{{ version | badge_escape }}-informational?style=flat-square) {% endif %}",
    },
    Fragment {
        name: "type",
        purpose: "Chart type",
        body: "{% if type %}{{ type }}{% endif %}",
    },
    Fragment {
        name: "type-badge",
        purpose: "shields.io badge for the chart type",
        body: "{% if type %}![Type: {{ type }}](https://img.shields.io/badge/Type-{{ type | badge_escape }}-informational?style=flat-square) {% endif %}",
    },
    Fragment {
        name: "app-version",
        purpose: "Application version",
        body: "{% if app_version %}{{ app_version }}{% endif %}",
    },
    Fragment {
        name: "app-version-badge",
        purpose: "shields.io badge for the application version",
        body: "{% if app_version %}![AppVersion: {{ app_version }}](https://img.shields.io/badge/AppVersion-{{ app_version | badge_escape }}-informational?style=flat-square) {% endif %}",
    },
    Fragment {
        name: "badges-section",
        purpose: "Version, type and app-version badges",
        body: "{% include \"version-badge\" %}{% include \"type-badge\" %}{% include \"app-version-badge\" %}",
    },
    Fragment {
        name: "homepage-line",
        purpose: "Homepage link",
        body: "{% if home %}**Homepage:** <{{ home }}>{% endif %}",
    },
    Fragment {
        name: "sources-header",
        purpose: "Heading of the source links section",
        body: "## Source Code",
    },
    Fragment {
        name: "sources-list",
        purpose: "Bullet list of source links",
        body: "{% for source in sources %}* <{{ source }}>\n{% endfor %}",
    },
    Fragment {
        name: "sources-section",
        purpose: "Source links, omitted when there are none",
        body: "{% if sources %}{% include \"sources-header\" %}\n\n{% include \"sources-list\" %}{% endif %}",
    },
    Fragment {
        name: "kube-version-line",
        purpose: "Supported Kubernetes version constraint",
        body: "{% if kube_version %}Kubernetes: `{{ kube_version }}`{% endif %}",
    },
    Fragment {
        name: "requirements-header",
        purpose: "Heading of the requirements section",
        body: "## Requirements",
    },
    Fragment {
        name: "requirements-table",
        purpose: "Dependency table",
        body: REQUIREMENTS_TABLE,
    },
    Fragment {
        name: "requirements-section",
        purpose: "Kubernetes constraint and dependencies, omitted when both are absent",
        body: REQUIREMENTS_SECTION,
    },
    Fragment {
        name: "values-header",
        purpose: "Heading of the values section",
        body: "## Values",
    },
    Fragment {
        name: "values-table",
        purpose: "Values table (explicit default/description before inferred)",
        body: VALUES_TABLE,
    },
    Fragment {
        name: "values-section",
        purpose: "Values heading and table, omitted when there are no values",
        body: "{% if values %}{% include \"values-header\" %}\n\n{% include \"values-table\" %}{% endif %}",
    },
    Fragment {
        name: "maintainers-header",
        purpose: "Heading of the maintainers section",
        body: "## Maintainers",
    },
    Fragment {
        name: "maintainers-table",
        purpose: "Maintainers table",
        body: MAINTAINERS_TABLE,
    },
    Fragment {
        name: "maintainers-section",
        purpose: "Maintainers heading and table, omitted when there are none",
        body: "{% if maintainers %}{% include \"maintainers-header\" %}\n\n{% include \"maintainers-table\" %}{% endif %}",
    },
    Fragment {
        name: "tool-version",
        purpose: "Version of yaml-docs that generated the document",
        body: "{% if yaml_docs_version %}{{ yaml_docs_version }}{% endif %}",
    },
    Fragment {
        name: "version-footer",
        purpose: "Autogenerated-by footer",
        body: VERSION_FOOTER,
    },
];

/// Look up a built-in fragment by name.
pub fn fragment(name: &str) -> Option<&'static Fragment> {
    FRAGMENTS.iter().find(|f| f.name == name)
}

/// Whether `name` belongs to the built-in library.
pub fn is_fragment_name(name: &str) -> bool {
    fragment(name).is_some()
}
