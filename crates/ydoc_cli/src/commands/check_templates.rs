//! Check-templates command - Resolve override templates without rendering.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ydoc_templates::{TemplateOrigin, TemplateResolver};

#[derive(Args)]
pub struct CheckTemplatesArgs {
    /// Override template files to check, in resolution order
    #[arg(required = true)]
    template_files: Vec<PathBuf>,

    /// Root name to resolve under (normally the chart directory)
    #[arg(long, default_value = "root")]
    root_name: String,
}

pub async fn execute(args: CheckTemplatesArgs) -> Result<()> {
    info!("Checking {} template file(s)", args.template_files.len());

    let set = TemplateResolver::new()
        .resolve(args.template_files.as_slice(), &args.root_name)
        .context("Template resolution failed")?;

    let overridden: Vec<_> = set
        .definitions()
        .iter()
        .filter(|d| d.name != set.root_name() && d.origin != TemplateOrigin::Builtin)
        .collect();

    println!("✅ Templates resolved ({} definitions)", set.definitions().len());

    if let Some(origin) = set.origin_of(set.root_name()) {
        println!("   root '{}' from {}", set.root_name(), origin);
    }
    if set.used_default_root() {
        println!("   ⚠️  default root template appended (missing or no template files)");
    }
    for definition in overridden {
        println!("   '{}' defined in {}", definition.name, definition.origin);
    }

    Ok(())
}
