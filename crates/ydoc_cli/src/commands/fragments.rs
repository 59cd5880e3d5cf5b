//! Fragments command - List the built-in template fragments.

use anyhow::Result;
use clap::Args;

use ydoc_templates::fragments::{self, DEFAULT_ROOT_TEMPLATE_VERSION};
use ydoc_templates::{DEFAULT_ROOT_TEMPLATE, FRAGMENTS};

#[derive(Args)]
pub struct FragmentsArgs {
    /// Print the body of this fragment instead of the catalog
    #[arg(short, long)]
    show: Option<String>,

    /// Print the built-in default root template
    #[arg(long, conflicts_with = "show")]
    default_root: bool,
}

pub async fn execute(args: FragmentsArgs) -> Result<()> {
    if args.default_root {
        println!(
            "# default root template (v{})",
            DEFAULT_ROOT_TEMPLATE_VERSION
        );
        println!("{}", DEFAULT_ROOT_TEMPLATE.trim());
        return Ok(());
    }

    if let Some(name) = &args.show {
        let fragment = fragments::fragment(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown fragment: {}", name))?;
        println!("{}", fragment.body);
        return Ok(());
    }

    let width = FRAGMENTS.iter().map(|f| f.name.len()).max().unwrap_or(0);

    println!("📚 {} built-in fragments\n", FRAGMENTS.len());
    for fragment in FRAGMENTS {
        println!("  {:width$}  {}", fragment.name, fragment.purpose, width = width);
    }
    println!();
    println!("Include one from an override template with:");
    println!("  {{% include \"values-section\" %}}");

    Ok(())
}
