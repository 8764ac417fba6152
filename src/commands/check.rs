//! Validate the content directory and list its groups

use anyhow::{Context, Result};

use crate::content::{describe, ContentIndex};
use crate::Site;

/// Load the content directory, print each group, and optionally dump the index
pub fn run(site: &Site, dump: bool) -> Result<()> {
    let index = site
        .load_content()
        .with_context(|| format!("Failed to load content from {:?}", site.data_dir))?;

    print!("{}", summary(&index));

    if dump {
        println!("{}", serde_json::to_string_pretty(&index)?);
    }

    Ok(())
}

/// One line per group with its shape
pub fn summary(index: &ContentIndex) -> String {
    let mut out = format!("Groups ({}):\n", index.len());
    for (name, value) in index.iter() {
        out.push_str(&format!("  {} - {}\n", name, describe(value)));
    }
    out
}
