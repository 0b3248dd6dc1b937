use anyhow::{bail, Context, Result};

use seq_to_tree::config::Config;

pub fn run(force: bool) -> Result<()> {
    let path = Config::default_path().context("Failed to determine project directories")?;
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let path = Config::default().save()?;
    println!("Default config written to {}", path.display());
    Ok(())
}
