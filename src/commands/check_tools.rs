use anyhow::{bail, Result};

use seq_to_tree::config::Config;
use seq_to_tree::utils::external_tools::check_tools;

pub fn run(config: &Config) -> Result<()> {
    let statuses = check_tools(config);
    let mut missing = 0;

    for status in &statuses {
        let mark = if status.available { "ok" } else { "MISSING" };
        println!("{:<12} {:<8} {}", status.name, mark, status.program.display());
        if !status.available {
            missing += 1;
        }
    }

    if missing > 0 {
        bail!(
            "{} of {} tools could not be started. Install them or set their paths in the config file",
            missing,
            statuses.len()
        );
    }
    Ok(())
}
