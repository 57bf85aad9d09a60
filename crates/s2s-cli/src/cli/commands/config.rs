//! `s2s config` – print where the config lives and what is in effect.

use anyhow::Result;
use s2s_core::config::{self, S2sConfig};

pub fn run_show_config(cfg: &S2sConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
