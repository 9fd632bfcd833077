use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::cli::Cli;

pub const CATALOG_ENV: &str = "LURE_CATALOG";

pub fn resolve_catalog_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(p) = cli.catalog.clone() {
        return Ok(p);
    }

    if let Ok(p) = env::var(CATALOG_ENV)
        && !p.trim().is_empty()
    {
        return Ok(PathBuf::from(p));
    }

    Ok(lure_finder_home()?.join("catalog.json"))
}

/// Default `tracing` filter when `RUST_LOG` is not set.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "lure_finder=debug"
    } else {
        "lure_finder=warn"
    }
}

fn lure_finder_home() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::cache_dir)
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Failed to resolve data directory"))?;
    Ok(base.join("lure-finder"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;

    fn cli(catalog: Option<&str>) -> Cli {
        Cli {
            command: Commands::Stats,
            catalog: catalog.map(PathBuf::from),
            verbose: false,
        }
    }

    #[test]
    fn explicit_catalog_flag_wins() -> Result<()> {
        let path = resolve_catalog_path(&cli(Some("/tmp/lures.json")))?;
        assert_eq!(path, PathBuf::from("/tmp/lures.json"));
        Ok(())
    }

    #[test]
    fn default_catalog_lives_under_data_dir() -> Result<()> {
        if env::var(CATALOG_ENV).is_ok() {
            return Ok(());
        }
        let path = resolve_catalog_path(&cli(None))?;
        assert!(path.ends_with("lure-finder/catalog.json"));
        Ok(())
    }

    #[test]
    fn verbose_raises_log_level() {
        assert_eq!(default_log_filter(true), "lure_finder=debug");
        assert_eq!(default_log_filter(false), "lure_finder=warn");
    }
}
