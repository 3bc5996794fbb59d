//! Budget file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tb_core::{BudgetCatalog, BudgetSources};

/// Picks the budget file: command line, then Timewarrior's `budget.file`
/// setting, then the config file.
pub fn resolve_path(
    cli: Option<&Path>,
    timew_setting: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<PathBuf> {
    let path = cli
        .map(Path::to_path_buf)
        .or(timew_setting)
        .or_else(|| config.map(Path::to_path_buf))
        .context(
            "No budget file configured. Set budget.file in your Timewarrior config or pass --budget-file.",
        )?;
    Ok(expand_home(&path))
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Parses budget file YAML into a validated catalog.
pub fn parse_catalog(yaml: &str) -> Result<BudgetCatalog> {
    let sources: BudgetSources = if yaml.trim().is_empty() {
        BudgetSources::default()
    } else {
        serde_yaml::from_str(yaml).context("failed to parse budget file")?
    };
    Ok(BudgetCatalog::from_sources(&sources)?)
}

/// Reads and validates the budget file at `path`.
pub fn load_catalog(path: &Path) -> Result<BudgetCatalog> {
    let yaml = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Could not open budget file {}. Is it declared correctly in your Timewarrior config?",
            path.display()
        )
    })?;
    let catalog =
        parse_catalog(&yaml).with_context(|| format!("invalid budget file {}", path.display()))?;
    tracing::debug!(path = %path.display(), tags = catalog.len(), "loaded budget file");
    Ok(catalog)
}
