//! `sp pages` command implementation.

use clap::Args;
use sp_pages::{DimensionValue, PageGroupProvider, RuntimeDimensions};

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pages command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    /// Page group name.
    group: String,

    /// Runtime dimension as `name=value` or `name=v1,v2` (repeatable).
    #[arg(short, long = "dimension", value_parser = parse_dimension)]
    dimensions: Vec<(String, DimensionValue)>,
}

impl PagesArgs {
    /// Execute the pages command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails.
    pub(crate) fn execute(self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let provider = PageGroupProvider::new(global.open_loader(output)?);
        let dimensions = collect_dimensions(self.dimensions);
        tracing::debug!(
            provider = PageGroupProvider::IDENTIFIER,
            group = %self.group,
            "Listing page group"
        );

        let options = provider.get_data(&self.group, &dimensions);
        output.result(&serde_json::to_string_pretty(&options)?)?;
        Ok(())
    }
}

/// Parse `name=v1,v2` into a dimension entry.
fn parse_dimension(arg: &str) -> Result<(String, DimensionValue), String> {
    let (name, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected <name>=<value>[,<value>...], got \"{arg}\""))?;
    if name.is_empty() {
        return Err(format!("missing dimension name in \"{arg}\""));
    }

    let values: Vec<String> = values
        .split(',')
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect();
    let value = match <[String; 1]>::try_from(values) {
        Ok([single]) => DimensionValue::Single(single),
        Err(values) => DimensionValue::Multiple(values),
    };
    Ok((name.to_owned(), value))
}

/// Merge repeated dimensions; later values for a name are appended.
fn collect_dimensions(entries: Vec<(String, DimensionValue)>) -> RuntimeDimensions {
    let mut dimensions = RuntimeDimensions::new();
    for (name, value) in entries {
        match dimensions.remove(&name) {
            Some(existing) => {
                let mut merged = existing.values().to_vec();
                merged.extend_from_slice(value.values());
                dimensions.insert(name, DimensionValue::Multiple(merged));
            }
            None => {
                dimensions.insert(name, value);
            }
        }
    }
    dimensions
}
