//! `sp fragment` command implementation.

use clap::Args;
use sp_pages::{FragmentAccessor, FragmentKind};

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fragment command.
#[derive(Args)]
pub(crate) struct FragmentArgs {
    /// Page key (`<group>%<page>`).
    key: String,

    /// Fragment to print: content, bodyScripts, headScripts or stylesheets.
    #[arg(short = 't', long = "type", default_value = "content")]
    kind: String,
}

impl FragmentArgs {
    /// Execute the fragment command.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment name is unknown, configuration fails,
    /// or the page cannot be rendered.
    pub(crate) fn execute(self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let kind: FragmentKind = self.kind.parse()?;
        let accessor = FragmentAccessor::new(global.open_loader(output)?);

        let fragment = accessor.fragment(&self.key, kind)?;
        output.result(fragment.trim_end_matches('\n'))?;
        Ok(())
    }
}
