//! `weld show` — print a page's serialized content.

use clap::Args;
use weld_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Print the stored content of a page to stdout.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Site identifier.
    #[arg(long)]
    site: String,

    /// Page identifier.
    #[arg(long)]
    page: String,
}

impl ShowArgs {
    pub(crate) fn execute(&self, config: &Config, output: &Output) -> Result<(), CliError> {
        let session = super::open_session(config, &self.site, &self.page)?;
        output.payload(&session.content());
        Ok(())
    }
}
