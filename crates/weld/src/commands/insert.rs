//! `weld insert` — insert a component into a stored page.

use clap::Args;
use weld_config::Config;
use weld_templates::Params;

use crate::error::CliError;
use crate::output::Output;

/// Insert a component at its declared target and save the page.
#[derive(Args)]
pub(crate) struct InsertArgs {
    /// Site identifier.
    #[arg(long)]
    site: String,

    /// Page identifier.
    #[arg(long)]
    page: String,

    /// Component name from the catalog.
    #[arg(long)]
    component: String,

    /// Parameter value as `name=value`. Repeatable.
    #[arg(long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,
}

impl InsertArgs {
    pub(crate) fn execute(&self, config: &Config, output: &Output) -> Result<(), CliError> {
        let params = parse_params(&self.params)?;

        let mut session = super::open_session(config, &self.site, &self.page)?;
        let anchors = session.insert_component(&self.component, &params)?;
        session.save_now()?;

        output.success(&format!(
            "inserted {:?} at {anchors} anchor(s) into {}/{}",
            self.component, self.site, self.page
        ));
        Ok(())
    }
}

fn parse_params(raw: &[String]) -> Result<Params, CliError> {
    let mut params = Params::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once('=') else {
            return Err(CliError::Validation(format!(
                "malformed --param {entry:?}, expected NAME=VALUE"
            )));
        };
        params.insert(name.to_owned(), value.to_owned());
    }
    Ok(params)
}
