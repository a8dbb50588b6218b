//! `weld components` — list the component catalog grouped by target.

use clap::Args;
use weld_components::ComponentRegistry;
use weld_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// List available components grouped by their target descriptors.
#[derive(Args)]
pub(crate) struct ComponentsArgs;

impl ComponentsArgs {
    pub(crate) fn execute(&self, config: &Config, output: &Output) -> Result<(), CliError> {
        let records = super::catalog(config).components()?;
        if records.is_empty() {
            output.info("no components in catalog");
            return Ok(());
        }

        let mut registry = ComponentRegistry::new();
        registry.register_records(records).map_err(|err| {
            CliError::Validation(format!("catalog contains a malformed target: {err}"))
        })?;

        for key in registry.target_keys() {
            output.highlight(key);
            for definition in registry.definitions_for(key) {
                let params = if definition.params.is_empty() {
                    String::new()
                } else {
                    format!(" (params: {})", definition.params.join(", "))
                };
                output.info(&format!("  {}{params}", definition.name));
            }
        }
        Ok(())
    }
}
