//! `weld convert` — one-shot Markdown/HTML conversion.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::CliError;
use crate::output::Output;

/// Conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Direction {
    /// HTML to Markdown.
    Md,
    /// Markdown to HTML.
    Html,
}

/// Convert between Markdown and HTML using the editor's heuristic
/// converter.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Target format.
    #[arg(long = "to", value_enum)]
    direction: Direction,

    /// Input file. Reads stdin when omitted.
    file: Option<PathBuf>,
}

impl ConvertArgs {
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let input = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => std::io::read_to_string(std::io::stdin())?,
        };

        let converted = match self.direction {
            Direction::Md => weld_markdown::html_to_markdown(&input),
            Direction::Html => weld_markdown::markdown_to_html(&input),
        };
        output.payload(&converted);
        Ok(())
    }
}
