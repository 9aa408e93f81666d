//! Printing of command results.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Renders `report` to a string in the requested format.
pub(crate) fn render<T>(report: &T, format: OutputFormat) -> Result<String>
where
    T: Serialize + fmt::Display,
{
    Ok(match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    })
}

/// Prints `report` to stdout. Logs go to stderr, so stdout stays machine-readable.
pub(crate) fn emit<T>(report: &T, format: OutputFormat) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    println!("{}", render(report, format)?);
    Ok(())
}
