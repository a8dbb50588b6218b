//! Environment variable expansion for string configuration values.
//!
//! Supported forms:
//!
//! - `${VAR}` — the value of `VAR`, an error if unset
//! - `${VAR:-default}` — the value of `VAR` if set, otherwise `default`

use crate::ConfigError;

/// Expand `${VAR}` / `${VAR:-default}` references in a string value.
pub(crate) fn expand_env(input: &str) -> Result<String, ConfigError> {
    expand_with(input, |name| std::env::var(name).ok())
}

pub(crate) fn expand_with(
    input: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::UnterminatedReference(input.to_owned()));
        };
        let reference = &after[..end];

        let (name, default) = match reference.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (reference, None),
        };

        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => match default {
                Some(default) => out.push_str(default),
                None => return Err(ConfigError::MissingEnvVar(name.to_owned())),
            },
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
