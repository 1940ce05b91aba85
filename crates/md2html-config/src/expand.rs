//! `${VAR}` references in configuration strings.
//!
//! Only braced references are expanded. Any other `$` is literal text, so
//! secrets such as `pa$word` survive even next to a `${VAR}`.

use crate::ConfigError;

/// Replace every `${VAR}` / `${VAR:-default}` span in `value`.
///
/// An unset variable without a default is an error naming `field`. A `${`
/// with no closing brace is kept as is.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
            break;
        };
        expanded.push_str(&rest[..open]);
        expanded.push_str(&expand_reference(&rest[open..=close], field)?);
        rest = &rest[close + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}

/// Expand a single `${...}` span.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |name| {
        std::env::var(name).map(Some).map_err(|_| name.to_owned())
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause),
    })
}
