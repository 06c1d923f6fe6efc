//! Cursor options.

use url::Url;

use crate::error::Error;

/// Options applied to a [`PreparedHandle`](crate::handle::PreparedHandle).
///
/// Usually taken from the query string of the connection URL, so they travel
/// with the rest of the connection configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opts {
    /// Emit `tracing` debug events for every cursor operation.
    ///
    /// The events are recorded at `DEBUG` level; the installed subscriber's
    /// filter must let them through.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Reject a bind at `index == field_count`.
    ///
    /// By default only `index > field_count` is rejected, and a bind one past
    /// the last column reads as NULL. Existing callers may rely on the lenient
    /// check, so it stays the default.
    ///
    /// Default: `false`
    pub strict_bounds: bool,

    /// Query parameters not recognized by this crate.
    ///
    /// Default: `[]`
    pub params: Vec<(String, String)>,
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Error> {
    match value {
        "true" | "True" | "1" | "yes" | "on" => Ok(true),
        "false" | "False" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidUsage(format!("Invalid {}: {}", key, value))),
    }
}

impl TryFrom<&Url> for Opts {
    type Error = Error;

    /// Read options from a PostgreSQL connection URL.
    ///
    /// Format: `postgres://...[?debug=on&strict_bounds=off&..]`
    ///
    /// Supported query parameters:
    /// - `debug`: true/True/1/yes/on or false/False/0/no/off
    /// - `strict_bounds`: same values as `debug`
    fn try_from(url: &Url) -> Result<Self, Self::Error> {
        if !["postgres", "postgresql", "pg"].contains(&url.scheme()) {
            return Err(Error::InvalidUsage(format!(
                "Invalid scheme: expected 'postgres://' or 'pg://', got '{}://'",
                url.scheme()
            )));
        }

        let mut opts = Opts::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "debug" => opts.debug = parse_flag(&key, &value)?,
                "strict_bounds" => opts.strict_bounds = parse_flag(&key, &value)?,
                _ => opts.params.push((key.to_string(), value.to_string())),
            }
        }

        Ok(opts)
    }
}

impl TryFrom<&str> for Opts {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let url = Url::parse(s).map_err(|e| Error::InvalidUsage(format!("Invalid URL: {}", e)))?;
        Self::try_from(&url)
    }
}
