//! Parsed long-option flags available to the work function.
//!
//! Flags are parsed once, at dispatch time, into an immutable [`ArgMap`]
//! that is handed to the work function by value. Repeated lookups are
//! idempotent by construction; there is no hidden process-wide state.

use std::collections::HashMap;

/// Immutable map of `--name=value` flags.
///
/// Only arguments *after* the program path and the command token are
/// considered. An argument is recognised when it starts with `--` and
/// contains `=`; it is split at the first `=` and both sides are trimmed.
/// Everything else (the command token, bare flags, positionals) is ignored.
#[derive(Debug, Clone, Default)]
pub struct ArgMap {
    values: HashMap<String, String>,
}

impl ArgMap {
    /// Parses an argument list of the shape `[program, command, flags...]`.
    #[must_use]
    pub fn parse(argv: &[String]) -> Self {
        let mut values = HashMap::new();
        for arg in argv.iter().skip(2) {
            if let Some(rest) = arg.strip_prefix("--") {
                if let Some((name, value)) = rest.split_once('=') {
                    values.insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }
        Self { values }
    }

    /// Parses the current process arguments.
    #[must_use]
    pub fn from_env() -> Self {
        let argv: Vec<String> = std::env::args().collect();
        Self::parse(&argv)
    }

    /// Returns the value bound to `name`, or `""` if absent.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    /// Returns the value bound to `name` parsed as a base-10 integer.
    ///
    /// Absence and parse failure both coerce silently to `0`.
    #[must_use]
    pub fn get_int(&self, name: &str) -> i64 {
        self.get(name).parse().unwrap_or(0)
    }

    /// Returns the number of parsed flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no flags were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
