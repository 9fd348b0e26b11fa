//! Validation configuration: when guards validate and whether coerced values flow forward.
//! Environment: SCHEMAGIC_VALIDATE (always | never | debug), SCHEMAGIC_COERCE (true | false | 1 | 0).

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::guard::ValidationPredicate;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    #[default]
    Always,
    Never,
    /// Validate only in builds with debug assertions.
    #[serde(alias = "debug")]
    DebugOnly,
}

impl ValidationMode {
    pub fn enabled(self) -> bool {
        match self {
            ValidationMode::Always => true,
            ValidationMode::Never => false,
            ValidationMode::DebugOnly => cfg!(debug_assertions),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ValidationMode::Always),
            "never" => Ok(ValidationMode::Never),
            "debug" | "debug_only" => Ok(ValidationMode::DebugOnly),
            other => Err(format!("unknown validation mode {:?}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub mode: ValidationMode,
    /// Forward the validated (coerced) value instead of the original one.
    pub coerce: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Always,
            coerce: true,
        }
    }
}

impl ValidationConfig {
    pub fn debug_only() -> Self {
        Self {
            mode: ValidationMode::DebugOnly,
            ..Self::default()
        }
    }

    /// Read SCHEMAGIC_VALIDATE / SCHEMAGIC_COERCE; absent or unparsable values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mode = lookup("SCHEMAGIC_VALIDATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.mode);
        let coerce = lookup("SCHEMAGIC_COERCE")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.coerce);
        Self { mode, coerce }
    }

    pub fn with_coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Zero-argument predicate evaluated on every guarded call.
    pub fn predicate(&self) -> ValidationPredicate {
        let mode = self.mode;
        Arc::new(move || mode.enabled())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
