//! Library settings.
//!
//! Settings can be read from TOML or from `FIXTUREBOT_`-prefixed environment
//! variables and are applied to a registry with
//! [`DefinitionRegistry::configure`](crate::registry::DefinitionRegistry::configure).
//!
//! ```toml
//! warn_unset_properties = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{FixtureError, FixtureResult};

/// Prefix of the environment variables read by [`FixtureSettings::from_env`].
pub const ENV_PREFIX: &str = "FIXTUREBOT_";

/// Runtime settings of a definition registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureSettings {
	/// Log a warning for every mutable property a new definition has no default for.
	pub warn_unset_properties: bool,
}

impl FixtureSettings {
	/// Parses settings from a TOML document. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> FixtureResult<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Reads settings from a TOML file.
	pub fn from_path(path: impl AsRef<Path>) -> FixtureResult<Self> {
		let source = std::fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&source)
	}

	/// Reads settings from the process environment.
	pub fn from_env() -> FixtureResult<Self> {
		Self::from_env_with(|key| std::env::var(key).ok())
	}

	/// Reads settings through `lookup`, which maps a full variable name to its value.
	pub fn from_env_with<F>(lookup: F) -> FixtureResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = Self::default();
		let key = format!("{}WARN_UNSET_PROPERTIES", ENV_PREFIX);
		if let Some(value) = lookup(&key) {
			settings.warn_unset_properties = parse_bool(&key, &value)?;
		}
		Ok(settings)
	}
}

fn parse_bool(key: &str, value: &str) -> FixtureResult<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" | "" => Ok(false),
		_ => Err(FixtureError::Settings(format!(
			"{} expects a boolean, got `{}`",
			key, value
		))),
	}
}
