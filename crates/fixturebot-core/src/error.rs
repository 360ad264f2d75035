//! Error types for fixture compilation.
//!
//! Errors fall into three groups:
//!
//! - **Configuration errors** ([`FixtureError::InvalidArgument`]): malformed
//!   property maps, unknown property names, invalid hook stages. Raised before
//!   any side effect of the offending call.
//! - **Lookup errors** ([`FixtureError::FactoryNotFound`],
//!   [`FixtureError::StrategyNotFound`], [`FixtureError::ModelMismatch`]):
//!   raised by the [`DefinitionRegistry`](crate::registry::DefinitionRegistry).
//! - **Propagated errors**: everything a mutator, generator, persistence call
//!   or hook returns. These are never wrapped again and abort the compile call.

use thiserror::Error;

/// Boxed error used for failures coming from user-provided persistence code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while defining or compiling fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// A property map, property name, hook stage or other argument is invalid.
	#[error("{0}")]
	InvalidArgument(String),

	/// No factory is registered under the given name.
	#[error("Factory `{0}` not defined!")]
	FactoryNotFound(String),

	/// No strategy is registered under the given name.
	#[error("Strategy `{0}` not defined!")]
	StrategyNotFound(String),

	/// A registered factory builds a different model than the one requested.
	#[error("Factory `{name}` builds `{actual}`, not `{expected}`")]
	ModelMismatch {
		/// Name the factory was looked up by.
		name: String,
		/// Model the caller asked for.
		expected: &'static str,
		/// Model the factory actually builds.
		actual: &'static str,
	},

	/// A resolved value could not be converted into the mutator's field type.
	#[error("Type mismatch: expected {expected}, found {found}")]
	TypeMismatch {
		/// Type the mutator accepts.
		expected: &'static str,
		/// Kind of value that was supplied.
		found: String,
	},

	/// The model has no persistence capability.
	#[error("{0} does not support persistence")]
	PersistenceUnsupported(String),

	/// The model's persistence capability failed.
	#[error("Failed to persist {model}: {source}")]
	Persistence {
		/// Model identifier of the instance being saved.
		model: String,
		/// Error returned by the persistence call.
		#[source]
		source: BoxError,
	},

	/// Failure raised by a user generator or hook callback.
	#[error("{0}")]
	Custom(String),

	/// Settings could not be loaded.
	#[error("Settings error: {0}")]
	Settings(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// TOML settings could not be parsed.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl FixtureError {
	/// Creates an [`InvalidArgument`](Self::InvalidArgument) error.
	pub fn invalid_argument(message: impl Into<String>) -> Self {
		Self::InvalidArgument(message.into())
	}

	/// Creates the configuration error reported for a property without a mutator.
	pub fn unknown_property(model: &str, property: &str) -> Self {
		Self::InvalidArgument(format!("{} has no mutator for `{}`!", model, property))
	}

	/// Creates a [`Custom`](Self::Custom) error, for use in generators and hooks.
	pub fn custom(message: impl Into<String>) -> Self {
		Self::Custom(message.into())
	}

	/// Returns true for configuration errors.
	pub fn is_configuration_error(&self) -> bool {
		matches!(self, Self::InvalidArgument(_))
	}

	/// Returns true for registry lookup errors.
	pub fn is_lookup_error(&self) -> bool {
		matches!(
			self,
			Self::FactoryNotFound(_) | Self::StrategyNotFound(_) | Self::ModelMismatch { .. }
		)
	}
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
