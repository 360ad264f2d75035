//! Compile strategies.
//!
//! A [`Strategy`] brackets one compile call. [`before_compile`](Strategy::before_compile)
//! runs before any property is resolved, [`result`](Strategy::result) runs on
//! the hydrated instance, performs the strategy's side effect and decides what
//! the caller gets back.
//!
//! Strategies are stateless and shared; they are registered by name on the
//! [`DefinitionRegistry`](crate::registry::DefinitionRegistry), which is
//! seeded with [`BuildStrategy`] and [`CreateStrategy`].

mod build;
mod create;

pub use build::BuildStrategy;
pub use create::CreateStrategy;

use std::fmt::Debug;

use crate::error::FixtureResult;
use crate::fixture::FixtureObject;
use crate::hooks::Stage;
use crate::value::Value;

/// The view of a factory a strategy works against.
pub trait LifecycleNotifier {
	/// Identifier of the model the factory builds.
	fn model_id(&self) -> &'static str;

	/// Fires the hooks bound to `stage`. Before hydration `instance` is `None`.
	fn notify(&self, stage: Stage, instance: Option<&dyn FixtureObject>) -> FixtureResult<()>;
}

/// Two-phase protocol bracketing compilation.
///
/// # Example
///
/// A strategy that returns the instance's properties as JSON:
///
/// ```
/// use fixturebot_core::prelude::*;
/// use fixturebot_core::fixture::FixtureObject;
/// use fixturebot_core::strategy::LifecycleNotifier;
///
/// #[derive(Debug)]
/// struct Json;
///
/// impl Strategy for Json {
///     fn before_compile(&self, factory: &dyn LifecycleNotifier) -> FixtureResult<()> {
///         factory.notify(Stage::Before, None)
///     }
///
///     fn result(
///         &self,
///         factory: &dyn LifecycleNotifier,
///         instance: Box<dyn FixtureObject>,
///     ) -> FixtureResult<Value> {
///         factory.notify(Stage::After, Some(&*instance))?;
///         let properties: Value = instance.properties().into();
///         Ok(Value::from(properties.to_json().to_string()))
///     }
/// }
/// ```
pub trait Strategy: Debug + Send + Sync {
	/// Runs before any property is merged or resolved.
	fn before_compile(&self, factory: &dyn LifecycleNotifier) -> FixtureResult<()>;

	/// Runs after hydration and returns the value exposed to the caller.
	fn result(
		&self,
		factory: &dyn LifecycleNotifier,
		instance: Box<dyn FixtureObject>,
	) -> FixtureResult<Value>;
}
