use crate::error::FixtureResult;
use crate::fixture::FixtureObject;
use crate::hooks::Stage;
use crate::value::Value;

use super::{LifecycleNotifier, Strategy};

/// Hydrates the instance and persists it through [`Fixture::save`](crate::fixture::Fixture::save).
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateStrategy;

impl CreateStrategy {
	/// Registry name of the strategy.
	pub const NAME: &'static str = "create";
}

impl Strategy for CreateStrategy {
	fn before_compile(&self, factory: &dyn LifecycleNotifier) -> FixtureResult<()> {
		factory.notify(Stage::Before, None)?;
		factory.notify(Stage::BeforeCreate, None)
	}

	fn result(
		&self,
		factory: &dyn LifecycleNotifier,
		mut instance: Box<dyn FixtureObject>,
	) -> FixtureResult<Value> {
		tracing::debug!(model = factory.model_id(), "persisting fixture");
		FixtureObject::save(&mut *instance)?;
		factory.notify(Stage::AfterCreate, Some(&*instance))?;
		factory.notify(Stage::After, Some(&*instance))?;
		Ok(instance.into_value())
	}
}
