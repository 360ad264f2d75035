use crate::error::FixtureResult;
use crate::fixture::FixtureObject;
use crate::hooks::Stage;
use crate::value::Value;

use super::{LifecycleNotifier, Strategy};

/// Hydrates the instance without persisting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStrategy;

impl BuildStrategy {
	/// Registry name of the strategy.
	pub const NAME: &'static str = "build";
}

impl Strategy for BuildStrategy {
	fn before_compile(&self, factory: &dyn LifecycleNotifier) -> FixtureResult<()> {
		factory.notify(Stage::Before, None)?;
		factory.notify(Stage::BeforeBuild, None)
	}

	fn result(
		&self,
		factory: &dyn LifecycleNotifier,
		instance: Box<dyn FixtureObject>,
	) -> FixtureResult<Value> {
		factory.notify(Stage::AfterBuild, Some(&*instance))?;
		factory.notify(Stage::After, Some(&*instance))?;
		Ok(instance.into_value())
	}
}
