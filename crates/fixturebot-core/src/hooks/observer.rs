//! Dispatch of lifecycle notifications to hooks.

use std::sync::Arc;

use crate::error::FixtureResult;
use crate::fixture::FixtureObject;

use super::{Hook, HookRegistry, Stage};

/// Fires the hooks bound to a stage: global hooks first, then the local ones
/// of the owning factory.
#[derive(Debug, Clone)]
pub struct LifecycleObserver {
	global: Arc<HookRegistry>,
	local: Vec<Hook>,
}

impl LifecycleObserver {
	/// Creates an observer reading global hooks from `global`.
	pub fn new(global: Arc<HookRegistry>, local: Vec<Hook>) -> Self {
		Self { global, local }
	}

	/// Global registry this observer reads from.
	pub fn global(&self) -> &Arc<HookRegistry> {
		&self.global
	}

	/// Hooks local to the owning factory.
	pub fn local(&self) -> &[Hook] {
		&self.local
	}

	/// Runs every hook bound to `stage`.
	///
	/// The first failing hook aborts the dispatch and its error is returned.
	pub fn notify(&self, stage: Stage, instance: Option<&dyn FixtureObject>) -> FixtureResult<()> {
		let global = self.global.snapshot();
		for hook in global.iter().chain(self.local.iter()) {
			if hook.stage() == stage {
				tracing::trace!(stage = %stage, "running hook");
				hook.run(instance)?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::FixtureError;
	use parking_lot::Mutex;
	use rstest::rstest;

	fn recorder(log: &Arc<Mutex<Vec<String>>>, stage: Stage, label: &str) -> Hook {
		let log = log.clone();
		let label = label.to_string();
		Hook::on(stage, move |_| {
			log.lock().push(label.clone());
			Ok(())
		})
	}

	#[rstest]
	fn test_global_hooks_run_before_local() {
		// Arrange
		let log = Arc::new(Mutex::new(Vec::new()));
		let registry = Arc::new(HookRegistry::new());
		let observer = LifecycleObserver::new(
			registry.clone(),
			vec![recorder(&log, Stage::After, "local")],
		);
		registry.register(recorder(&log, Stage::After, "global"));

		// Act
		observer.notify(Stage::After, None).unwrap();

		// Assert
		assert_eq!(*log.lock(), vec!["global", "local"]);
	}

	#[rstest]
	fn test_only_matching_stage_runs() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let observer = LifecycleObserver::new(
			Arc::new(HookRegistry::new()),
			vec![
				recorder(&log, Stage::Before, "before"),
				recorder(&log, Stage::AfterBuild, "after_build"),
			],
		);

		observer.notify(Stage::AfterBuild, None).unwrap();

		assert_eq!(*log.lock(), vec!["after_build"]);
	}

	#[rstest]
	fn test_failing_hook_stops_dispatch() {
		// Arrange
		let log = Arc::new(Mutex::new(Vec::new()));
		let observer = LifecycleObserver::new(
			Arc::new(HookRegistry::new()),
			vec![
				Hook::on(Stage::Before, |_| Err(FixtureError::custom("boom"))),
				recorder(&log, Stage::Before, "second"),
			],
		);

		// Act
		let result = observer.notify(Stage::Before, None);

		// Assert
		assert!(result.is_err());
		assert!(log.lock().is_empty());
	}

	#[rstest]
	fn test_hook_may_touch_registry_while_running() {
		// Arrange
		let registry = Arc::new(HookRegistry::new());
		let inner = registry.clone();
		registry.register(Hook::on(Stage::Before, move |_| {
			inner.register(Hook::on(Stage::After, |_| Ok(())));
			Ok(())
		}));
		let observer = LifecycleObserver::new(registry.clone(), Vec::new());

		// Act
		observer.notify(Stage::Before, None).unwrap();

		// Assert
		assert_eq!(registry.len(), 2);
	}
}
