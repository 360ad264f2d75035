//! Registry of global hooks.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::Hook;

static GLOBAL_HOOKS: Lazy<Arc<HookRegistry>> = Lazy::new(|| Arc::new(HookRegistry::new()));

/// Ordered collection of global hooks.
///
/// Factories hold a handle to the registry they were created with and read
/// it at notification time, so hooks registered later still fire for
/// factories defined earlier.
#[derive(Debug, Default)]
pub struct HookRegistry {
	hooks: RwLock<Vec<Hook>>,
}

impl HookRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			hooks: RwLock::new(Vec::new()),
		}
	}

	/// Returns the process-wide registry.
	pub fn global() -> Arc<HookRegistry> {
		Arc::clone(&GLOBAL_HOOKS)
	}

	/// Appends a hook.
	pub fn register(&self, hook: Hook) {
		tracing::debug!(stage = %hook.stage(), "registering global hook");
		self.hooks.write().push(hook);
	}

	/// Removes the first registered occurrence of `hook`.
	///
	/// Returns false if it was not registered.
	pub fn remove(&self, hook: &Hook) -> bool {
		let mut hooks = self.hooks.write();
		match hooks.iter().position(|registered| registered == hook) {
			Some(index) => {
				hooks.remove(index);
				true
			}
			None => false,
		}
	}

	/// Removes every hook.
	pub fn purge(&self) {
		self.hooks.write().clear();
	}

	/// Number of registered hooks.
	pub fn len(&self) -> usize {
		self.hooks.read().len()
	}

	/// Returns true if no hook is registered.
	pub fn is_empty(&self) -> bool {
		self.hooks.read().is_empty()
	}

	/// Copies the current hooks, in registration order.
	///
	/// Callbacks run against the copy so they may register or remove hooks
	/// without deadlocking.
	pub fn snapshot(&self) -> Vec<Hook> {
		self.hooks.read().clone()
	}
}
