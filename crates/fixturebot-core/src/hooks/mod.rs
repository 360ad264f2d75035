//! Lifecycle hooks.
//!
//! A [`Hook`] binds a callback to one [`Stage`] of a compile call:
//!
//! ```text
//! before -> before_<strategy> -> (hydration) -> after_<strategy> -> after
//! ```
//!
//! Hooks are either global, registered on a [`HookRegistry`] and fired for
//! every factory using it, or local to one factory. The
//! [`LifecycleObserver`] fires global hooks first, then local ones, each in
//! registration order.

mod observer;
mod registry;

pub use observer::LifecycleObserver;
pub use registry::HookRegistry;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{FixtureError, FixtureResult};
use crate::fixture::{Fixture, FixtureObject};

/// Lifecycle stage a hook is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Before compilation, for every strategy.
	Before,
	/// Before compilation with the `build` strategy.
	BeforeBuild,
	/// Before compilation with the `create` strategy.
	BeforeCreate,
	/// After a `build` compile finished.
	AfterBuild,
	/// After a `create` compile persisted the instance.
	AfterCreate,
	/// After compilation, for every strategy.
	After,
}

impl Stage {
	/// All stages, in lifecycle order.
	pub const ALL: [Stage; 6] = [
		Stage::Before,
		Stage::BeforeBuild,
		Stage::BeforeCreate,
		Stage::AfterBuild,
		Stage::AfterCreate,
		Stage::After,
	];

	/// Canonical name of the stage.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Before => "before",
			Self::BeforeBuild => "before_build",
			Self::BeforeCreate => "before_create",
			Self::AfterBuild => "after_build",
			Self::AfterCreate => "after_create",
			Self::After => "after",
		}
	}

	/// Returns true for the stages fired before hydration, where no instance exists yet.
	pub fn is_before(&self) -> bool {
		matches!(self, Self::Before | Self::BeforeBuild | Self::BeforeCreate)
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Stage {
	type Err = FixtureError;

	/// Accepts the canonical snake_case names and their camelCase spelling.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"before" => Ok(Self::Before),
			"before_build" | "beforeBuild" => Ok(Self::BeforeBuild),
			"before_create" | "beforeCreate" => Ok(Self::BeforeCreate),
			"after_build" | "afterBuild" => Ok(Self::AfterBuild),
			"after_create" | "afterCreate" => Ok(Self::AfterCreate),
			"after" => Ok(Self::After),
			_ => Err(FixtureError::invalid_argument(format!(
				"Invalid Hook: lifecycle stage `{}` does not exist.",
				s
			))),
		}
	}
}

/// Hook callback. Receives the hydrated instance, or `None` before hydration.
pub type HookCallback =
	Box<dyn Fn(Option<&dyn FixtureObject>) -> FixtureResult<()> + Send + Sync>;

struct HookInner {
	stage: Stage,
	callback: HookCallback,
}

/// A callback bound to one lifecycle stage.
///
/// Cloning a hook yields the same hook: equality is identity, which is what
/// [`HookRegistry::remove`] matches on.
#[derive(Clone)]
pub struct Hook {
	inner: Arc<HookInner>,
}

impl Hook {
	/// Creates a hook from a stage name.
	///
	/// # Errors
	///
	/// Returns a configuration error if `stage` is not a lifecycle stage.
	///
	/// # Examples
	///
	/// ```
	/// use fixturebot_core::hooks::Hook;
	///
	/// let hook = Hook::new("afterCreate", |_| Ok(())).unwrap();
	/// assert_eq!(hook.stage().as_str(), "after_create");
	///
	/// assert!(Hook::new("during", |_| Ok(())).is_err());
	/// ```
	pub fn new<F>(stage: &str, callback: F) -> FixtureResult<Self>
	where
		F: Fn(Option<&dyn FixtureObject>) -> FixtureResult<()> + Send + Sync + 'static,
	{
		let stage = stage.parse::<Stage>()?;
		Ok(Self::on(stage, callback))
	}

	/// Creates a hook for a known stage.
	pub fn on<F>(stage: Stage, callback: F) -> Self
	where
		F: Fn(Option<&dyn FixtureObject>) -> FixtureResult<()> + Send + Sync + 'static,
	{
		Self {
			inner: Arc::new(HookInner {
				stage,
				callback: Box::new(callback),
			}),
		}
	}

	/// Creates a hook whose callback only sees instances of `M`.
	///
	/// Instances of other models are passed as `None`.
	pub fn for_model<M, F>(stage: Stage, callback: F) -> Self
	where
		M: Fixture,
		F: Fn(Option<&M>) -> FixtureResult<()> + Send + Sync + 'static,
	{
		Self::on(stage, move |instance| {
			callback(instance.and_then(|object| object.downcast_ref::<M>()))
		})
	}

	/// Stage this hook is bound to.
	pub fn stage(&self) -> Stage {
		self.inner.stage
	}

	/// Invokes the callback.
	pub fn run(&self, instance: Option<&dyn FixtureObject>) -> FixtureResult<()> {
		(self.inner.callback)(instance)
	}
}

impl PartialEq for Hook {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for Hook {}

impl fmt::Debug for Hook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hook")
			.field("stage", &self.inner.stage)
			.finish_non_exhaustive()
	}
}
