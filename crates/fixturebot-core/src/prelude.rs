//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use fixturebot_core::prelude::*;
//! ```

// Error types
pub use crate::error::{FixtureError, FixtureResult};

// Model capability
pub use crate::fixture::Fixture;
pub use crate::mutator::MutatorTable;
pub use crate::value::{FromValue, Value};

// Definitions
pub use crate::factory::Factory;
pub use crate::registry::{DefineOptions, DefinitionRegistry};
pub use crate::rule::{BuildContext, Properties, Rule};
pub use crate::settings::FixtureSettings;

// Strategies and hooks
pub use crate::hooks::{Hook, Stage};
pub use crate::strategy::{BuildStrategy, CreateStrategy, LifecycleNotifier, Strategy};

// Functions
pub use crate::definitions::{
	build, create, define, extend, hook, purge, purge_hooks, register_global_hook,
	register_strategy, relation, relation_with, relations, relations_with, remove_global_hook,
	run, run_json, sequence, sequence_with,
};
