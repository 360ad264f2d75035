//! Test fixture generation engine.
//!
//! A fixture *definition* is a named [`Factory`] holding default value
//! rules for one model type. Compiling a definition produces a fresh,
//! fully-hydrated instance, optionally persisted, with per-call overrides.
//!
//! - **Rules**: literals, containers of rules, or generators evaluated lazily
//!   against the instance hydrated so far ([`Rule`], [`Properties`])
//! - **Strategies**: `build` (in memory), `create` (persisted) or any custom
//!   [`Strategy`] registered by name
//! - **Hooks**: callbacks bound to lifecycle stages, global or per definition
//!   ([`Hook`], [`LifecycleObserver`])
//! - **Sequences, relations and inheritance** between definitions
//!
//! # Quick Start
//!
//! ```ignore
//! use fixturebot::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Fixture)]
//! struct User {
//!     id: u64,
//!     first_name: String,
//!     email: String,
//! }
//!
//! define::<User>(
//!     "User",
//!     Properties::new()
//!         .set("id", sequence())
//!         .set("first_name", "Jane")
//!         .set("email", Rule::computed(|user: &User| format!("{}@example.com", user.first_name))),
//!     DefineOptions::new(),
//! )?;
//!
//! let user: User = build("User", Properties::new())?;
//! let other: User = create("User", Properties::new().set("first_name", "John"))?;
//! ```
//!
//! # Compile lifecycle
//!
//! ```text
//! before -> before_<strategy> -> hydration -> after_<strategy> -> after
//! ```
//!
//! Override keys are validated before the first stage fires. Errors raised by
//! generators, setters, persistence or hooks abort the call and are returned
//! unchanged.

#![warn(missing_docs)]

extern crate self as fixturebot_core;

pub mod definitions;
pub mod error;
pub mod factory;
pub mod fixture;
pub mod hooks;
pub mod mutator;
pub mod prelude;
pub mod registry;
pub mod rule;
pub mod settings;
pub mod strategy;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

#[doc(hidden)]
pub use indexmap;

pub use definitions::{
	build, configure, create, define, extend, hook, purge, purge_hooks, register_global_hook,
	register_strategy, relation, relation_with, relations, relations_with, remove_global_hook,
	run, run_json, sequence, sequence_with,
};
pub use error::{BoxError, FixtureError, FixtureResult};
pub use factory::{Factory, Sequence};
pub use fixture::{Fixture, FixtureObject};
pub use hooks::{Hook, HookRegistry, LifecycleObserver, Stage};
pub use mutator::{Mutator, MutatorTable, SetterFn, mutator_name, mutators_for};
pub use registry::{AnyFactory, DefineOptions, DefinitionRegistry};
pub use rule::{BuildContext, GeneratorFn, Properties, Rule};
pub use settings::FixtureSettings;
pub use strategy::{BuildStrategy, CreateStrategy, LifecycleNotifier, Strategy};
pub use value::{FromValue, Value};
