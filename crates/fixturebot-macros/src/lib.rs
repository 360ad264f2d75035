//! Procedural macros for fixturebot.
//!
//! This crate provides the `#[derive(Fixture)]` macro, which makes a struct
//! buildable by a fixture factory.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attr_parser;
mod crate_paths;
mod fixture_derive;

/// Derives a `Fixture` implementation for a struct with named fields.
///
/// Every field becomes a settable property whose setter converts the
/// resolved value with `FromValue`. Field types must also convert into
/// `Value` and be `Clone`, for the property snapshot.
///
/// # Attributes
///
/// ## Struct-level attributes
///
/// - `#[fixture(model = "name")]` - Model identifier used in diagnostics (default: struct name)
/// - `#[fixture(persist = "method")]` - Inherent `fn method(&mut self) -> Result<(), E>` invoked by
///   the `create` strategy; `E` must convert into a boxed error
///
/// ## Field-level attributes
///
/// - `#[fixture(rename = "name")]` - Property name, if different from the field name
/// - `#[fixture(skip)]` - Field keeps its `Default` value and is not settable
///
/// # Example
///
/// ```ignore
/// use fixturebot::prelude::*;
///
/// #[derive(Debug, Clone, Default, Fixture)]
/// #[fixture(persist = "insert")]
/// struct User {
///     id: u64,
///     #[fixture(rename = "firstName")]
///     first_name: String,
///     #[fixture(skip)]
///     saved: bool,
/// }
///
/// impl User {
///     fn insert(&mut self) -> Result<(), std::io::Error> {
///         self.saved = true;
///         Ok(())
///     }
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl fixturebot::Fixture for User {
///     fn model_id() -> &'static str {
///         "User"
///     }
///
///     fn mutators() -> fixturebot::MutatorTable<Self> {
///         fixturebot::MutatorTable::new()
///             .with("id", |instance: &mut User, value| { /* FromValue */ })
///             .with("firstName", |instance: &mut User, value| { /* FromValue */ })
///     }
///
///     fn properties(&self) -> IndexMap<String, fixturebot::Value> { /* id, firstName */ }
///
///     fn save(&mut self) -> fixturebot::FixtureResult<()> {
///         self.insert().map_err(/* FixtureError::Persistence */)
///     }
/// }
///
/// impl From<User> for fixturebot::Value { /* Value::instance */ }
/// impl fixturebot::FromValue for User { /* Value::into_instance */ }
/// ```
#[proc_macro_derive(Fixture, attributes(fixture))]
pub fn derive_fixture(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	fixture_derive::derive_fixture_impl(input)
		.unwrap_or_else(|err| err.to_compile_error())
		.into()
}
