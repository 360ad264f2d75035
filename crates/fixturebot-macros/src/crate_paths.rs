//! Helper functions for dynamic crate path resolution using proc_macro_crate

use proc_macro2::TokenStream;
use quote::quote;

/// Resolves the path to the crate providing the `Fixture` trait.
///
/// The engine crate `fixturebot-core` is preferred; crates depending only on
/// the `fixturebot` facade get paths through the facade's re-exports.
/// Returns an error if neither crate is found in Cargo.toml.
pub(crate) fn get_fixturebot_crate() -> syn::Result<TokenStream> {
	use proc_macro_crate::{FoundCrate, crate_name};

	let found = crate_name("fixturebot-core").or_else(|_| crate_name("fixturebot"));
	match found {
		Ok(FoundCrate::Itself) => Ok(quote!(::fixturebot_core)),
		Ok(FoundCrate::Name(name)) => {
			let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
			Ok(quote!(::#ident))
		}
		Err(e) => Err(syn::Error::new(
			proc_macro2::Span::call_site(),
			format!(
				"failed to resolve `fixturebot` crate: {}. Ensure it is listed in Cargo.toml dependencies.",
				e
			),
		)),
	}
}
