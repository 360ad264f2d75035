//! Implementation of `#[derive(Fixture)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::attr_parser::{ContainerAttrs, FieldAttrs};
use crate::crate_paths::get_fixturebot_crate;

/// A field exposed as a fixture property.
struct PropertyField {
	ident: syn::Ident,
	property: String,
}

pub(crate) fn derive_fixture_impl(input: DeriveInput) -> syn::Result<TokenStream> {
	let krate = get_fixturebot_crate()?;
	let name = &input.ident;

	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"#[derive(Fixture)] does not support generic structs",
		));
	}

	let fields = match &input.data {
		Data::Struct(data) => match &data.fields {
			Fields::Named(fields) => &fields.named,
			_ => {
				return Err(syn::Error::new_spanned(
					&input,
					"#[derive(Fixture)] only supports structs with named fields",
				));
			}
		},
		_ => {
			return Err(syn::Error::new_spanned(
				&input,
				"#[derive(Fixture)] only supports structs",
			));
		}
	};

	let container = ContainerAttrs::from_attributes(&input.attrs)?;
	let model_id = container.model.unwrap_or_else(|| name.to_string());

	let mut properties = Vec::new();
	for field in fields {
		let attrs = FieldAttrs::from_attributes(&field.attrs)?;
		if attrs.skip {
			continue;
		}
		let Some(ident) = field.ident.clone() else {
			continue;
		};
		let property = attrs.rename.unwrap_or_else(|| ident.to_string());
		if properties
			.iter()
			.any(|existing: &PropertyField| existing.property == property)
		{
			return Err(syn::Error::new_spanned(
				field,
				format!("duplicate fixture property `{}`", property),
			));
		}
		properties.push(PropertyField { ident, property });
	}

	let setters = properties.iter().map(|field| {
		let ident = &field.ident;
		let property = LitStr::new(&field.property, ident.span());
		quote! {
			.with(#property, |instance: &mut #name, value: #krate::Value| -> #krate::FixtureResult<()> {
				instance.#ident = #krate::FromValue::from_value(value)?;
				::std::result::Result::Ok(())
			})
		}
	});

	let snapshot = properties.iter().map(|field| {
		let ident = &field.ident;
		let property = LitStr::new(&field.property, ident.span());
		quote! {
			properties.insert(
				::std::string::String::from(#property),
				#krate::Value::from(::std::clone::Clone::clone(&self.#ident)),
			);
		}
	});

	let save = container.persist.map(|method| {
		quote! {
			fn save(&mut self) -> #krate::FixtureResult<()> {
				self.#method().map_err(|error| #krate::FixtureError::Persistence {
					model: ::std::string::String::from(#model_id),
					source: ::std::convert::Into::into(error),
				})
			}
		}
	});

	Ok(quote! {
		impl #krate::Fixture for #name {
			fn model_id() -> &'static str {
				#model_id
			}

			fn mutators() -> #krate::MutatorTable<Self> {
				#krate::MutatorTable::new()
					#(#setters)*
			}

			fn properties(&self) -> #krate::indexmap::IndexMap<::std::string::String, #krate::Value> {
				let mut properties = #krate::indexmap::IndexMap::new();
				#(#snapshot)*
				properties
			}

			#save
		}

		impl ::std::convert::From<#name> for #krate::Value {
			fn from(instance: #name) -> Self {
				#krate::Value::instance(instance)
			}
		}

		impl #krate::FromValue for #name {
			fn from_value(value: #krate::Value) -> #krate::FixtureResult<Self> {
				value.into_instance()
			}
		}
	})
}
