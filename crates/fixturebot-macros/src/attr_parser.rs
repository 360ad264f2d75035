//! Attribute parsing for `#[fixture(...)]`.

use syn::{
	Attribute, Error, Ident, Lit, Result, Token,
	parse::{Parse, ParseStream},
	punctuated::Punctuated,
};

/// Parsed container attributes.
#[derive(Debug, Clone, Default)]
pub(crate) struct ContainerAttrs {
	/// Model identifier; defaults to the struct name
	pub(crate) model: Option<String>,
	/// Inherent method used as the persistence capability
	pub(crate) persist: Option<Ident>,
}

/// Parsed field attributes.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldAttrs {
	/// Field has no mutator and is left out of the property snapshot
	pub(crate) skip: bool,
	/// Property name, if different from the field name
	pub(crate) rename: Option<String>,
}

impl ContainerAttrs {
	/// Collects every `#[fixture(...)]` attribute of the container.
	pub(crate) fn from_attributes(attrs: &[Attribute]) -> Result<Self> {
		let mut result = Self::default();
		for item in fixture_items(attrs)? {
			match item {
				AttrItem::NameValue { name, value } => match name.to_string().as_str() {
					"model" => {
						if result.model.is_some() {
							return Err(Error::new(name.span(), "duplicate `model` attribute"));
						}
						result.model = Some(lit_str(&value)?);
					}
					"persist" => {
						if result.persist.is_some() {
							return Err(Error::new(name.span(), "duplicate `persist` attribute"));
						}
						let method = lit_str(&value)?;
						result.persist = Some(syn::parse_str::<Ident>(&method).map_err(|_| {
							Error::new_spanned(&value, format!("`{}` is not a method name", method))
						})?);
					}
					_ => {
						return Err(Error::new(
							name.span(),
							format!("unknown attribute `{}`", name),
						));
					}
				},
				AttrItem::Flag(name) => {
					return Err(Error::new(
						name.span(),
						format!("unknown flag attribute `{}`", name),
					));
				}
			}
		}
		Ok(result)
	}
}

impl FieldAttrs {
	/// Collects every `#[fixture(...)]` attribute of a field.
	pub(crate) fn from_attributes(attrs: &[Attribute]) -> Result<Self> {
		let mut result = Self::default();
		for item in fixture_items(attrs)? {
			match item {
				AttrItem::Flag(name) => match name.to_string().as_str() {
					"skip" => {
						if result.skip {
							return Err(Error::new(name.span(), "duplicate `skip` attribute"));
						}
						result.skip = true;
					}
					_ => {
						return Err(Error::new(
							name.span(),
							format!("unknown flag attribute `{}`", name),
						));
					}
				},
				AttrItem::NameValue { name, value } => match name.to_string().as_str() {
					"rename" => {
						if result.rename.is_some() {
							return Err(Error::new(name.span(), "duplicate `rename` attribute"));
						}
						result.rename = Some(lit_str(&value)?);
					}
					_ => {
						return Err(Error::new(
							name.span(),
							format!("unknown attribute `{}`", name),
						));
					}
				},
			}
		}

		if result.skip
			&& let Some(rename) = &result.rename
		{
			return Err(Error::new(
				proc_macro2::Span::call_site(),
				format!("`skip` and `rename = \"{}\"` are mutually exclusive", rename),
			));
		}

		Ok(result)
	}
}

fn fixture_items(attrs: &[Attribute]) -> Result<Vec<AttrItem>> {
	let mut items = Vec::new();
	for attr in attrs.iter().filter(|attr| attr.path().is_ident("fixture")) {
		let list: AttrList = attr.parse_args()?;
		items.extend(list.0);
	}
	Ok(items)
}

struct AttrList(Vec<AttrItem>);

impl Parse for AttrList {
	fn parse(input: ParseStream) -> Result<Self> {
		let items = Punctuated::<AttrItem, Token![,]>::parse_terminated(input)?;
		Ok(Self(items.into_iter().collect()))
	}
}

/// Single attribute: either a flag or a name-value pair.
enum AttrItem {
	/// Flag attribute (e.g., `skip`)
	Flag(Ident),
	/// Name-value attribute (e.g., `rename = "value"`)
	NameValue { name: Ident, value: Lit },
}

impl Parse for AttrItem {
	fn parse(input: ParseStream) -> Result<Self> {
		let name: Ident = input.parse()?;

		if input.peek(Token![=]) {
			let _eq: Token![=] = input.parse()?;
			let value: Lit = input.parse()?;
			Ok(AttrItem::NameValue { name, value })
		} else {
			Ok(AttrItem::Flag(name))
		}
	}
}

fn lit_str(lit: &Lit) -> Result<String> {
	match lit {
		Lit::Str(s) => Ok(s.value()),
		_ => Err(Error::new_spanned(lit, "expected a string literal")),
	}
}
