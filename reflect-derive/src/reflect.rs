use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Field, Fields, Path, Token, Type};

/// Derives read from the struct's own `#[derive(...)]` attribute list -
/// macros see the whole item, including sibling derive attributes, so we
/// can tell whether the host type also derives `Default`/`Clone`/`Copy`/
/// `PartialEq` and wire the corresponding vtable slot only when the
/// standard trait is actually available.
fn sibling_derives(attrs: &[Attribute]) -> HashSet<String> {
	let mut found = HashSet::new();
	for attr in attrs {
		if !attr.path().is_ident("derive") {
			continue;
		}
		let Ok(paths) = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) else {
			continue;
		};
		for path in paths {
			if let Some(ident) = path.get_ident() {
				found.insert(ident.to_string());
			}
		}
	}
	found
}

/// Struct-level `#[reflect(...)]` overrides (spec.md §4.3, SPEC_FULL.md §4.3).
#[derive(Default)]
struct ContainerArgs {
	name: Option<String>,
	info: Option<String>,
	suffix: Option<String>,
	file_extensions: Option<String>,
	bases: Vec<Type>,
}

fn string_value(input: syn::parse::ParseStream) -> syn::Result<String> {
	let lit: syn::LitStr = input.parse()?;
	Ok(lit.value())
}

fn container_args(attrs: &[Attribute]) -> ContainerArgs {
	let mut args = ContainerArgs::default();
	for attr in attrs {
		if !attr.path().is_ident("reflect") {
			continue;
		}
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("name") {
				args.name = Some(string_value(meta.value()?)?);
			} else if meta.path.is_ident("info") {
				args.info = Some(string_value(meta.value()?)?);
			} else if meta.path.is_ident("suffix") {
				args.suffix = Some(string_value(meta.value()?)?);
			} else if meta.path.is_ident("file_extensions") {
				args.file_extensions = Some(string_value(meta.value()?)?);
			} else if meta.path.is_ident("base") {
				let ty: Type = meta.value()?.parse()?;
				args.bases.push(ty);
			} else {
				return Err(meta.error("unrecognized #[reflect(...)] key; expected name/info/suffix/file_extensions/base"));
			}
			Ok(())
		})
		.unwrap_or_else(|e| panic!("invalid #[reflect(...)] attribute: {e}"));
	}
	args
}

/// Field-level `#[reflect(...)]` markers.
#[derive(Default)]
struct FieldArgs {
	skip: bool,
	base: bool,
}

fn field_args(field: &Field) -> FieldArgs {
	let mut args = FieldArgs::default();
	for attr in &field.attrs {
		if !attr.path().is_ident("reflect") {
			continue;
		}
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("skip") {
				args.skip = true;
			} else if meta.path.is_ident("base") {
				args.base = true;
			} else {
				return Err(meta.error("unrecognized #[reflect(...)] field key; expected skip/base"));
			}
			Ok(())
		})
		.unwrap_or_else(|e| panic!("invalid #[reflect(...)] field attribute: {e}"));
	}
	args
}

pub fn derive(tokens: proc_macro::TokenStream) -> TokenStream {
	let DeriveInput {
		attrs,
		ident,
		generics,
		data,
		..
	} = syn::parse(tokens).unwrap();

	if !generics.params.is_empty() {
		panic!("Reflect does not support generic types");
	}

	let fields = match data {
		Data::Struct(data) => match data.fields {
			Fields::Named(named) => named.named,
			Fields::Unit => Punctuated::new(),
			Fields::Unnamed(_) => panic!("Reflect does not support tuple structs"),
		},
		Data::Enum(_) => panic!("Reflect does not support enums; use MetaConst registration directly for named values"),
		Data::Union(_) => panic!("Reflect does not support unions"),
	};

	let derives = sibling_derives(&attrs);
	let has_default = derives.contains("Default");
	let has_clone = derives.contains("Clone");
	let has_copy = derives.contains("Copy");
	let has_partial_eq = derives.contains("PartialEq");

	let container = container_args(&attrs);

	let members = fields.iter().filter_map(|field| {
		let field_args = field_args(field);
		if field_args.skip || field_args.base {
			return None;
		}
		let field_ident = field.ident.as_ref().expect("named field");
		let field_name = field_ident.to_string();
		let field_ty = &field.ty;
		Some(quote! {
			::reflect::synth::MemberSpec {
				name: #field_name,
				offset: ::std::mem::offset_of!(#ident, #field_ident),
				count: 1,
				retrieve: ::reflect::synth::synthesize::<#field_ty>,
				trait_retrieve: None,
			}
		})
	});

	// Explicit `#[reflect(base = "...")]` container attributes declare
	// zero-offset marker bases, the same shape `builtin.rs`'s
	// `reflect_numeric!` macro wires for `Number`/`Signed`/`Unsigned`.
	// `#[reflect(base)]` fields embed the field's own type at its real
	// offset instead. Neither path can determine binary compatibility at
	// macro-expansion time, so both declare `binary_compatible: false`;
	// a hand-written `Reflected` impl remains the way to assert it.
	let container_bases = container.bases.iter().map(|ty| {
		quote! {
			::reflect::synth::BaseSpec {
				retrieve: ::reflect::synth::synthesize::<#ty>,
				count: 1,
				offset: 0,
				binary_compatible: false,
				imposed: false,
			}
		}
	});
	let field_bases = fields.iter().filter_map(|field| {
		let field_args = field_args(field);
		if !field_args.base {
			return None;
		}
		let field_ident = field.ident.as_ref().expect("named field");
		let field_ty = &field.ty;
		Some(quote! {
			::reflect::synth::BaseSpec {
				retrieve: ::reflect::synth::synthesize::<#field_ty>,
				count: 1,
				offset: ::std::mem::offset_of!(#ident, #field_ident),
				binary_compatible: false,
				imposed: false,
			}
		})
	});
	let bases: Vec<_> = container_bases.chain(field_bases).collect();

	let vtable_body = if has_copy && has_clone && has_default && has_partial_eq {
		quote! { ::reflect::synth::pod_vtable::<#ident>() }
	} else if has_clone && has_default && has_partial_eq {
		quote! { ::reflect::synth::clone_vtable::<#ident>() }
	} else {
		let default_ctor = if has_default {
			quote! { Some(::reflect::synth::default_ctor_shim::<#ident>) }
		} else {
			quote! { None }
		};
		let (clone_ctor, clone_assign) = if has_clone {
			(
				quote! { Some(::reflect::synth::clone_ctor_shim::<#ident>) },
				quote! { Some(::reflect::synth::clone_assign_shim::<#ident>) },
			)
		} else {
			(quote! { None }, quote! { None })
		};
		let comparer = if has_partial_eq {
			quote! { Some(::reflect::synth::comparer_shim::<#ident>) }
		} else {
			quote! { None }
		};
		quote! {
			::reflect::meta::data::DataVTable {
				default_ctor: #default_ctor,
				descriptor_ctor: None,
				refer_ctor: #clone_ctor,
				copy_ctor: #clone_ctor,
				move_ctor: Some(::reflect::synth::move_ctor_shim::<#ident>),
				clone_ctor: #clone_ctor,
				disown_ctor: #clone_ctor,
				abandon_ctor: Some(::reflect::synth::abandon_ctor_shim::<#ident>),
				destructor: Some(::reflect::synth::destructor_shim::<#ident>),
				refer_assign: #clone_assign,
				copy_assign: #clone_assign,
				move_assign: Some(::reflect::synth::move_assign_shim::<#ident>),
				clone_assign: #clone_assign,
				disown_assign: #clone_assign,
				abandon_assign: Some(::reflect::synth::abandon_assign_shim::<#ident>),
				comparer: #comparer,
				resolver: None,
				hasher: None,
				dispatcher_mutable: None,
				dispatcher_constant: None,
			}
		}
	};

	let flags = if has_copy {
		quote! { ::reflect::meta::data::DataFlags::POD }
	} else {
		quote! { ::reflect::meta::data::DataFlags::empty() }
	};

	let name_override = match &container.name {
		Some(n) => quote! { #n },
		None => quote! { "" },
	};
	let info_override = match &container.info {
		Some(s) => quote! { #s },
		None => quote! { "" },
	};
	let suffix_override = match &container.suffix {
		Some(s) => quote! { #s },
		None => quote! { "" },
	};
	let file_extensions_override = match &container.file_extensions {
		Some(s) => quote! { #s },
		None => quote! { "" },
	};

	quote! {
		impl ::reflect::Reflected for #ident {
			fn name() -> &'static str {
				#name_override
			}

			fn info() -> &'static str {
				#info_override
			}

			fn suffix() -> &'static str {
				#suffix_override
			}

			fn file_extensions() -> &'static str {
				#file_extensions_override
			}

			fn flags() -> ::reflect::meta::data::DataFlags {
				#flags
			}

			fn bases() -> ::std::vec::Vec<::reflect::synth::BaseSpec> {
				::std::vec![#(#bases),*]
			}

			fn members() -> ::std::vec::Vec<::reflect::synth::MemberSpec> {
				::std::vec![#(#members),*]
			}

			fn vtable() -> ::reflect::meta::data::DataVTable {
				#vtable_body
			}
		}
	}
}
