mod reflect;

use proc_macro::TokenStream;

/// Derives [`reflect::Reflected`] for a named-field struct: offsets and
/// types of every field become `Member`s, and the erased vtable is wired
/// up according to which standard traits (`Default`, `Clone`, `Copy`,
/// `PartialEq`) the struct also derives.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	reflect::derive(input).into()
}
