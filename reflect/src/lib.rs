//! A process-wide runtime type information registry and reflection core.
//!
//! Four pieces, leaf to root: name derivation + hashing give every type a
//! stable identity ([`name`], [`hash`]); the intent taxonomy ([`intent`])
//! replaces plain copy/move with a seven-way value-transfer contract;
//! descriptor synthesis ([`synth`]) turns a type's reflection opt-ins into
//! a [`meta::MetaData`]; the registry ([`registry`]) interns descriptors
//! process-wide and answers queries by token. [`cast`] layers comparison
//! and casting predicates on top; [`boundary`] scopes bulk unloads to a
//! library's descriptors.

pub mod boundary;
pub mod builtin;
pub mod cast;
pub mod config;
pub mod error;
pub mod hash;
pub mod intent;
pub mod meta;
pub mod name;
pub mod registry;
pub mod synth;

pub use error::{ReflectError, Result};
pub use hash::Hash;
pub use meta::{CMeta, DMeta, MetaConst, MetaData, MetaTrait, MetaVerb, TMeta, VMeta};
pub use name::Token;
pub use reflect_derive::Reflect;
pub use synth::Reflected;

/// Force synthesis (and, transitively, registration) of `T`'s descriptor.
/// The common entry point, analogous to `MetaDataOf<T>()`.
pub fn meta_data_of<T: Reflected + Sized>() -> DMeta {
	synth::synthesize::<T>()
}

/// Force synthesis of the [`MetaTrait`] for a `T: ReflectedTrait` marker
/// type, analogous to `MetaTraitOf<T>()` (spec.md §6). Rust has no return
/// type overloaded on which opt-in trait `T` implements, so `MetaOf<T>()`'s
/// dispatch collapses to these three separate, kind-specific entry points
/// rather than one polymorphic function.
pub fn meta_trait_of<T: synth::ReflectedTrait + Sized>() -> TMeta {
	synth::synthesize_trait::<T>()
}

/// Force synthesis of the [`MetaVerb`] for a `T: ReflectedVerb` marker
/// type, analogous to `MetaVerbOf<T>()` (spec.md §6).
pub fn meta_verb_of<T: synth::ReflectedVerb + Sized>() -> VMeta {
	synth::synthesize_verb::<T>()
}

/// Synthesize a pointer-layer descriptor over a pointee that isn't known
/// to be `Reflected`/`Sized` - the unbounded counterpart of
/// `meta_data_of`'s `Reflected: Sized` path, for pointers to incomplete or
/// unsized types (spec.md §3, §7).
pub fn pointee_meta_of<T: ?Sized + 'static>(is_const: bool) -> DMeta {
	synth::synthesize_pointer_to_incomplete::<T>(is_const)
}

/// Look up an already-registered data descriptor by token, without
/// triggering synthesis. Returns `None` for an unknown or not-yet-seen
/// type - lookup errors are local, per spec.md §7.
pub fn get_meta_data(token: &str) -> Option<DMeta> {
	registry::database().get_meta_data(token)
}

pub fn get_meta_trait(token: &str) -> Option<TMeta> {
	registry::database().get_meta_trait(token)
}

pub fn get_meta_verb(token: &str) -> Option<VMeta> {
	registry::database().get_meta_verb(token)
}

pub fn get_meta_constant(token: &str) -> Option<CMeta> {
	registry::database().get_meta_constant(token)
}

pub fn get_operator(token: &str) -> Option<VMeta> {
	registry::database().get_operator(token)
}

pub fn get_ambiguous_meta(short: &str) -> Vec<registry::MetaAny> {
	registry::database().get_ambiguous_meta(short)
}

/// The canonical token for `T`, without requiring `T: Reflected`. Useful
/// for diagnostics and for building the keys `get_meta_data` etc. expect.
pub fn name_of<T: ?Sized>() -> Token {
	name::name_of::<T>()
}

/// True iff `T` has already been synthesized and registered - doesn't
/// trigger synthesis itself, unlike [`meta_data_of`].
pub fn is_reflected<T: ?Sized>() -> bool {
	registry::database().get_meta_data(name_of::<T>()).is_some()
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Widget {
		#[allow(dead_code)]
		value: i32,
	}

	impl Reflected for Widget {}

	#[test]
	fn meta_data_of_registers_and_is_idempotent() {
		assert!(!is_reflected::<Widget>());
		let a = meta_data_of::<Widget>();
		let b = meta_data_of::<Widget>();
		assert!(std::sync::Arc::ptr_eq(&a, &b));
		assert!(is_reflected::<Widget>());
	}

	#[test]
	fn unknown_token_lookup_returns_none() {
		assert!(get_meta_data("Nonexistent::Token::Xyz123").is_none());
	}
}
