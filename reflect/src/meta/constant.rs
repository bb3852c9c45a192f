//! [`MetaConst`] - the descriptor for a named enumerator / compile-time
//! constant value.

use super::{identity_by_token, DMeta, Meta, MetaKind};
use crate::name::Token;

#[derive(Debug)]
pub struct MetaConst {
	pub base: Meta,
	pub value_type: DMeta,
	/// Points into the owning type's static storage for the named value.
	/// Raw rather than typed, since `MetaConst` is reached through the
	/// type-erased registry long after the originating `T` has gone out of
	/// scope at the call site.
	pub ptr_to_value: *const u8,
}

identity_by_token!(MetaConst);

// `*const u8` doesn't carry thread-ownership semantics of its own; a
// `MetaConst` only ever points at `'static` storage owned by the
// reflected type itself, which is always `Send + Sync` by construction
// (see `synth.rs`), so asserting it here is sound.
unsafe impl Send for MetaConst {}
unsafe impl Sync for MetaConst {}

impl MetaConst {
	/// # Safety
	/// `ptr_to_value` must point at `'static` storage of type described by
	/// `value_type` for as long as this descriptor is reachable.
	pub unsafe fn new(token: Token, library_name: Token, value_type: DMeta, ptr_to_value: *const u8) -> Self {
		Self {
			base: Meta::new(MetaKind::Constant, token, library_name),
			value_type,
			ptr_to_value,
		}
	}
}
