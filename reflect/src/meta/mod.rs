//! The closed descriptor family: [`MetaData`], [`MetaTrait`], [`MetaVerb`],
//! [`MetaConst`], all built on a shared [`Meta`] identity header.
//!
//! The reference design gets polymorphism here from a `GetMetaType()`
//! virtual; we use a plain [`MetaKind`] tag plus one struct per kind
//! instead, and publish descriptors behind `Arc` rather than hand-rolled
//! reference counting - `Arc::strong_count` already *is* the `references`
//! field the reference design tracks by hand, and two clones of the same
//! `Arc` are trivially the same descriptor for `IsExact`.

pub mod constant;
pub mod data;
pub mod trait_;
pub mod verb;

use std::sync::Arc;

pub use constant::MetaConst;
pub use data::MetaData;
pub use trait_::MetaTrait;
pub use verb::MetaVerb;

use crate::hash::Hash;
use crate::name::Token;

pub type DMeta = Arc<MetaData>;
pub type TMeta = Arc<MetaTrait>;
pub type VMeta = Arc<MetaVerb>;
pub type CMeta = Arc<MetaConst>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MetaKind {
	Data,
	Trait,
	Verb,
	Constant,
}

/// Fields shared by every descriptor kind, embedded by composition since
/// Rust has no struct inheritance.
#[derive(Debug, Clone)]
pub struct Meta {
	pub kind: MetaKind,
	pub token: Token,
	pub info: Token,
	pub cpp_name: Token,
	pub library_name: Token,
	pub hash: Hash,
	pub version_major: u32,
	pub version_minor: u32,
}

impl Meta {
	pub fn new(kind: MetaKind, token: Token, library_name: Token) -> Self {
		Self {
			kind,
			token,
			info: "",
			cpp_name: token,
			library_name,
			hash: crate::hash::hash_bytes(token.as_bytes()),
			version_major: 1,
			version_minor: 0,
		}
	}
}

/// Descriptors are compared and hashed by canonical token identity, not by
/// struct contents or pointer address - two `Arc`s from independent
/// registrations of an identical token are `==` even before interning
/// would normally have merged them.
macro_rules! identity_by_token {
	($ty:ty) => {
		impl PartialEq for $ty {
			fn eq(&self, other: &Self) -> bool {
				self.base.token == other.base.token
			}
		}
		impl Eq for $ty {}
		impl std::hash::Hash for $ty {
			fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
				self.base.token.hash(state)
			}
		}
	};
}

pub(crate) use identity_by_token;
