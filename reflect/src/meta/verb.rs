//! [`MetaVerb`] - the descriptor for a dynamically dispatched operation.

use fxhash::FxHashSet;

use super::{identity_by_token, DMeta, Meta, MetaKind};
use crate::name::Token;

pub type StatelessFn = unsafe fn(dst: *mut u8);
pub type DefaultMutableFn = unsafe fn(ptr: *mut u8, verb: *mut ());
pub type DefaultConstantFn = unsafe fn(ptr: *const u8, verb: *mut ());

/// A verb has exactly one canonical identity; its positive and reverse
/// tokens both resolve to the same `MetaVerb` (spec.md §4.5).
#[derive(Debug)]
pub struct MetaVerb {
	pub base: Meta,
	pub token_reverse: Token,
	pub operator: Token,
	pub operator_reverse: Token,
	pub precedence: f64,

	pub default_mutable: Option<DefaultMutableFn>,
	pub default_constant: Option<DefaultConstantFn>,
	pub default_stateless: Option<StatelessFn>,

	/// Data types known to implement this verb, in registration order of
	/// discovery (not index-significant, see spec.md §5 Ordering).
	pub able: FxHashSet<DMeta>,
}

identity_by_token!(MetaVerb);

impl MetaVerb {
	pub fn new(token: Token, token_reverse: Token, library_name: Token) -> Self {
		Self {
			base: Meta::new(MetaKind::Verb, token, library_name),
			token_reverse,
			operator: "",
			operator_reverse: "",
			precedence: 0.0,
			default_mutable: None,
			default_constant: None,
			default_stateless: None,
			able: FxHashSet::default(),
		}
	}

	pub fn with_operators(mut self, operator: Token, operator_reverse: Token) -> Self {
		self.operator = operator;
		self.operator_reverse = operator_reverse;
		self
	}
}
