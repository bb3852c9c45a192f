use crate::name::Token;
use thiserror::Error;

/// Errors that can surface from the registry and the intent dispatchers.
///
/// Plain lookups (`get_meta_data`, `get_operator`, ...) never produce one of
/// these - they return `None` / an empty list, per the "lookup errors are
/// local" rule. This type only covers the fail-fast paths: registration
/// conflicts and construction failures that can't be resolved at the
/// type-erased layer.
#[derive(Debug, Error)]
pub enum ReflectError {
	#[error("token `{token}` is already bound to a structurally different descriptor: {reason}")]
	RegistrationConflict { token: Token, reason: &'static str },

	#[error("no legal construction path for intent `{intent}` on type `{type_name}`")]
	UnsupportedIntent {
		intent: &'static str,
		type_name: Token,
	},

	#[error("attempted to use a never-completed type `{type_name}` as a value")]
	IncompleteType { type_name: Token },

	#[error("internal invariant violated: {0}")]
	AssumptionFailure(&'static str),
}

pub type Result<T> = ::std::result::Result<T, ReflectError>;
