use std::sync::OnceLock;

use crate::meta::data::PoolTactic;

/// Width of the `Hash` type this build was compiled with.
///
/// Selected by the mutually-preferred `hash128` > `hash64` > `hash32`
/// Cargo features (see `Cargo.toml`); exposed at runtime purely for
/// introspection/diagnostics, mirroring the platform-configurable hash
/// width called out in the data model.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HashWidth {
	Bits32,
	Bits64,
	Bits128,
}

impl HashWidth {
	pub const fn current() -> Self {
		#[cfg(feature = "hash128")]
		{
			HashWidth::Bits128
		}
		#[cfg(all(feature = "hash64", not(feature = "hash128")))]
		{
			HashWidth::Bits64
		}
		#[cfg(all(feature = "hash32", not(feature = "hash64"), not(feature = "hash128")))]
		{
			HashWidth::Bits32
		}
	}
}

static BOUNDARY: OnceLock<&'static str> = OnceLock::new();

/// The default boundary every descriptor is tagged with until the embedder
/// calls [`set_boundary`]. Corresponds to the executable boundary in the
/// reference design.
pub const MAIN_BOUNDARY: &str = "MAIN";

/// Set the library boundary tag this translation unit registers descriptors
/// under. Should be called once, early, by each shared library/plugin
/// before it registers any type; the main executable may leave it unset
/// and default to [`MAIN_BOUNDARY`].
///
/// Returns `false` if a boundary was already set (first caller wins, same
/// as the "Nifty Counter"-style one-time initialization the registry relies
/// on elsewhere).
pub fn set_boundary(name: &'static str) -> bool {
	BOUNDARY.set(name).is_ok()
}

/// The active boundary tag, defaulting to [`MAIN_BOUNDARY`].
pub fn boundary() -> &'static str {
	BOUNDARY.get().copied().unwrap_or(MAIN_BOUNDARY)
}

/// Default pool tactic applied to newly-synthesized descriptors that don't
/// opt into one explicitly. Forced to [`PoolTactic::Type`] for any boundary
/// other than [`MAIN_BOUNDARY`], so that plugins can't pollute the main
/// allocator's pools.
pub fn default_pool_tactic() -> PoolTactic {
	if boundary() == MAIN_BOUNDARY {
		PoolTactic::Default
	} else {
		PoolTactic::Type
	}
}

/// Global default allocation page size (bytes), used when a reflected type
/// doesn't opt into an explicit `AllocationPage`.
pub const DEFAULT_ALLOCATION_PAGE: usize = 4096;
