//! Library boundary protocol: the per-library identifier captured at
//! descriptor registration time, used to scope bulk unloads (spec.md
//! §4.5, §6).

use crate::config;
use crate::registry::database;

/// Call once, early, from a shared library/plugin's load routine, before
/// it registers any reflected type. The main executable doesn't need to
/// call this - it defaults to [`config::MAIN_BOUNDARY`], and registering
/// under `"MAIN"` also keeps the default pool tactic unforced (spec.md
/// §4.5).
///
/// Returns `false` if a boundary was already set for this process - first
/// caller wins, mirroring the "Nifty Counter" one-time initialization the
/// reference design relies on elsewhere.
pub fn enter(name: &'static str) -> bool {
	let first = config::set_boundary(name);
	#[cfg(feature = "tracing")]
	if first {
		tracing::info!(boundary = name, "entered library boundary");
	} else {
		tracing::warn!(boundary = name, current = config::boundary(), "boundary already set, ignoring");
	}
	first
}

/// The boundary this process (or the calling plugin) is currently
/// registering descriptors under.
pub fn current() -> &'static str {
	config::boundary()
}

/// Remove every descriptor registered under `boundary`, regardless of
/// reference count, and drop it from every index it participated in. Safe
/// to call even if `boundary` registered nothing.
pub fn unload(boundary: &str) {
	database().unload_library(boundary);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::meta::data::DataVTable;
	use crate::meta::{Meta, MetaData, MetaKind};

	#[test]
	fn unload_is_idempotent_for_unknown_boundary() {
		unload("NeverRegistered");
		unload("NeverRegistered");
	}

	#[test]
	fn unload_removes_descriptors_registered_under_it() {
		let meta = MetaData {
			base: Meta::new(MetaKind::Data, "Boundary::Test::Widget", "PluginBoundaryTest"),
			members: Vec::new(),
			abilities: Default::default(),
			bases: Vec::new(),
			converters: Default::default(),
			named_values: Vec::new(),
			origin: None,
			deptr: None,
			concrete: None,
			producer: None,
			flags: Default::default(),
			size: 4,
			alignment: 4,
			allocation_page: 4096,
			allocation_table: Vec::new(),
			file_extensions: "",
			suffix: "",
			pool_tactic: crate::meta::data::PoolTactic::Default,
			vtable: DataVTable::default(),
		};
		database().register_data(meta).unwrap();
		assert!(database().get_meta_data("Boundary::Test::Widget").is_some());
		unload("PluginBoundaryTest");
		assert!(database().get_meta_data("Boundary::Test::Widget").is_none());
	}
}
