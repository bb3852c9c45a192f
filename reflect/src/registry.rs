//! `Database` - the process-global registry (spec.md §4.5).
//!
//! One process-wide instance, reached through [`database`]. Registration
//! interns a descriptor under its lowercase token; a second registration
//! of the same token bumps a reference count instead of allocating again.
//! Construction is one-time via `OnceLock`, the same "initialize once,
//! freeze, read concurrently" model spec.md §5 describes as the de-facto
//! thread-safety contract.

use std::sync::{Mutex, OnceLock};

use fxhash::FxHashMap;

use crate::error::{ReflectError, Result};
use crate::meta::{CMeta, DMeta, MetaConst, MetaData, MetaTrait, MetaVerb, TMeta, VMeta};
use crate::name::{isolate_operator, last_segment, to_lowercase, Token};

/// A registered descriptor together with its registration count, mirroring
/// spec.md §3's `references` field - kept explicit rather than piggybacked
/// on `Arc::strong_count`, since callers are free to hold onto clones of a
/// `DMeta` for reasons unrelated to registration bookkeeping.
struct Slot<M> {
	meta: M,
	references: usize,
}

/// Any of the four descriptor kinds, for the kind-agnostic ambiguous-name
/// index.
#[derive(Clone)]
pub enum MetaAny {
	Data(DMeta),
	Trait(TMeta),
	Verb(VMeta),
	Constant(CMeta),
}

impl MetaAny {
	pub fn token(&self) -> Token {
		match self {
			MetaAny::Data(m) => m.base.token,
			MetaAny::Trait(m) => m.base.token,
			MetaAny::Verb(m) => m.base.token,
			MetaAny::Constant(m) => m.base.token,
		}
	}

	pub fn library_name(&self) -> Token {
		match self {
			MetaAny::Data(m) => m.base.library_name,
			MetaAny::Trait(m) => m.base.library_name,
			MetaAny::Verb(m) => m.base.library_name,
			MetaAny::Constant(m) => m.base.library_name,
		}
	}
}

#[derive(Default)]
pub struct Database {
	data: Mutex<FxHashMap<String, Slot<DMeta>>>,
	traits: Mutex<FxHashMap<String, Slot<TMeta>>>,
	verbs: Mutex<FxHashMap<String, Slot<VMeta>>>,
	constants: Mutex<FxHashMap<String, Slot<CMeta>>>,
	operators: Mutex<FxHashMap<String, VMeta>>,
	ambiguous: Mutex<FxHashMap<String, Vec<MetaAny>>>,
}

pub fn database() -> &'static Database {
	static DATABASE: OnceLock<Database> = OnceLock::new();
	DATABASE.get_or_init(Database::default)
}

fn index_ambiguous(ambiguous: &mut FxHashMap<String, Vec<MetaAny>>, entry: MetaAny) {
	index_ambiguous_under(ambiguous, entry.token(), entry);
}

/// Index `entry` under the last segment of `token`, which may differ from
/// `entry.token()` - a verb's reverse token shares the same descriptor but
/// indexes under its own ambiguous-name bucket.
fn index_ambiguous_under(ambiguous: &mut FxHashMap<String, Vec<MetaAny>>, token: Token, entry: MetaAny) {
	let key = to_lowercase(last_segment(token));
	ambiguous.entry(key).or_default().push(entry);
}

fn unindex_ambiguous_under(ambiguous: &mut FxHashMap<String, Vec<MetaAny>>, bucket_token: Token, entry_token: Token) {
	let key = to_lowercase(last_segment(bucket_token));
	if let Some(bucket) = ambiguous.get_mut(&key) {
		bucket.retain(|e| e.token() != entry_token);
		if bucket.is_empty() {
			ambiguous.remove(&key);
		}
	}
}

fn unindex_ambiguous(ambiguous: &mut FxHashMap<String, Vec<MetaAny>>, token: Token) {
	unindex_ambiguous_under(ambiguous, token, token);
}

impl Database {
	pub fn get_meta_data(&self, token: &str) -> Option<DMeta> {
		self.data.lock().unwrap().get(&to_lowercase(token)).map(|s| s.meta.clone())
	}

	pub fn get_meta_trait(&self, token: &str) -> Option<TMeta> {
		self.traits.lock().unwrap().get(&to_lowercase(token)).map(|s| s.meta.clone())
	}

	pub fn get_meta_verb(&self, token: &str) -> Option<VMeta> {
		self.verbs.lock().unwrap().get(&to_lowercase(token)).map(|s| s.meta.clone())
	}

	pub fn get_meta_constant(&self, token: &str) -> Option<CMeta> {
		self.constants.lock().unwrap().get(&to_lowercase(token)).map(|s| s.meta.clone())
	}

	pub fn get_operator(&self, token: &str) -> Option<VMeta> {
		self.operators.lock().unwrap().get(&isolate_operator(token)).cloned()
	}

	/// Every descriptor (of any kind) whose last unqualified token segment
	/// matches `short`, case-insensitively.
	pub fn get_ambiguous_meta(&self, short: &str) -> Vec<MetaAny> {
		self.ambiguous.lock().unwrap().get(&to_lowercase(short)).cloned().unwrap_or_default()
	}

	/// Disambiguate `token` against every other descriptor sharing its last
	/// unqualified segment, the way `source/RTTI.cpp::GetShortestUnambiguousToken`
	/// does: collect the full token ("origin") of every entry the ambiguous
	/// index returns for `token`'s own last segment, then walk `token`
	/// right-to-left extending a `::`-bounded suffix until exactly one
	/// origin ends with it. Falls back to the full token if none ever
	/// disambiguates.
	///
	/// This is deliberately *not* a repeated re-query of the ambiguous
	/// index for each growing candidate - that index is only ever keyed by
	/// a bare last segment, so a multi-segment candidate could never be
	/// found there.
	pub fn get_shortest_unambiguous_token(&self, token: Token) -> Token {
		let last = crate::name::last_segment(token);
		let ambiguous = self.get_ambiguous_meta(last);
		if ambiguous.len() <= 1 {
			return last;
		}

		let mut origins: Vec<Token> = Vec::new();
		for entry in &ambiguous {
			let origin = match entry {
				MetaAny::Data(d) => d.origin.as_ref().map(|o| o.base.token).unwrap_or(d.base.token),
				other => other.token(),
			};
			if !origins.contains(&origin) {
				origins.push(origin);
			}
		}
		if origins.len() <= 1 {
			return last;
		}

		let bytes = token.as_bytes();
		let mut segment_starts = vec![0usize];
		let mut i = 0usize;
		while i + 1 < bytes.len() {
			if bytes[i] == b':' && bytes[i + 1] == b':' {
				segment_starts.push(i + 2);
			}
			i += 1;
		}

		for &start in segment_starts.iter().skip(1).rev().skip(1) {
			let candidate = &token[start..];
			let matches = origins.iter().filter(|o| o.ends_with(candidate)).count();
			if matches == 1 {
				return crate::name::intern(candidate);
			}
		}
		token
	}

	pub fn register_data(&self, meta: MetaData) -> Result<DMeta> {
		let key = to_lowercase(meta.base.token);
		let mut data = self.data.lock().unwrap();
		if let Some(slot) = data.get_mut(&key) {
			if slot.meta.size != meta.size || slot.meta.alignment != meta.alignment {
				#[cfg(feature = "tracing")]
				tracing::warn!(token = meta.base.token, "rejecting conflicting re-registration");
				return Err(ReflectError::RegistrationConflict {
					token: meta.base.token,
					reason: "size/alignment mismatch with prior registration",
				});
			}
			slot.references += 1;
			return Ok(slot.meta.clone());
		}
		let token = meta.base.token;
		let arc: DMeta = std::sync::Arc::new(meta);
		data.insert(key, Slot { meta: arc.clone(), references: 1 });
		drop(data);
		index_ambiguous(&mut self.ambiguous.lock().unwrap(), MetaAny::Data(arc.clone()));
		#[cfg(feature = "tracing")]
		tracing::trace!(token, "registered data descriptor");
		Ok(arc)
	}

	pub fn register_trait(&self, meta: MetaTrait) -> Result<TMeta> {
		let key = to_lowercase(meta.base.token);
		let mut traits = self.traits.lock().unwrap();
		if let Some(slot) = traits.get_mut(&key) {
			slot.references += 1;
			return Ok(slot.meta.clone());
		}
		let arc: TMeta = std::sync::Arc::new(meta);
		traits.insert(key, Slot { meta: arc.clone(), references: 1 });
		drop(traits);
		index_ambiguous(&mut self.ambiguous.lock().unwrap(), MetaAny::Trait(arc.clone()));
		Ok(arc)
	}

	pub fn register_constant(&self, meta: MetaConst) -> Result<CMeta> {
		let key = to_lowercase(meta.base.token);
		let mut constants = self.constants.lock().unwrap();
		if let Some(slot) = constants.get_mut(&key) {
			slot.references += 1;
			return Ok(slot.meta.clone());
		}
		let arc: CMeta = std::sync::Arc::new(meta);
		constants.insert(key, Slot { meta: arc.clone(), references: 1 });
		drop(constants);
		index_ambiguous(&mut self.ambiguous.lock().unwrap(), MetaAny::Constant(arc.clone()));
		Ok(arc)
	}

	/// Registers both the positive and reverse tokens, plus both operator
	/// spellings (which may be empty), for a single canonical verb
	/// descriptor (spec.md §4.5).
	pub fn register_verb(&self, meta: MetaVerb) -> Result<VMeta> {
		let positive_key = to_lowercase(meta.base.token);
		let reverse_key = to_lowercase(meta.token_reverse);
		let mut verbs = self.verbs.lock().unwrap();
		if let Some(slot) = verbs.get_mut(&positive_key) {
			slot.references += 1;
			return Ok(slot.meta.clone());
		}
		let positive_operator = meta.operator;
		let negative_operator = meta.operator_reverse;
		let arc: VMeta = std::sync::Arc::new(meta);

		verbs.insert(positive_key, Slot { meta: arc.clone(), references: 1 });
		if reverse_key != to_lowercase(arc.base.token) {
			verbs.insert(reverse_key, Slot { meta: arc.clone(), references: 1 });
		}
		drop(verbs);

		if !positive_operator.is_empty() {
			self.operators.lock().unwrap().insert(isolate_operator(positive_operator), arc.clone());
		}
		if !negative_operator.is_empty() {
			self.operators.lock().unwrap().insert(isolate_operator(negative_operator), arc.clone());
		}

		let mut ambiguous = self.ambiguous.lock().unwrap();
		index_ambiguous_under(&mut ambiguous, arc.base.token, MetaAny::Verb(arc.clone()));
		if arc.token_reverse != arc.base.token {
			index_ambiguous_under(&mut ambiguous, arc.token_reverse, MetaAny::Verb(arc.clone()));
		}
		Ok(arc)
	}

	pub fn unregister_data(&self, meta: &DMeta) {
		let key = to_lowercase(meta.base.token);
		let mut data = self.data.lock().unwrap();
		let Some(slot) = data.get_mut(&key) else { return };
		slot.references -= 1;
		if slot.references == 0 {
			data.remove(&key);
			drop(data);
			unindex_ambiguous(&mut self.ambiguous.lock().unwrap(), meta.base.token);
		}
	}

	pub fn unregister_trait(&self, meta: &TMeta) {
		let key = to_lowercase(meta.base.token);
		let mut traits = self.traits.lock().unwrap();
		let Some(slot) = traits.get_mut(&key) else { return };
		slot.references -= 1;
		if slot.references == 0 {
			traits.remove(&key);
			drop(traits);
			unindex_ambiguous(&mut self.ambiguous.lock().unwrap(), meta.base.token);
		}
	}

	pub fn unregister_constant(&self, meta: &CMeta) {
		let key = to_lowercase(meta.base.token);
		let mut constants = self.constants.lock().unwrap();
		let Some(slot) = constants.get_mut(&key) else { return };
		slot.references -= 1;
		if slot.references == 0 {
			constants.remove(&key);
			drop(constants);
			unindex_ambiguous(&mut self.ambiguous.lock().unwrap(), meta.base.token);
		}
	}

	pub fn unregister_verb(&self, meta: &VMeta) {
		let positive_key = to_lowercase(meta.base.token);
		let reverse_key = to_lowercase(meta.token_reverse);
		let mut verbs = self.verbs.lock().unwrap();
		let Some(slot) = verbs.get_mut(&positive_key) else { return };
		slot.references -= 1;
		if slot.references > 0 {
			return;
		}
		verbs.remove(&positive_key);
		verbs.remove(&reverse_key);
		drop(verbs);

		let mut operators = self.operators.lock().unwrap();
		operators.retain(|_, v| v.base.token != meta.base.token);
		drop(operators);

		let mut ambiguous = self.ambiguous.lock().unwrap();
		unindex_ambiguous_under(&mut ambiguous, meta.base.token, meta.base.token);
		if meta.token_reverse != meta.base.token {
			unindex_ambiguous_under(&mut ambiguous, meta.token_reverse, meta.base.token);
		}
	}

	/// Remove every descriptor of every kind whose `library_name` matches
	/// `boundary`, regardless of reference count - the bulk-unload path a
	/// plugin's teardown drives (spec.md §4.5, §6 `UnloadLibrary`).
	pub fn unload_library(&self, boundary: &str) {
		#[cfg(feature = "tracing")]
		tracing::info!(boundary, "unloading library boundary");
		self.data.lock().unwrap().retain(|_, slot| slot.meta.base.library_name != boundary);
		self.traits.lock().unwrap().retain(|_, slot| slot.meta.base.library_name != boundary);
		self.verbs.lock().unwrap().retain(|_, slot| slot.meta.base.library_name != boundary);
		self.constants.lock().unwrap().retain(|_, slot| slot.meta.base.library_name != boundary);
		self.operators.lock().unwrap().retain(|_, v| v.base.library_name != boundary);
		self.ambiguous.lock().unwrap().retain(|_, bucket| {
			bucket.retain(|e| e.library_name() != boundary);
			!bucket.is_empty()
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::meta::data::DataVTable;
	use crate::meta::Meta;

	fn data_meta(token: &'static str, boundary: &'static str) -> MetaData {
		MetaData {
			base: Meta::new(crate::meta::MetaKind::Data, token, boundary),
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
		}
	}

	#[test]
	fn registration_merges_by_token() {
		let db = Database::default();
		let a = db.register_data(data_meta("Registry::Test::Merge", "MAIN")).unwrap();
		let b = db.register_data(data_meta("Registry::Test::Merge", "MAIN")).unwrap();
		assert!(std::sync::Arc::ptr_eq(&a, &b));
	}

	#[test]
	fn conflicting_registration_is_rejected() {
		let db = Database::default();
		db.register_data(data_meta("Registry::Test::Conflict", "MAIN")).unwrap();
		let mut conflicting = data_meta("Registry::Test::Conflict", "MAIN");
		conflicting.size = 999;
		assert!(db.register_data(conflicting).is_err());
	}

	#[test]
	fn lookup_is_case_insensitive() {
		let db = Database::default();
		db.register_data(data_meta("Registry::Test::Case", "MAIN")).unwrap();
		assert!(db.get_meta_data("registry::test::case").is_some());
	}

	#[test]
	fn round_trip_registration_leaves_no_orphans() {
		let db = Database::default();
		let m = db.register_data(data_meta("Registry::Test::RoundTrip", "MAIN")).unwrap();
		db.unregister_data(&m);
		assert!(db.get_meta_data("Registry::Test::RoundTrip").is_none());
		assert!(db.get_ambiguous_meta("RoundTrip").is_empty());
	}

	#[test]
	fn unload_library_removes_only_its_own_descriptors() {
		let db = Database::default();
		db.register_data(data_meta("Plugin::Widget", "PluginA")).unwrap();
		db.register_data(data_meta("Main::Thing", "MAIN")).unwrap();
		db.unload_library("PluginA");
		assert!(db.get_meta_data("Plugin::Widget").is_none());
		assert!(db.get_meta_data("Main::Thing").is_some());
	}

	#[test]
	fn ambiguous_lookup_finds_every_matching_last_segment() {
		let db = Database::default();
		db.register_data(data_meta("N1::Type", "MAIN")).unwrap();
		db.register_data(data_meta("N2::Type", "MAIN")).unwrap();
		db.register_data(data_meta("N3::type", "MAIN")).unwrap();
		assert_eq!(db.get_ambiguous_meta("type").len(), 3);
	}

	/// spec.md §8 scenario 2: three ambiguous data types plus one verb,
	/// mixed ambiguous-name lookup across kinds, and operator lookup
	/// tolerant of surrounding whitespace/control bytes.
	#[test]
	fn mixed_ambiguous_names_and_operator_lookup() {
		let db = Database::default();
		db.register_data(data_meta("N1::Type", "MAIN")).unwrap();
		db.register_data(data_meta("N2::Type", "MAIN")).unwrap();
		db.register_data(data_meta("N3::type", "MAIN")).unwrap();

		let verb = MetaVerb::new("Verbs::Create", "Verbs::Destroy", "MAIN").with_operators("+", "-");
		let verb = db.register_verb(verb).unwrap();
		db.register_data(data_meta("N1::Create", "MAIN")).unwrap();

		assert_eq!(db.get_ambiguous_meta("type").len(), 3);

		let create_matches = db.get_ambiguous_meta("create");
		assert_eq!(create_matches.len(), 2);

		assert!(std::sync::Arc::ptr_eq(&db.get_operator("  +  ").unwrap(), &verb));
		assert!(std::sync::Arc::ptr_eq(&db.get_operator("\t - \n").unwrap(), &verb));
	}

	#[test]
	fn shortest_unambiguous_token_walks_right_to_left_until_unique() {
		let db = Database::default();
		db.register_data(data_meta("Alpha::Widget", "MAIN")).unwrap();
		db.register_data(data_meta("Beta::Container::Widget", "MAIN")).unwrap();
		db.register_data(data_meta("Gamma::Widget", "MAIN")).unwrap();

		assert_eq!(db.get_shortest_unambiguous_token("Beta::Container::Widget"), "Container::Widget");
		assert_eq!(db.get_shortest_unambiguous_token("Alpha::Widget"), "Alpha::Widget");
	}

	#[test]
	fn shortest_unambiguous_token_is_the_last_segment_when_unique() {
		let db = Database::default();
		db.register_data(data_meta("Solo::OnlyOne", "MAIN")).unwrap();
		assert_eq!(db.get_shortest_unambiguous_token("Solo::OnlyOne"), "OnlyOne");
	}
}
