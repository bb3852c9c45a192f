//! Descriptor synthesis: turning a type's reflection opt-ins into a
//! published [`MetaData`] (spec.md §4.3).
//!
//! The opt-in surface is the [`Reflected`] trait. `#[derive(Reflect)]`
//! (in `reflect-derive`) is the normal way to implement it; the trait
//! itself stays public so hand-written impls remain possible for types
//! that need finer control than the derive covers (e.g. a custom
//! `origin`/`deptr` chain for a smart pointer).

use std::any::TypeId;
use std::sync::OnceLock;

use fxhash::FxHashMap;

use crate::meta::data::{Ability, AllocationTable, Base, Converter, DataFlags, DataVTable, Member, PoolTactic};
use crate::meta::{CMeta, DMeta, MetaData, VMeta};
use crate::name::{name_of, Token};

/// A deferred base declaration: the base type's descriptor is fetched
/// lazily through `retrieve`, so a struct can list a base whose own
/// descriptor isn't finished synthesizing yet (cyclic type graphs,
/// spec.md §9).
pub struct BaseSpec {
	pub retrieve: fn() -> DMeta,
	pub count: usize,
	pub offset: usize,
	pub binary_compatible: bool,
	pub imposed: bool,
}

pub struct MemberSpec {
	pub name: Token,
	pub offset: usize,
	pub count: usize,
	pub retrieve: fn() -> DMeta,
	pub trait_retrieve: Option<fn() -> crate::meta::TMeta>,
}

pub struct AbilitySpec {
	pub verb: fn() -> VMeta,
	pub signature: Vec<fn() -> DMeta>,
	pub mutable: Option<crate::meta::data::MutableAbilityFn>,
	pub constant: Option<crate::meta::data::ConstantAbilityFn>,
}

pub struct ConverterSpec {
	pub target: fn() -> DMeta,
	pub construct: unsafe fn(dst: *mut u8, src: *const u8),
}

pub struct NamedValueSpec {
	pub build: fn() -> CMeta,
}

/// Everything a type can opt into reflecting about itself. Every method
/// has a trivial default, matching the reference design's "you only
/// declare what you use" opt-in surface (spec.md §6).
pub trait Reflected: 'static {
	/// Overrides the canonical token derived from `name_of::<Self>()`.
	/// Left empty to use the derived name, which is the common case.
	fn name() -> &'static str {
		""
	}

	fn info() -> &'static str {
		""
	}

	fn version() -> (u32, u32) {
		(1, 0)
	}

	fn suffix() -> &'static str {
		""
	}

	fn file_extensions() -> &'static str {
		""
	}

	fn flags() -> DataFlags {
		DataFlags::empty()
	}

	fn allocation_page() -> Option<usize> {
		None
	}

	fn pool_tactic() -> Option<PoolTactic> {
		None
	}

	fn bases() -> Vec<BaseSpec> {
		Vec::new()
	}

	fn members() -> Vec<MemberSpec> {
		Vec::new()
	}

	fn abilities() -> Vec<AbilitySpec> {
		Vec::new()
	}

	fn converters() -> Vec<ConverterSpec> {
		Vec::new()
	}

	fn named_values() -> Vec<NamedValueSpec> {
		Vec::new()
	}

	fn producer() -> Option<fn() -> DMeta> {
		None
	}

	fn concrete() -> Option<fn() -> DMeta> {
		None
	}

	/// Wire the erased operation vtable. `#[derive(Reflect)]` fills this
	/// in based on which standard traits (`Default`, `Clone`, `PartialEq`,
	/// `Drop`) the derive invocation also asked for; hand-written impls
	/// populate it directly.
	fn vtable() -> DataVTable {
		DataVTable::default()
	}
}

fn memo() -> &'static std::sync::Mutex<FxHashMap<TypeId, DMeta>> {
	static MEMO: OnceLock<std::sync::Mutex<FxHashMap<TypeId, DMeta>>> = OnceLock::new();
	MEMO.get_or_init(|| std::sync::Mutex::new(FxHashMap::default()))
}

/// Synthesize (or fetch the already-synthesized, process-memoized)
/// descriptor for a concrete, non-reference, non-pointer, reflected type.
///
/// This is `origin`'s synthesis path (spec.md §4.3 step 2-5); pointer
/// layers are built by [`synthesize_pointer`] on top of this.
pub fn synthesize<T: Reflected + Sized>() -> DMeta {
	let type_id = TypeId::of::<T>();
	if let Some(existing) = memo().lock().unwrap().get(&type_id) {
		return existing.clone();
	}

	let token = {
		let overridden = T::name();
		if overridden.is_empty() {
			name_of::<T>()
		} else {
			crate::name::intern(overridden)
		}
	};

	let mut data = MetaData::new(token, crate::config::boundary(), std::mem::size_of::<T>(), std::mem::align_of::<T>());
	data.base.info = T::info();
	let (major, minor) = T::version();
	data.base.version_major = major;
	data.base.version_minor = minor;
	data.suffix = T::suffix();
	data.file_extensions = T::file_extensions();
	data.flags = T::flags();
	data.pool_tactic = T::pool_tactic().unwrap_or_else(crate::config::default_pool_tactic);

	let requested_page = T::allocation_page().unwrap_or(crate::config::DEFAULT_ALLOCATION_PAGE);
	data.allocation_page = requested_page.max(data.alignment).next_power_of_two();
	data.allocation_table = build_allocation_table(data.size, data.allocation_page);

	for base in T::bases() {
		data.bases.push(Base {
			base_type: (base.retrieve)(),
			count: base.count,
			offset: base.offset,
			binary_compatible: base.binary_compatible,
			imposed: base.imposed,
		});
	}

	for member in T::members() {
		let mut m = Member::new(member.name, member.offset, member.count, member.retrieve);
		if let Some(tr) = member.trait_retrieve {
			m = m.with_trait(tr);
		}
		data.members.push(m);
	}

	for ability in T::abilities() {
		let verb = (ability.verb)();
		let signature: Vec<DMeta> = ability.signature.iter().map(|f| f()).collect();
		let entry = data.abilities.entry(verb.clone()).or_insert_with(|| Ability {
			verb: Some(verb),
			mutable: FxHashMap::default(),
			constant: FxHashMap::default(),
		});
		if let Some(f) = ability.mutable {
			entry.mutable.insert(signature.clone(), f);
		}
		if let Some(f) = ability.constant {
			entry.constant.insert(signature, f);
		}
	}

	for converter in T::converters() {
		let target = (converter.target)();
		data.converters.insert(
			target.clone(),
			Converter {
				target,
				construct: converter.construct,
			},
		);
	}

	for named_value in T::named_values() {
		data.named_values.push((named_value.build)());
	}

	data.producer = T::producer().map(|f| f());
	data.concrete = T::concrete().map(|f| f());
	data.vtable = T::vtable();

	// Registration conflicts at this point are a programming error (two
	// distinct Rust types mapped to the same canonical token with
	// incompatible layouts), not a recoverable runtime condition - fail
	// fast, per spec.md §7's "errors at reflection time are fail-fast".
	let published = crate::registry::database().register_data(data).unwrap_or_else(|e| {
		#[cfg(feature = "tracing")]
		tracing::error!(ty = name_of::<T>(), error = %e, "fatal registration conflict during synthesis");
		panic!("reflection conflict synthesizing {}: {e}", name_of::<T>())
	});

	memo().lock().unwrap().entry(type_id).or_insert_with(|| published.clone()).clone()
}

/// Compute how many whole `element_size`-byte elements fit in every
/// `2^msb`-byte page up to `allocation_page`, indexed by MSB (spec.md §3,
/// `allocation_table[W]`).
fn build_allocation_table(element_size: usize, allocation_page: usize) -> AllocationTable {
	if element_size == 0 {
		return Vec::new();
	}
	let msb = usize::BITS - allocation_page.leading_zeros();
	let mut table = Vec::with_capacity(msb as usize + 1);
	let mut page = 1usize;
	for _ in 0..=msb {
		table.push(page / element_size);
		page = page.saturating_mul(2);
	}
	table
}

/// Synthesize the descriptor for `*const T` / `*mut T`, given the already
/// synthesized `origin` descriptor for `T` and the one-pointer-stripped
/// `deptr` descriptor (which, for a single pointer layer, equals `origin`
/// with const preserved - spec.md §3 `deptr`). Interned through the same
/// registry as every other descriptor, so repeat calls for the same
/// `(T, is_const)` pair return the same `Arc`.
pub fn synthesize_pointer<T: Reflected + Sized>(origin: DMeta, is_const: bool) -> DMeta {
	let decoration = if is_const { "const *" } else { "*" };
	let token = crate::name::intern(&format!("{}{decoration}", origin.base.token));

	let mut data = MetaData::new(token, crate::config::boundary(), std::mem::size_of::<*const ()>(), std::mem::align_of::<*const ()>());
	data.flags = DataFlags::SPARSE | if is_const { DataFlags::CONSTANT } else { DataFlags::empty() };
	data.deptr = Some(origin.clone());
	data.origin = Some(origin);
	data.vtable.default_ctor = Some(null_pointer_ctor::<T>);

	crate::registry::database()
		.register_data(data)
		.unwrap_or_else(|e| panic!("reflection conflict synthesizing pointer layer for {}: {e}", name_of::<T>()))
}

unsafe fn null_pointer_ctor<T>(dst: *mut u8) {
	std::ptr::write(dst as *mut *const T, std::ptr::null());
}

/// Synthesize a pointer-layer descriptor over a pointee that isn't (or
/// can't be proven to be) `Reflected`/`Sized` - an incomplete type, per
/// spec.md §3/§7. `origin`/`deptr` stay `None`, since there's no completed
/// pointee descriptor to chain to; only the pointer's own layout and
/// constness are known.
pub fn synthesize_pointer_to_incomplete<T: ?Sized + 'static>(is_const: bool) -> DMeta {
	let pointee_token = name_of::<T>();
	let decoration = if is_const { "const *" } else { "*" };
	let token = crate::name::intern(&format!("{pointee_token}{decoration}"));

	let mut data = MetaData::new(token, crate::config::boundary(), std::mem::size_of::<*const T>(), std::mem::align_of::<*const T>());
	data.flags = DataFlags::SPARSE | if is_const { DataFlags::CONSTANT } else { DataFlags::empty() };

	crate::registry::database()
		.register_data(data)
		.unwrap_or_else(|e| panic!("reflection conflict synthesizing incomplete pointer layer for {pointee_token}: {e}"))
}

/// Build a full [`DataVTable`] for a plain-old-data, `Copy` type: every
/// slot is a bytewise read/write through `dst`/`src`. Used by
/// [`crate::builtin`] and by `#[derive(Reflect)]` when it detects the
/// host type also derives `Copy`.
pub fn pod_vtable<T: Copy + PartialEq + Default + 'static>() -> DataVTable {
	DataVTable {
		default_ctor: Some(pod_default_ctor::<T>),
		descriptor_ctor: None,
		refer_ctor: Some(pod_copy_ctor::<T>),
		copy_ctor: Some(pod_copy_ctor::<T>),
		move_ctor: Some(pod_move_ctor::<T>),
		clone_ctor: Some(pod_copy_ctor::<T>),
		disown_ctor: Some(pod_copy_ctor::<T>),
		abandon_ctor: Some(pod_abandon_ctor::<T>),
		destructor: None,
		refer_assign: Some(pod_copy_assign::<T>),
		copy_assign: Some(pod_copy_assign::<T>),
		move_assign: Some(pod_move_assign::<T>),
		clone_assign: Some(pod_copy_assign::<T>),
		disown_assign: Some(pod_copy_assign::<T>),
		abandon_assign: Some(pod_abandon_assign::<T>),
		comparer: Some(pod_comparer::<T>),
		resolver: None,
		hasher: None,
		dispatcher_mutable: None,
		dispatcher_constant: None,
	}
}

unsafe fn pod_default_ctor<T: Copy + Default>(dst: *mut u8) {
	std::ptr::write(dst as *mut T, T::default());
}

unsafe fn pod_copy_ctor<T: Copy>(dst: *mut u8, src: *const u8) {
	let dst = &mut *(dst as *mut std::mem::MaybeUninit<T>);
	crate::intent::intent_new(dst, crate::intent::Copy::new(&*(src as *const T)));
}

unsafe fn pod_move_ctor<T: Copy>(dst: *mut u8, src: *mut u8) {
	let dst = &mut *(dst as *mut std::mem::MaybeUninit<T>);
	crate::intent::intent_new(dst, crate::intent::Moved::new(std::ptr::read(src as *const T)));
}

unsafe fn pod_abandon_ctor<T: Copy>(dst: *mut u8, src: *mut u8) {
	let dst = &mut *(dst as *mut std::mem::MaybeUninit<T>);
	crate::intent::intent_new(dst, crate::intent::Abandoned::new(std::ptr::read(src as *const T)));
}

unsafe fn pod_copy_assign<T: Copy>(dst: *mut u8, src: *const u8) {
	crate::intent::intent_assign(&mut *(dst as *mut T), crate::intent::Copy::new(&*(src as *const T)));
}

unsafe fn pod_move_assign<T: Copy>(dst: *mut u8, src: *mut u8) {
	crate::intent::intent_assign(&mut *(dst as *mut T), crate::intent::Moved::new(std::ptr::read(src as *const T)));
}

unsafe fn pod_abandon_assign<T: Copy>(dst: *mut u8, src: *mut u8) {
	crate::intent::intent_assign(&mut *(dst as *mut T), crate::intent::Abandoned::new(std::ptr::read(src as *const T)));
}

unsafe fn pod_comparer<T: PartialEq>(a: *const u8, b: *const u8) -> bool {
	*(a as *const T) == *(b as *const T)
}

/// Generic, non-`Copy` vtable building blocks `#[derive(Reflect)]` wires
/// together according to which standard traits the host type also
/// derives. Every slot here is a thin wrapper around [`crate::intent`]'s
/// `intent_new`/`intent_assign` - the sole sanctioned entry points for a
/// value transfer (spec.md §4.2) - rather than a raw read/write of its
/// own. Unlike the reference design, Rust's ownership model makes a move
/// constructor/assigner legal for *every* type - there is no separate "has
/// a move constructor" probe to perform.
pub unsafe fn move_ctor_shim<T>(dst: *mut u8, src: *mut u8) {
	let dst = &mut *(dst as *mut std::mem::MaybeUninit<T>);
	crate::intent::intent_new(dst, crate::intent::Moved::new(std::ptr::read(src as *const T)));
}

pub unsafe fn move_assign_shim<T>(dst: *mut u8, src: *mut u8) {
	crate::intent::intent_assign(&mut *(dst as *mut T), crate::intent::Moved::new(std::ptr::read(src as *const T)));
}

/// Same runtime behavior as [`move_ctor_shim`]/[`move_assign_shim`] -
/// Rust can't tell "moved" and "abandoned" apart at the value level - but
/// wired into its own vtable slot so the descriptor's `abandon_ctor`/
/// `abandon_assign` genuinely dispatch through the `Abandoned` intent
/// rather than silently reusing the `Move` one.
pub unsafe fn abandon_ctor_shim<T>(dst: *mut u8, src: *mut u8) {
	let dst = &mut *(dst as *mut std::mem::MaybeUninit<T>);
	crate::intent::intent_new(dst, crate::intent::Abandoned::new(std::ptr::read(src as *const T)));
}

pub unsafe fn abandon_assign_shim<T>(dst: *mut u8, src: *mut u8) {
	crate::intent::intent_assign(&mut *(dst as *mut T), crate::intent::Abandoned::new(std::ptr::read(src as *const T)));
}

pub unsafe fn destructor_shim<T>(ptr: *mut u8) {
	std::ptr::drop_in_place(ptr as *mut T);
}

pub unsafe fn default_ctor_shim<T: Default>(dst: *mut u8) {
	std::ptr::write(dst as *mut T, T::default());
}

pub unsafe fn clone_ctor_shim<T: Clone>(dst: *mut u8, src: *const u8) {
	let dst = &mut *(dst as *mut std::mem::MaybeUninit<T>);
	crate::intent::intent_new(dst, crate::intent::Refer::new(&*(src as *const T)));
}

pub unsafe fn clone_assign_shim<T: Clone>(dst: *mut u8, src: *const u8) {
	crate::intent::intent_assign(&mut *(dst as *mut T), crate::intent::Refer::new(&*(src as *const T)));
}

pub unsafe fn comparer_shim<T: PartialEq>(a: *const u8, b: *const u8) -> bool {
	*(a as *const T) == *(b as *const T)
}

/// Build a full [`DataVTable`] for a non-`Copy` type that derives
/// `Default + Clone + PartialEq`: every transfer slot goes through
/// `Clone`/`Drop` rather than `pod_vtable`'s bytewise copies. Used by
/// [`crate::builtin`]'s `String` impl and by `#[derive(Reflect)]` for
/// structs that derive those three traits without also deriving `Copy`.
pub fn clone_vtable<T: Default + Clone + PartialEq + 'static>() -> DataVTable {
	DataVTable {
		default_ctor: Some(default_ctor_shim::<T>),
		descriptor_ctor: None,
		refer_ctor: Some(clone_ctor_shim::<T>),
		copy_ctor: Some(clone_ctor_shim::<T>),
		move_ctor: Some(move_ctor_shim::<T>),
		clone_ctor: Some(clone_ctor_shim::<T>),
		disown_ctor: Some(clone_ctor_shim::<T>),
		abandon_ctor: Some(abandon_ctor_shim::<T>),
		destructor: Some(destructor_shim::<T>),
		refer_assign: Some(clone_assign_shim::<T>),
		copy_assign: Some(clone_assign_shim::<T>),
		move_assign: Some(move_assign_shim::<T>),
		clone_assign: Some(clone_assign_shim::<T>),
		disown_assign: Some(clone_assign_shim::<T>),
		abandon_assign: Some(abandon_assign_shim::<T>),
		comparer: Some(comparer_shim::<T>),
		resolver: None,
		hasher: None,
		dispatcher_mutable: None,
		dispatcher_constant: None,
	}
}

/// Opt-in surface for a reflected trait tag, mirroring [`Reflected`] but
/// for [`crate::meta::MetaTrait`] (spec.md §6 `MetaTraitOf<T>()`). `T` is
/// never instantiated - it only exists to give the trait tag a stable
/// Rust identity to synthesize from.
pub trait ReflectedTrait: 'static {
	fn name() -> &'static str {
		""
	}

	fn data_type() -> Option<fn() -> DMeta> {
		None
	}
}

/// Opt-in surface for a reflected verb, mirroring [`Reflected`] but for
/// [`crate::meta::MetaVerb`] (spec.md §6 `MetaVerbOf<T>()`). A verb has a
/// positive and a reverse token (spec.md §4.5); `T` carries both plus the
/// optional operator spellings.
pub trait ReflectedVerb: 'static {
	fn name() -> &'static str {
		""
	}

	fn name_reverse() -> &'static str {
		""
	}

	fn operator() -> &'static str {
		""
	}

	fn operator_reverse() -> &'static str {
		""
	}

	fn precedence() -> f64 {
		0.0
	}
}

fn trait_memo() -> &'static std::sync::Mutex<FxHashMap<TypeId, crate::meta::TMeta>> {
	static MEMO: OnceLock<std::sync::Mutex<FxHashMap<TypeId, crate::meta::TMeta>>> = OnceLock::new();
	MEMO.get_or_init(|| std::sync::Mutex::new(FxHashMap::default()))
}

/// Synthesize (or fetch the already-synthesized, process-memoized)
/// [`crate::meta::MetaTrait`] for a marker type `T: ReflectedTrait`.
pub fn synthesize_trait<T: ReflectedTrait + Sized>() -> crate::meta::TMeta {
	let type_id = TypeId::of::<T>();
	if let Some(existing) = trait_memo().lock().unwrap().get(&type_id) {
		return existing.clone();
	}

	let token = {
		let overridden = T::name();
		if overridden.is_empty() {
			name_of::<T>()
		} else {
			crate::name::intern(overridden)
		}
	};

	let mut meta = crate::meta::MetaTrait::new(token, crate::config::boundary());
	meta.data_type = T::data_type().map(|f| f());

	let published = crate::registry::database()
		.register_trait(meta)
		.unwrap_or_else(|e| panic!("reflection conflict synthesizing trait {}: {e}", name_of::<T>()));

	trait_memo().lock().unwrap().entry(type_id).or_insert_with(|| published.clone()).clone()
}

fn verb_memo() -> &'static std::sync::Mutex<FxHashMap<TypeId, VMeta>> {
	static MEMO: OnceLock<std::sync::Mutex<FxHashMap<TypeId, VMeta>>> = OnceLock::new();
	MEMO.get_or_init(|| std::sync::Mutex::new(FxHashMap::default()))
}

/// Synthesize (or fetch the already-synthesized, process-memoized)
/// [`crate::meta::MetaVerb`] for a marker type `T: ReflectedVerb`.
pub fn synthesize_verb<T: ReflectedVerb + Sized>() -> VMeta {
	let type_id = TypeId::of::<T>();
	if let Some(existing) = verb_memo().lock().unwrap().get(&type_id) {
		return existing.clone();
	}

	let token = {
		let overridden = T::name();
		if overridden.is_empty() {
			name_of::<T>()
		} else {
			crate::name::intern(overridden)
		}
	};
	let token_reverse = {
		let overridden = T::name_reverse();
		if overridden.is_empty() {
			token
		} else {
			crate::name::intern(overridden)
		}
	};

	let mut meta = crate::meta::MetaVerb::new(token, token_reverse, crate::config::boundary()).with_operators(T::operator(), T::operator_reverse());
	meta.precedence = T::precedence();

	let published = crate::registry::database()
		.register_verb(meta)
		.unwrap_or_else(|e| panic!("reflection conflict synthesizing verb {}: {e}", name_of::<T>()));

	verb_memo().lock().unwrap().entry(type_id).or_insert_with(|| published.clone()).clone()
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Plain {
		#[allow(dead_code)]
		x: i32,
	}

	impl Reflected for Plain {
		fn flags() -> DataFlags {
			DataFlags::POD
		}
	}

	struct WithBase {
		#[allow(dead_code)]
		base: Plain,
		#[allow(dead_code)]
		extra: i32,
	}

	impl Reflected for WithBase {
		fn bases() -> Vec<BaseSpec> {
			vec![BaseSpec {
				retrieve: synthesize::<Plain>,
				count: 1,
				offset: 0,
				binary_compatible: false,
				imposed: false,
			}]
		}
	}

	#[test]
	fn synthesis_is_memoized_per_type() {
		let a = synthesize::<Plain>();
		let b = synthesize::<Plain>();
		assert!(std::sync::Arc::ptr_eq(&a, &b));
	}

	#[test]
	fn synthesized_descriptor_carries_declared_flags_and_layout() {
		let meta = synthesize::<Plain>();
		assert!(meta.is_pod());
		assert_eq!(meta.size, std::mem::size_of::<Plain>());
		assert_eq!(meta.alignment, std::mem::align_of::<Plain>());
	}

	#[test]
	fn bases_resolve_through_deferred_retrievers() {
		let meta = synthesize::<WithBase>();
		assert_eq!(meta.bases.len(), 1);
		assert_eq!(meta.bases[0].base_type.base.token, synthesize::<Plain>().base.token);
	}

	#[test]
	fn allocation_table_scales_with_page_size() {
		let meta = synthesize::<Plain>();
		assert!(!meta.allocation_table.is_empty());
		assert_eq!(meta.allocation_page, meta.allocation_page.next_power_of_two());
	}

	#[test]
	fn pointer_layer_records_origin_and_deptr() {
		let origin = synthesize::<Plain>();
		let ptr_meta = synthesize_pointer::<Plain>(origin.clone(), false);
		assert!(ptr_meta.is_sparse());
		assert_eq!(ptr_meta.origin.as_ref().unwrap().base.token, origin.base.token);
		assert_eq!(ptr_meta.deptr.as_ref().unwrap().base.token, origin.base.token);
	}

	#[test]
	fn incomplete_pointee_pointer_layer_has_no_origin_or_deptr() {
		trait Opaque {}
		let ptr_meta = synthesize_pointer_to_incomplete::<dyn Opaque>(true);
		assert!(ptr_meta.is_sparse());
		assert!(ptr_meta.flags.contains(DataFlags::CONSTANT));
		assert!(ptr_meta.origin.is_none());
		assert!(ptr_meta.deptr.is_none());
	}

	struct CreateVerb;
	impl ReflectedVerb for CreateVerb {
		fn name() -> &'static str {
			"Synth::Verbs::Create"
		}
		fn name_reverse() -> &'static str {
			"Synth::Verbs::Destroy"
		}
		fn operator() -> &'static str {
			"+"
		}
		fn operator_reverse() -> &'static str {
			"-"
		}
	}

	#[test]
	fn verb_marker_type_synthesizes_a_memoized_verb_with_operators() {
		let a = synthesize_verb::<CreateVerb>();
		let b = synthesize_verb::<CreateVerb>();
		assert!(std::sync::Arc::ptr_eq(&a, &b));
		assert_eq!(a.base.token, "Synth::Verbs::Create");
		assert_eq!(a.token_reverse, "Synth::Verbs::Destroy");
		assert!(crate::registry::database().get_operator("+").is_some());
	}

	struct TraitTag;
	impl ReflectedTrait for TraitTag {
		fn data_type() -> Option<fn() -> DMeta> {
			Some(synthesize::<Plain>)
		}
	}

	#[test]
	fn trait_marker_type_synthesizes_a_memoized_trait_with_data_type() {
		let a = synthesize_trait::<TraitTag>();
		let b = synthesize_trait::<TraitTag>();
		assert!(std::sync::Arc::ptr_eq(&a, &b));
		assert_eq!(a.data_type.as_ref().unwrap().base.token, synthesize::<Plain>().base.token);
	}
}
