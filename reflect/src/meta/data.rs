//! [`MetaData`] - the descriptor for a reflected data type, and its
//! supporting structures (`Member`, `Ability`, `Base`, `Converter`).

use bitflags::bitflags;
use fxhash::FxHashMap;

use crate::hash::Hash;
use crate::intent::Descriptor;
use crate::name::Token;

use super::{identity_by_token, CMeta, DMeta, Meta, MetaKind, VMeta};

bitflags! {
	/// Structural flags recorded at synthesis time, per spec.md §3 `MetaData`.
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
	pub struct DataFlags: u16 {
		const SPARSE        = 1 << 0;
		const CONSTANT      = 1 << 1;
		const POD           = 1 << 2;
		const NULLIFIABLE   = 1 << 3;
		const ABSTRACT      = 1 << 4;
		const DEEP          = 1 << 5;
		const UNINSERTABLE  = 1 << 6;
		const UNALLOCATABLE = 1 << 7;
	}
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PoolTactic {
	Default,
	Size,
	Type,
}

/// A member field: offset, element count, optional trait tag, and deferred
/// retrievers for its own type/trait so that cyclic type graphs (a struct
/// that contains a member whose type contains the struct) can be
/// expressed - the descriptor for the member's type only needs to exist
/// by the time the retriever is actually called, not at the point the
/// `Member` is constructed.
#[derive(Clone)]
pub struct Member {
	pub name: Token,
	pub offset: usize,
	pub count: usize,
	type_retriever: fn() -> DMeta,
	trait_retriever: Option<fn() -> crate::meta::TMeta>,
}

impl Member {
	pub fn new(name: Token, offset: usize, count: usize, type_retriever: fn() -> DMeta) -> Self {
		debug_assert!(count >= 1, "a member's count must be at least 1");
		Self {
			name,
			offset,
			count,
			type_retriever,
			trait_retriever: None,
		}
	}

	pub fn with_trait(mut self, trait_retriever: fn() -> crate::meta::TMeta) -> Self {
		self.trait_retriever = Some(trait_retriever);
		self
	}

	pub fn member_type(&self) -> DMeta {
		(self.type_retriever)()
	}

	pub fn member_trait(&self) -> Option<crate::meta::TMeta> {
		self.trait_retriever.map(|f| f())
	}
}

impl std::fmt::Debug for Member {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Member")
			.field("name", &self.name)
			.field("offset", &self.offset)
			.field("count", &self.count)
			.finish()
	}
}

/// The ordered argument types of an ability overload.
pub type Signature = Vec<DMeta>;

pub type MutableAbilityFn = unsafe fn(*mut u8, &[*const u8]);
pub type ConstantAbilityFn = unsafe fn(*const u8, &[*const u8]);

/// One verb's worth of dispatchable overloads for a data type.
#[derive(Default)]
pub struct Ability {
	pub verb: Option<VMeta>,
	pub mutable: FxHashMap<Signature, MutableAbilityFn>,
	pub constant: FxHashMap<Signature, ConstantAbilityFn>,
}

impl std::fmt::Debug for Ability {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Ability")
			.field("mutable_overloads", &self.mutable.len())
			.field("constant_overloads", &self.constant.len())
			.finish()
	}
}

/// A declared parent type embedded inside a derived type at a known
/// offset.
#[derive(Debug, Clone)]
pub struct Base {
	pub base_type: DMeta,
	pub count: usize,
	pub offset: usize,
	pub binary_compatible: bool,
	/// Declared for routing/casting purposes only; excluded from distance,
	/// dispatch, and serialization (spec.md glossary, "Imposed base").
	pub imposed: bool,
}

/// An erased construct-at-destination function for converting to another
/// reflected type.
pub struct Converter {
	pub target: DMeta,
	pub construct: unsafe fn(dst: *mut u8, src: *const u8),
}

impl std::fmt::Debug for Converter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Converter")
			.field("target", &self.target.base.token)
			.finish()
	}
}

/// The erased operation vtable. Every slot is nullable: a type that has no
/// legal path for an operation (e.g. no default constructor because it is
/// abstract) simply leaves that slot empty, and callers must check before
/// invoking it - see spec.md §3 `MetaData` invariants.
#[derive(Default)]
pub struct DataVTable {
	pub default_ctor: Option<unsafe fn(dst: *mut u8)>,
	pub descriptor_ctor: Option<unsafe fn(dst: *mut u8, descriptor: &Descriptor)>,

	pub refer_ctor: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub copy_ctor: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub move_ctor: Option<unsafe fn(dst: *mut u8, src: *mut u8)>,
	pub clone_ctor: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub disown_ctor: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub abandon_ctor: Option<unsafe fn(dst: *mut u8, src: *mut u8)>,

	pub destructor: Option<unsafe fn(ptr: *mut u8)>,

	pub refer_assign: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub copy_assign: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub move_assign: Option<unsafe fn(dst: *mut u8, src: *mut u8)>,
	pub clone_assign: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub disown_assign: Option<unsafe fn(dst: *mut u8, src: *const u8)>,
	pub abandon_assign: Option<unsafe fn(dst: *mut u8, src: *mut u8)>,

	pub comparer: Option<unsafe fn(a: *const u8, b: *const u8) -> bool>,
	/// Resolves to the runtime-most-derived descriptor for a polymorphic
	/// value, when the type can report one of its own accord.
	pub resolver: Option<unsafe fn(ptr: *const u8) -> DMeta>,
	pub hasher: Option<unsafe fn(ptr: *const u8) -> Hash>,

	/// Dynamic verb dispatch. The verb-execution flow engine itself is out
	/// of scope (spec.md §1); these slots only exist so a descriptor can
	/// carry the hook a future flow engine would call through.
	pub dispatcher_mutable: Option<unsafe fn(ptr: *mut u8, verb: *mut ())>,
	pub dispatcher_constant: Option<unsafe fn(ptr: *const u8, verb: *mut ())>,
}

impl std::fmt::Debug for DataVTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DataVTable")
			.field("default_ctor", &self.default_ctor.is_some())
			.field("copy_ctor", &self.copy_ctor.is_some())
			.field("move_ctor", &self.move_ctor.is_some())
			.field("clone_ctor", &self.clone_ctor.is_some())
			.field("destructor", &self.destructor.is_some())
			.finish()
	}
}

/// Element counts per MSB-indexed allocation page size, precomputed at
/// synthesis time (spec.md §4.3 step 4).
pub type AllocationTable = Vec<usize>;

#[derive(Debug)]
pub struct MetaData {
	pub base: Meta,

	pub members: Vec<Member>,
	pub abilities: FxHashMap<VMeta, Ability>,
	pub bases: Vec<Base>,
	pub converters: FxHashMap<DMeta, Converter>,
	pub named_values: Vec<CMeta>,

	pub origin: Option<DMeta>,
	pub deptr: Option<DMeta>,
	pub concrete: Option<DMeta>,
	pub producer: Option<DMeta>,

	pub flags: DataFlags,

	pub size: usize,
	pub alignment: usize,
	pub allocation_page: usize,
	pub allocation_table: AllocationTable,

	pub file_extensions: Token,
	pub suffix: Token,
	pub pool_tactic: PoolTactic,

	pub vtable: DataVTable,
}

identity_by_token!(MetaData);

impl MetaData {
	pub fn new(token: Token, library_name: Token, size: usize, alignment: usize) -> Self {
		debug_assert!(alignment.is_power_of_two() && alignment <= 128, "alignment must be a power of two <= 128 ({alignment})");
		Self {
			base: Meta::new(MetaKind::Data, token, library_name),
			members: Vec::new(),
			abilities: FxHashMap::default(),
			bases: Vec::new(),
			converters: FxHashMap::default(),
			named_values: Vec::new(),
			origin: None,
			deptr: None,
			concrete: None,
			producer: None,
			flags: DataFlags::empty(),
			size,
			alignment,
			allocation_page: crate::config::DEFAULT_ALLOCATION_PAGE.max(alignment),
			allocation_table: Vec::new(),
			file_extensions: "",
			suffix: "",
			pool_tactic: crate::config::default_pool_tactic(),
			vtable: DataVTable::default(),
		}
	}

	pub fn is_sparse(&self) -> bool {
		self.flags.contains(DataFlags::SPARSE)
	}

	pub fn is_pod(&self) -> bool {
		self.flags.contains(DataFlags::POD)
	}

	pub fn is_abstract(&self) -> bool {
		self.flags.contains(DataFlags::ABSTRACT)
	}

	/// Ordered base hop search used by `GetDistanceTo`; ignores imposed
	/// bases per spec.md §4.4.
	pub fn non_imposed_bases(&self) -> impl Iterator<Item = &Base> {
		self.bases.iter().filter(|b| !b.imposed)
	}
}
