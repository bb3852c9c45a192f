//! Comparison, casting, and distance predicates over descriptors
//! (spec.md §4.4).

use std::collections::VecDeque;
use std::sync::Arc;

use crate::meta::data::{Ability, Converter, DataFlags};
use crate::meta::{DMeta, VMeta};
use crate::name::Token;

/// Sentinel returned by [`distance_to`] when `b` is unreachable from `a`
/// through non-imposed bases.
pub const INFINITE_DISTANCE: u32 = u32::MAX;

fn origin_of(m: &DMeta) -> DMeta {
	m.origin.clone().unwrap_or_else(|| m.clone())
}

/// True iff the two descriptors designate the same canonical type,
/// disregarding top-level const/volatile/reference/pointer decorations.
pub fn is(a: &DMeta, b: &DMeta) -> bool {
	origin_of(a).base.token == origin_of(b).base.token
}

/// Identity on descriptors - two `Arc`s from the same registration.
pub fn is_exact(a: &DMeta, b: &DMeta) -> bool {
	Arc::ptr_eq(a, b)
}

/// True iff `a` and `b` have the same pointer depth and agree at every
/// layer on pointee type and const-qualification (volatile is ignored).
pub fn is_similar(a: &DMeta, b: &DMeta) -> bool {
	let mut x = a.clone();
	let mut y = b.clone();
	loop {
		let x_sparse = x.is_sparse();
		let y_sparse = y.is_sparse();
		if x_sparse != y_sparse {
			return false;
		}
		if !x_sparse {
			break;
		}
		if x.flags.contains(DataFlags::CONSTANT) != y.flags.contains(DataFlags::CONSTANT) {
			return false;
		}
		let (Some(xd), Some(yd)) = (x.deptr.clone(), y.deptr.clone()) else {
			return false;
		};
		x = xd;
		y = yd;
	}
	x.base.token == y.base.token
}

fn has_base_transitive(a: &DMeta, target: &DMeta) -> bool {
	a.non_imposed_bases().any(|b| b.base_type.base.token == target.base.token || has_base_transitive(&b.base_type, target))
}

/// True iff a value described by `a` can be interpreted as a sequence of
/// one `target`: `a` is `target`, `target` is a non-imposed base of `a`
/// (transitively), or `a` has a reflected converter to `target`.
pub fn casts_to(a: &DMeta, target: &DMeta) -> bool {
	is(a, target) || has_base_transitive(a, target) || a.converters.contains_key(target)
}

/// True iff `target` describes a layout that fits `n` contiguous copies
/// inside `a`: a base of `a` is binary-compatible with `target` and
/// `a.size / target.size == n`.
pub fn casts_to_n(a: &DMeta, target: &DMeta, n: usize) -> bool {
	if target.size == 0 || a.size % target.size != 0 {
		return false;
	}
	a.size / target.size == n
		&& a.bases
			.iter()
			.any(|b| b.binary_compatible && b.base_type.base.token == target.base.token)
}

pub fn is_related_to(a: &DMeta, b: &DMeta) -> bool {
	casts_to(a, b) || casts_to(b, a)
}

/// Minimum number of base hops from `a` to `b`, ignoring imposed bases.
/// `0` if `is(a, b)`; [`INFINITE_DISTANCE`] if unreachable.
pub fn distance_to(a: &DMeta, b: &DMeta) -> u32 {
	if is(a, b) {
		return 0;
	}
	let mut queue: VecDeque<(DMeta, u32)> = VecDeque::new();
	queue.push_back((a.clone(), 0));
	let mut visited = std::collections::HashSet::new();
	visited.insert(a.base.token);

	while let Some((current, depth)) = queue.pop_front() {
		for base in current.non_imposed_bases() {
			if base.base_type.base.token == b.base.token {
				return depth + 1;
			}
			if visited.insert(base.base_type.base.token) {
				queue.push_back((base.base_type.clone(), depth + 1));
			}
		}
	}
	INFINITE_DISTANCE
}

pub fn has_base(a: &DMeta, base: &DMeta) -> bool {
	a.bases.iter().any(|b| b.base_type.base.token == base.base.token)
}

pub fn has_derivation(a: &DMeta, base: &DMeta) -> bool {
	has_base_transitive(a, base)
}

pub fn is_able_to(a: &DMeta, verb: &VMeta) -> bool {
	a.abilities.contains_key(verb)
}

pub fn get_ability<'a>(a: &'a DMeta, verb: &VMeta) -> Option<&'a Ability> {
	a.abilities.get(verb)
}

pub fn get_converter<'a>(a: &'a DMeta, target: &DMeta) -> Option<&'a Converter> {
	a.converters.get(target)
}

pub fn get_named_value_of<'a>(a: &'a DMeta, name: Token) -> Option<&'a crate::meta::CMeta> {
	a.named_values.iter().find(|c| c.base.token == name)
}

pub fn get_member<'a>(a: &'a DMeta, name: Token) -> Option<&'a crate::meta::data::Member> {
	a.members.iter().find(|m| m.name == name)
}

/// The most concrete type `a` can stand in for - `concrete` if set,
/// otherwise `a` itself.
pub fn get_most_concrete(a: &DMeta) -> DMeta {
	a.concrete.clone().unwrap_or_else(|| a.clone())
}

/// Strip one pointer layer, if any.
pub fn remove_pointer(a: &DMeta) -> DMeta {
	if a.is_sparse() {
		a.deptr.clone().unwrap_or_else(|| a.clone())
	} else {
		a.clone()
	}
}

/// Round `bytes` up to the element count fitting the type's allocation
/// page, using the precomputed allocation table.
pub fn request_size(a: &DMeta, bytes: usize) -> usize {
	if a.size == 0 {
		return 0;
	}
	let elements_wanted = bytes.div_ceil(a.size);
	let msb = usize::BITS - elements_wanted.max(1).leading_zeros();
	a.allocation_table
		.get(msb as usize)
		.copied()
		.unwrap_or(elements_wanted)
		.max(elements_wanted)
		* a.size
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::meta::data::{Base, DataVTable};
	use crate::meta::{Meta, MetaData, MetaKind};

	fn leaf(token: &'static str) -> DMeta {
		Arc::new(MetaData {
			base: Meta::new(MetaKind::Data, token, "TEST"),
			members: Vec::new(),
			abilities: Default::default(),
			bases: Vec::new(),
			converters: Default::default(),
			named_values: Vec::new(),
			origin: None,
			deptr: None,
			concrete: None,
			producer: None,
			flags: DataFlags::empty(),
			size: 4,
			alignment: 4,
			allocation_page: 4096,
			allocation_table: Vec::new(),
			file_extensions: "",
			suffix: "",
			pool_tactic: crate::meta::data::PoolTactic::Default,
			vtable: DataVTable::default(),
		})
	}

	fn derived_from(token: &'static str, base: &DMeta, imposed: bool) -> DMeta {
		let mut d = (*leaf(token)).clone_shape();
		d.bases.push(Base {
			base_type: base.clone(),
			count: 1,
			offset: 0,
			binary_compatible: !imposed,
			imposed,
		});
		Arc::new(d)
	}

	trait CloneShape {
		fn clone_shape(&self) -> MetaData;
	}
	impl CloneShape for MetaData {
		fn clone_shape(&self) -> MetaData {
			MetaData {
				base: self.base.clone(),
				members: Vec::new(),
				abilities: Default::default(),
				bases: Vec::new(),
				converters: Default::default(),
				named_values: Vec::new(),
				origin: self.origin.clone(),
				deptr: self.deptr.clone(),
				concrete: self.concrete.clone(),
				producer: self.producer.clone(),
				flags: self.flags,
				size: self.size,
				alignment: self.alignment,
				allocation_page: self.allocation_page,
				allocation_table: self.allocation_table.clone(),
				file_extensions: self.file_extensions,
				suffix: self.suffix,
				pool_tactic: self.pool_tactic,
				vtable: DataVTable::default(),
			}
		}
	}

	#[test]
	fn is_reflexive_for_every_descriptor() {
		let m = leaf("Leaf");
		assert!(is(&m, &m));
		assert!(is_similar(&m, &m));
		assert!(is_exact(&m, &m));
	}

	#[test]
	fn distance_zero_when_is() {
		let m = leaf("Leaf");
		assert_eq!(distance_to(&m, &m), 0);
	}

	#[test]
	fn direct_base_has_distance_one() {
		let base = leaf("Base");
		let derived = derived_from("Derived", &base, false);
		assert_eq!(distance_to(&derived, &base), 1);
		assert!(has_base(&derived, &base));
		assert!(casts_to(&derived, &base));
	}

	#[test]
	fn imposed_base_is_excluded_from_distance() {
		let base = leaf("Base");
		let derived = derived_from("Derived", &base, true);
		assert_eq!(distance_to(&derived, &base), INFINITE_DISTANCE);
	}

	#[test]
	fn unrelated_types_are_infinite_distance() {
		let a = leaf("A");
		let b = leaf("B");
		assert_eq!(distance_to(&a, &b), INFINITE_DISTANCE);
		assert!(!is_related_to(&a, &b));
	}
}
