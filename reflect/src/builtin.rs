//! `Reflected` impls for the primitive types every other reflected type
//! implicitly depends on when it lists a numeric member.
//!
//! Registers the always-present `Number` / `Signed` / `Unsigned` marker
//! bases so `CastsTo<Number>()` holds for every integer type out of the
//! box, and `CastsTo<Signed>()` / `CastsTo<Unsigned>()` split along
//! signedness (spec.md §8 testable scenario 5). The markers are
//! zero-sized, so `CastsTo<Number>(a, 2)` is false for every integer `a`
//! without any special-casing - a zero-sized target can never satisfy the
//! "`n` contiguous copies" arithmetic in [`crate::cast::casts_to_n`].

use crate::meta::data::DataFlags;
use crate::synth::{synthesize, BaseSpec, Reflected};

pub struct Number;
pub struct Signed;
pub struct Unsigned;

impl Reflected for Number {
	fn flags() -> DataFlags {
		DataFlags::ABSTRACT
	}
}

impl Reflected for Signed {
	fn flags() -> DataFlags {
		DataFlags::ABSTRACT
	}
	fn bases() -> Vec<BaseSpec> {
		vec![BaseSpec {
			retrieve: synthesize::<Number>,
			count: 1,
			offset: 0,
			binary_compatible: false,
			imposed: false,
		}]
	}
}

impl Reflected for Unsigned {
	fn flags() -> DataFlags {
		DataFlags::ABSTRACT
	}
	fn bases() -> Vec<BaseSpec> {
		vec![BaseSpec {
			retrieve: synthesize::<Number>,
			count: 1,
			offset: 0,
			binary_compatible: false,
			imposed: false,
		}]
	}
}

macro_rules! reflect_numeric {
	($t:ty, $marker:ty) => {
		impl Reflected for $t {
			fn flags() -> DataFlags {
				DataFlags::POD | DataFlags::NULLIFIABLE
			}
			fn bases() -> Vec<BaseSpec> {
				vec![BaseSpec {
					retrieve: synthesize::<$marker>,
					count: 1,
					offset: 0,
					binary_compatible: true,
					imposed: false,
				}]
			}
			fn vtable() -> crate::meta::data::DataVTable {
				crate::synth::pod_vtable::<$t>()
			}
		}
	};
}

reflect_numeric!(i8, Signed);
reflect_numeric!(i16, Signed);
reflect_numeric!(i32, Signed);
reflect_numeric!(i64, Signed);
reflect_numeric!(i128, Signed);
reflect_numeric!(isize, Signed);
reflect_numeric!(u8, Unsigned);
reflect_numeric!(u16, Unsigned);
reflect_numeric!(u32, Unsigned);
reflect_numeric!(u64, Unsigned);
reflect_numeric!(u128, Unsigned);
reflect_numeric!(usize, Unsigned);
reflect_numeric!(f32, Number);
reflect_numeric!(f64, Number);

impl Reflected for bool {
	fn flags() -> DataFlags {
		DataFlags::POD | DataFlags::NULLIFIABLE
	}
	fn vtable() -> crate::meta::data::DataVTable {
		crate::synth::pod_vtable::<bool>()
	}
}

impl Reflected for char {
	fn flags() -> DataFlags {
		DataFlags::POD | DataFlags::NULLIFIABLE
	}
	fn vtable() -> crate::meta::data::DataVTable {
		crate::synth::pod_vtable::<char>()
	}
}

/// Not POD (it owns a heap allocation), so its shims route through `Clone`
/// rather than a raw byte copy.
impl Reflected for String {
	fn flags() -> DataFlags {
		DataFlags::empty()
	}
	fn vtable() -> crate::meta::data::DataVTable {
		crate::synth::clone_vtable::<String>()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cast::{casts_to, casts_to_n};
	use crate::synth::synthesize;

	#[test]
	fn signed_integers_cast_to_number_and_signed_not_unsigned() {
		let i = synthesize::<i32>();
		let number = synthesize::<Number>();
		let signed = synthesize::<Signed>();
		let unsigned = synthesize::<Unsigned>();
		assert!(casts_to(&i, &number));
		assert!(casts_to(&i, &signed));
		assert!(!casts_to(&i, &unsigned));
	}

	#[test]
	fn unsigned_integers_cast_to_number_and_unsigned_not_signed() {
		let u = synthesize::<u64>();
		let number = synthesize::<Number>();
		let signed = synthesize::<Signed>();
		let unsigned = synthesize::<Unsigned>();
		assert!(casts_to(&u, &number));
		assert!(casts_to(&u, &unsigned));
		assert!(!casts_to(&u, &signed));
	}

	#[test]
	fn number_cast_with_arity_two_is_false() {
		let i = synthesize::<i32>();
		let number = synthesize::<Number>();
		assert!(!casts_to_n(&i, &number, 2));
	}

	#[test]
	fn string_is_reflected_and_not_pod() {
		let s = synthesize::<String>();
		assert!(!s.is_pod());
		assert!(s.vtable.clone_ctor.is_some());
		assert!(s.vtable.move_ctor.is_some());
	}
}
