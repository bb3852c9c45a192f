//! Canonical name derivation and process-lifetime string interning.
//!
//! Rust has no equivalent of stringifying a `__PRETTY_FUNCTION__` per
//! compiler, but it does have `std::any::type_name::<T>()`, which plays
//! exactly the role the reference design's "pretty function" string plays
//! in its name-derivation algorithm: a deterministic-per-compiler spelling
//! of `T` that we then run through a skip/replace canonicalization ladder.

use std::any::type_name;
use std::sync::{Mutex, OnceLock};

use bumpalo::Bump;

use crate::hash::{hash_bytes, Hash};

/// Immutable, process-lifetime UTF-8 view used as a type/trait/verb/constant
/// identity across the whole registry.
pub type Token = &'static str;

fn arena() -> &'static Mutex<Bump> {
	static ARENA: OnceLock<Mutex<Bump>> = OnceLock::new();
	ARENA.get_or_init(|| Mutex::new(Bump::new()))
}

/// Intern a string into the process-lifetime arena, returning a stable
/// `'static` view. Interning is idempotent in effect (repeated calls with
/// equal content just leak another copy) - callers that need deduplication
/// on top of this, like the registry's token maps, keep their own
/// already-interned-token lookup.
pub fn intern(s: &str) -> Token {
	let arena = arena().lock().unwrap();
	let allocated = arena.alloc_str(s);
	// SAFETY: the Bump arena is never reset and lives for the process
	// lifetime (it is only ever grown, behind a `'static` OnceLock), so
	// the allocation outlives any borrow a caller could form.
	unsafe { std::mem::transmute::<&str, &'static str>(allocated) }
}

/// Strip a single leading reference decoration (`&` / `&mut `), since
/// reference-ness is always stripped first when deriving a canonical name.
fn strip_leading_reference(mut s: &str) -> &str {
	loop {
		if let Some(rest) = s.strip_prefix("&mut ") {
			s = rest;
		} else if let Some(rest) = s.strip_prefix('&') {
			s = rest;
		} else {
			break;
		}
	}
	s
}

/// Strip `std::`/`alloc::`/`core::` crate-root segments from every path in
/// `raw`, the way the reference design strips its own `Langulus::`
/// namespace prefix (SPEC_FULL.md §4.1) - only the named root segment is
/// dropped, not the rest of the module path behind it, so
/// `alloc::string::String` becomes `string::String`, not bare `String`.
/// Only matches at a path-segment boundary, so an identifier that merely
/// contains one of these words (e.g. `mycore::Thing`) is left alone.
fn strip_stdlib_prefixes(raw: &str) -> String {
	const PREFIXES: [&str; 3] = ["std::", "alloc::", "core::"];
	let mut out = String::with_capacity(raw.len());
	let mut rest = raw;
	loop {
		let mut earliest: Option<(usize, &str)> = None;
		for prefix in PREFIXES {
			let Some(pos) = rest.find(prefix) else { continue };
			let at_boundary = pos == 0 || !matches!(rest.as_bytes()[pos - 1], b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_');
			if at_boundary && earliest.map_or(true, |(e, _)| pos < e) {
				earliest = Some((pos, prefix));
			}
		}
		match earliest {
			Some((pos, prefix)) => {
				out.push_str(&rest[..pos]);
				rest = &rest[pos + prefix.len()..];
			}
			None => break,
		}
	}
	out.push_str(rest);
	out
}

/// Collapse runs of ASCII whitespace to a single space, then strip
/// `std::`/`alloc::`/`core::` path-segment noise.
///
/// The reference design's `ReplacePatterns` table also substitutes
/// platform spellings of `std::intN_t` for `iN`/`uN`; `type_name::<T>()`
/// already spells Rust's fixed-width integers exactly that way, so that
/// half of the ladder has no remaining work to do here (see SPEC_FULL.md
/// §4.1).
fn normalize(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut chars = raw.chars().peekable();
	while let Some(c) = chars.next() {
		if c.is_whitespace() {
			while matches!(chars.peek(), Some(c2) if c2.is_whitespace()) {
				chars.next();
			}
			out.push(' ');
			continue;
		}
		out.push(c);
	}
	strip_stdlib_prefixes(&out)
}

/// Derive the canonical token for `T`.
///
/// `NameOf<T>() == NameOf<U>()` iff `T` and `U` are the same canonical type
/// (ignoring reference-ness, which is stripped first). Pointer and
/// const/volatile decorations are preserved and read outer-in, matching
/// `type_name`'s own spelling of raw pointer chains.
pub fn name_of<T: ?Sized>() -> Token {
	let raw = type_name::<T>();
	let stripped = strip_leading_reference(raw);
	intern(&normalize(stripped))
}

/// Same as [`name_of`], but returns only the last unqualified segment
/// (skipping over anything nested inside `<...>` template brackets).
pub fn last_name_of<T: ?Sized>() -> Token {
	last_segment(name_of::<T>())
}

/// Find the last `::`-delimited segment of `token` that isn't nested inside
/// a `<...>` scope.
pub fn last_segment(token: &str) -> Token {
	let bytes = token.as_bytes();
	let mut depth = 0i32;
	let mut i = bytes.len();
	while i > 0 {
		match bytes[i - 1] {
			b':' if depth == 0 => {
				if i >= 2 && bytes[i - 2] == b':' {
					return intern(&token[i..]);
				}
			}
			b'>' => depth += 1,
			b'<' => depth -= 1,
			_ => {}
		}
		i -= 1;
	}
	intern(token)
}

/// Fold a token to lowercase - the key used in the registry's token maps.
pub fn to_lowercase(token: &str) -> String {
	token.to_ascii_lowercase()
}

/// Trim bytes `<= 0x20` from both ends of `token`, then lowercase it - the
/// key used in the registry's operator map.
pub fn isolate_operator(token: &str) -> String {
	let bytes = token.as_bytes();
	let mut l = 0usize;
	let mut r = bytes.len();
	while l < r && bytes[l] <= 0x20 {
		l += 1;
	}
	while r > l && bytes[r - 1] <= 0x20 {
		r -= 1;
	}
	to_lowercase(&token[l..r])
}

/// Compose the canonical token of a named constant (enum variant) from its
/// owning enum's token and the variant's own name.
///
/// Rust has no analogue of stringifying a non-type template parameter the
/// way the reference design does for named enumerators, so `reflect-derive`
/// supplies the variant name directly at registration time instead of
/// parsing it out of a pretty-printed constant expression.
pub fn named_constant_token(enum_token: Token, variant: &str) -> Token {
	intern(&format!("{enum_token}::{variant}"))
}

/// Hash the canonical token of a type.
pub fn hash_of<T: ?Sized>() -> Hash {
	hash_bytes(name_of::<T>().as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Plain;
	struct Generic<T>(std::marker::PhantomData<T>);

	#[test]
	fn reference_stripping_is_idempotent_with_value() {
		assert_eq!(name_of::<Plain>(), name_of::<&Plain>());
		assert_eq!(name_of::<Plain>(), name_of::<&mut Plain>());
	}

	#[test]
	fn pointer_decorations_are_preserved_and_distinct() {
		assert_ne!(name_of::<*const Plain>(), name_of::<*mut Plain>());
		assert_ne!(name_of::<*const Plain>(), name_of::<Plain>());
	}

	#[test]
	fn nested_pointer_decorations_read_outer_in() {
		let token = name_of::<*const *mut Plain>();
		assert!(token.starts_with("*const *mut"));
	}

	#[test]
	fn hash_matches_name_hash() {
		let h1 = hash_of::<Plain>();
		let h2 = hash_bytes(name_of::<Plain>().as_bytes());
		assert_eq!(h1.0, h2.0);
	}

	#[test]
	fn last_segment_skips_generic_brackets() {
		let token = name_of::<Generic<Plain>>();
		let last = last_segment(token);
		assert!(!last.contains("::"));
	}

	#[test]
	fn named_constant_token_appends_variant() {
		let t = named_constant_token("Foo::Bar", "Baz");
		assert!(t.ends_with("::Baz"));
		assert!(t.starts_with("Foo::Bar"));
	}

	#[test]
	fn isolate_operator_trims_control_bytes_and_lowercases() {
		assert_eq!(isolate_operator("  +  "), "+");
		assert_eq!(isolate_operator("\t - \n"), "-");
	}

	#[test]
	fn stdlib_crate_root_segments_are_stripped() {
		assert_eq!(name_of::<String>(), "string::String");
		assert!(!name_of::<Vec<Plain>>().contains("alloc::"));
	}

	#[test]
	fn stdlib_prefix_stripping_respects_segment_boundaries() {
		assert_eq!(strip_stdlib_prefixes("alloc::vec::Vec<alloc::string::String>"), "vec::Vec<string::String>");
		assert_eq!(strip_stdlib_prefixes("mycore::Thing"), "mycore::Thing");
		assert_eq!(strip_stdlib_prefixes("outer::std::Thing"), "outer::Thing");
	}
}
