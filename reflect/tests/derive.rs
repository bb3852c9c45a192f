use reflect::cast::{casts_to, distance_to};
use reflect::meta_data_of;
use reflect::Reflect;

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
struct Point {
	x: f32,
	y: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Reflect)]
struct Label {
	text: String,
	visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(name = "Widgets::Gadget")]
struct Gadget {
	#[reflect(skip)]
	cache: Vec<u8>,
	id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
struct Rect {
	#[reflect(base)]
	origin: Point,
	width: f32,
	height: f32,
}

#[test]
fn pod_struct_gets_a_full_vtable() {
	let meta = meta_data_of::<Point>();
	assert!(meta.is_pod());
	assert!(meta.vtable.default_ctor.is_some());
	assert!(meta.vtable.copy_ctor.is_some());
	assert!(meta.vtable.comparer.is_some());
	assert_eq!(meta.members.len(), 2);
	assert_eq!(meta.members[0].name, "x");
	assert_eq!(meta.members[1].name, "y");
}

#[test]
fn non_pod_struct_gets_clone_based_vtable_without_claiming_pod() {
	let meta = meta_data_of::<Label>();
	assert!(!meta.is_pod());
	assert!(meta.vtable.clone_ctor.is_some());
	assert!(meta.vtable.move_ctor.is_some());
	assert!(meta.vtable.destructor.is_some());
}

#[test]
fn member_offsets_match_field_layout() {
	let meta = meta_data_of::<Point>();
	assert_eq!(meta.members[0].offset, std::mem::offset_of!(Point, x));
	assert_eq!(meta.members[1].offset, std::mem::offset_of!(Point, y));
}

#[test]
fn member_types_resolve_through_deferred_retrievers() {
	let meta = meta_data_of::<Point>();
	let x_type = meta.members[0].member_type();
	assert_eq!(x_type.base.token, reflect::name_of::<f32>());
}

#[test]
fn numeric_member_casts_to_number() {
	let meta = meta_data_of::<Point>();
	let x_type = meta.members[0].member_type();
	let number = meta_data_of::<reflect::builtin::Number>();
	assert!(casts_to(&x_type, &number));
	assert_eq!(distance_to(&x_type, &number), 1);
}

#[test]
fn skipped_field_is_excluded_from_members() {
	let meta = meta_data_of::<Gadget>();
	assert_eq!(meta.members.len(), 1);
	assert_eq!(meta.members[0].name, "id");
}

#[test]
fn name_override_replaces_the_derived_token() {
	let meta = meta_data_of::<Gadget>();
	assert_eq!(meta.base.token, "Widgets::Gadget");
}

#[test]
fn embedded_base_field_is_declared_as_a_base_not_a_member() {
	let meta = meta_data_of::<Rect>();
	assert_eq!(meta.members.len(), 2);
	assert_eq!(meta.bases.len(), 1);
	assert_eq!(meta.bases[0].offset, std::mem::offset_of!(Rect, origin));
	assert_eq!(meta.bases[0].base_type.base.token, reflect::name_of::<Point>());
}
