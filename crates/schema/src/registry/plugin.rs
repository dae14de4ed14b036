use gmodel_primitives::ElementType;

use super::MetadataRegistry;

/// Static registration of the metadata a node type declares.
///
/// Submitted with `inventory::submit!` next to the node type's definition;
/// [`MetadataRegistry::register`] runs every registration for a type and its
/// supertypes.
///
/// ```ignore
/// static ENTRY: ElementTypeDef = ElementTypeDef::new("entry", &ELEMENT);
///
/// fn declare_entry(registry: &MetadataRegistry) {
///     registry.build_element(None, &ElementKey::for_type(ElementType::of(&ENTRY)), None)
///         .add_attribute(&AttributeKey::text(QName::local("etag")));
/// }
///
/// gmodel_schema::inventory::submit!(TypeRegistration::new(ElementType::of(&ENTRY), declare_entry));
/// ```
pub struct TypeRegistration {
	pub element_type: ElementType,
	pub register: fn(&MetadataRegistry),
}

inventory::collect!(TypeRegistration);

impl TypeRegistration {
	pub const fn new(element_type: ElementType, register: fn(&MetadataRegistry)) -> Self {
		Self {
			element_type,
			register,
		}
	}
}

/// Registrations submitted for exactly `element_type`.
pub(crate) fn registrations_for(element_type: ElementType) -> impl Iterator<Item = &'static TypeRegistration> {
	inventory::iter::<TypeRegistration>
		.into_iter()
		.filter(move |reg| reg.element_type == element_type)
}
