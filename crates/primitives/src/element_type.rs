//! Node-type hierarchy for document elements.
//!
//! Element kinds form an application-supplied tree of `'static` definitions
//! linked by parent pointers. Every hierarchy is rooted at a definition with
//! no parent; [`ELEMENT`] is the shared root used for generic elements.
//!
//! ```
//! use gmodel_primitives::{ELEMENT, ElementType, ElementTypeDef};
//!
//! static ENTRY: ElementTypeDef = ElementTypeDef::new("entry", &ELEMENT);
//! static PHOTO_ENTRY: ElementTypeDef = ElementTypeDef::new("photo-entry", &ENTRY);
//!
//! let entry = ElementType::of(&ENTRY);
//! let photo = ElementType::of(&PHOTO_ENTRY);
//! assert!(entry.is_assignable_from(photo));
//! assert_eq!(photo.root_child(), Some(entry));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A static element-type definition.
#[derive(Debug)]
pub struct ElementTypeDef {
	name: &'static str,
	parent: Option<&'static ElementTypeDef>,
}

impl ElementTypeDef {
	/// Defines a hierarchy root.
	pub const fn root(name: &'static str) -> Self {
		Self { name, parent: None }
	}

	/// Defines a subtype of `parent`.
	pub const fn new(name: &'static str, parent: &'static ElementTypeDef) -> Self {
		Self {
			name,
			parent: Some(parent),
		}
	}
}

/// Root of the element hierarchy: "any element".
pub static ELEMENT: ElementTypeDef = ElementTypeDef::root("element");

/// Copyable handle to an [`ElementTypeDef`].
///
/// Identity is the definition's address, so two definitions with the same
/// name are still distinct types.
#[derive(Clone, Copy)]
pub struct ElementType(&'static ElementTypeDef);

impl ElementType {
	/// Wraps a static definition.
	pub const fn of(def: &'static ElementTypeDef) -> Self {
		Self(def)
	}

	/// The shared root type, [`ELEMENT`].
	pub fn any() -> Self {
		Self(&ELEMENT)
	}

	/// Returns the definition's name.
	pub fn name(self) -> &'static str {
		self.0.name
	}

	/// Returns the immediate supertype.
	pub fn parent(self) -> Option<ElementType> {
		self.0.parent.map(ElementType)
	}

	/// Returns true if this type has no supertype.
	pub fn is_root(self) -> bool {
		self.0.parent.is_none()
	}

	/// Number of supertypes above this one.
	pub fn depth(self) -> usize {
		self.ancestors().count()
	}

	/// Iterates strict supertypes, nearest first.
	pub fn ancestors(self) -> impl Iterator<Item = ElementType> {
		std::iter::successors(self.parent(), |t| t.parent())
	}

	/// Returns true if `other` is this type or one of its subtypes.
	pub fn is_assignable_from(self, other: ElementType) -> bool {
		self == other || other.ancestors().any(|t| t == self)
	}

	/// Returns true if `other` is a subtype of this type and not this type itself.
	pub fn is_strict_supertype_of(self, other: ElementType) -> bool {
		self != other && self.is_assignable_from(other)
	}

	/// Returns the shallowest supertype sitting immediately below the root,
	/// or `None` if this type is itself a root.
	pub fn root_child(self) -> Option<ElementType> {
		let mut cur = self;
		loop {
			let parent = cur.parent()?;
			if parent.is_root() {
				return Some(cur);
			}
			cur = parent;
		}
	}

	fn addr(self) -> usize {
		self.0 as *const ElementTypeDef as usize
	}
}

impl PartialEq for ElementType {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.0, other.0)
	}
}

impl Eq for ElementType {}

impl Hash for ElementType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.addr().hash(state);
	}
}

impl PartialOrd for ElementType {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Hierarchy depth, then name; definitions sharing both fall back to address.
impl Ord for ElementType {
	fn cmp(&self, other: &Self) -> Ordering {
		self.depth()
			.cmp(&other.depth())
			.then_with(|| self.name().cmp(other.name()))
			.then_with(|| self.addr().cmp(&other.addr()))
	}
}

impl fmt::Debug for ElementType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ElementType({})", self.0.name)
	}
}

impl fmt::Display for ElementType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0.name)
	}
}
