//! Identity and typing primitives for the metadata engine.
//!
//! Everything here is an immutable value type: qualified names, content
//! datatypes and values, the element node-type hierarchy, metadata keys and
//! usage contexts.

/// Usage contexts scoping metadata declarations.
pub mod context;
/// Content datatypes, values and typed extraction.
pub mod datatype;
/// Element node-type hierarchy.
pub mod element_type;
/// Content conversion errors.
pub mod error;
/// Attribute, element and bucket keys.
pub mod key;
/// Qualified names with wildcard matching.
pub mod qname;

pub use context::{MetadataContext, Version};
pub use datatype::{Datatype, FromValue, Value};
pub use element_type::{ELEMENT, ElementType, ElementTypeDef};
pub use error::ContentError;
pub use key::{AttributeKey, ElementKey, MetadataKey, RootKey};
pub use qname::{ANY_LOCAL_NAME, QName};
