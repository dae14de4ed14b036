//! Layered metadata declarations for structured documents.
//!
//! Applications declare how attributes and elements look in a
//! [`MetadataRegistry`], scoped by parent element and usage context. Freezing
//! the registry yields a [`Schema`]; binding a request against it resolves
//! every matching declaration into one [`ElementMetadata`] or
//! [`AttributeMetadata`], which drives iteration, validation and the
//! [`Codec`].
//!
//! # Modules
//!
//! - [`transform`] - Declaration records and their composition rules
//! - [`registry`] - Mutable declarations and freezing
//! - [`schema`] - Frozen snapshots and binding
//! - [`metadata`] - Bound metadata handed to document code
//! - [`document`] - Concrete elements and attributes
//! - [`codec`] - Generation and parsing of raw trees

/// Generation and parsing of raw element trees.
pub mod codec;
/// Engine configuration loaded from TOML.
pub mod config;
/// Concrete document elements and attributes.
pub mod document;
/// Configuration, declaration and content errors.
pub mod error;
/// Bound metadata and ordered iteration.
pub mod metadata;
/// Mutable metadata registry and node-type registration.
pub mod registry;
/// Frozen schemas and metadata resolution.
pub mod schema;
/// Declaration records, scopes and composition.
pub mod transform;
/// Structural validation of documents.
pub mod validate;
/// Computed attributes and elements.
pub mod virtuals;

pub use codec::{Codec, RawElement};
pub use config::{CodecConfig, ModelConfig, SchemaConfig};
pub use document::{Attribute, Children, Element};
pub use error::{ConfigError, ContentError, SchemaError};
pub use gmodel_primitives as primitives;
pub use inventory;
pub use metadata::{AttributeIter, AttributeMetadata, ElementIter, ElementMetadata};
pub use registry::{AttributeCreator, ElementCreator, MetadataRegistry, TypeRegistration};
pub use schema::{Metadata, Schema};
pub use transform::{
	Action, AttributeTransform, Cardinality, Declared, DeclaredKey, DeclaredKeys, ElementTransform,
	Properties, TransformKey,
};
pub use validate::{ElementValidator, ValidationContext, ValidationError};
pub use virtuals::{MultipleVirtualElement, SingleVirtualElement, VirtualElement, VirtualValue};
