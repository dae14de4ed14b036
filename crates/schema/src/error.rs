//! Error taxonomy of the engine.
//!
//! Configuration errors ([`SchemaError`]) abort schema construction; content
//! errors ([`ContentError`]) go back to whoever set or parsed the value; lookup
//! misses are not errors at all and bind to undeclared metadata.

pub use gmodel_primitives::ContentError;
use gmodel_primitives::QName;

use crate::transform::{Cardinality, TransformKey};

/// Invalid metadata declarations, detected when a schema is frozen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	/// A whitelist names an attribute that no matching scope declares.
	#[error("attribute whitelist at {scope} names undeclared attribute {attribute}")]
	UndeclaredWhitelistAttribute { scope: TransformKey, attribute: QName },

	/// A whitelist names a child element that no matching scope declares.
	#[error("element whitelist at {scope} names undeclared element {element}")]
	UndeclaredWhitelistElement { scope: TransformKey, element: QName },

	/// A virtual element's arity disagrees with the declared cardinality.
	#[error("virtual element at {scope} is {} but cardinality is {cardinality:?}", arity(.multiple))]
	VirtualCardinality {
		scope: TransformKey,
		cardinality: Cardinality,
		multiple: bool,
	},

	/// Following relocation sources returns to a scope already on the path.
	#[error("relocation cycle: {}", join(.path))]
	RelocationCycle { path: Vec<TransformKey> },
}

fn arity(multiple: &bool) -> &'static str {
	if *multiple { "multiple" } else { "single" }
}

fn join(path: &[TransformKey]) -> String {
	path.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> ")
}

/// Model configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid model configuration: {0}")]
	Parse(#[from] toml::de::Error),
}
