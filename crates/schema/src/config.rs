//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! [schema]
//! cache-bindings = true
//! warn-on-conflicts = true
//!
//! [codec]
//! kind-attribute = "{http://schemas.example.com/g/2005}kind"
//! ```

use gmodel_primitives::QName;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
	pub schema: SchemaConfig,
	pub codec: CodecConfig,
}

impl ModelConfig {
	/// Parses a TOML document; missing tables and keys take their defaults.
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}
}

/// Options for schemas frozen from a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SchemaConfig {
	/// Memoize bound metadata per exact request.
	pub cache_bindings: bool,
	/// Warn when unordered matching declarations disagree on a field.
	pub warn_on_conflicts: bool,
}

impl Default for SchemaConfig {
	fn default() -> Self {
		Self {
			cache_bindings: true,
			warn_on_conflicts: true,
		}
	}
}

/// Options for generating and parsing raw element trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CodecConfig {
	/// Attribute whose value selects an adaptation while parsing.
	pub kind_attribute: QName,
}

fn default_kind_attribute() -> QName {
	QName::local("kind")
}

impl Default for CodecConfig {
	fn default() -> Self {
		Self {
			kind_attribute: default_kind_attribute(),
		}
	}
}
