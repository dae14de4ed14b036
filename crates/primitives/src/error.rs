use crate::datatype::Datatype;

/// Document content errors.
///
/// Raised when a concrete node's value cannot be stored under its key. These
/// are returned to the immediate caller and never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
	/// A value could not be coerced into the key's datatype.
	#[error("cannot convert {found} value {value:?} to {expected}")]
	Conversion {
		expected: Datatype,
		found: Datatype,
		value: String,
	},
	/// A virtual value or virtual element hook refused its input.
	#[error("{key} rejected content: {reason}")]
	Rejected { key: String, reason: String },
}

impl ContentError {
	/// Builds a [`ContentError::Rejected`] for the named key.
	pub fn rejected(key: impl ToString, reason: impl Into<String>) -> Self {
		Self::Rejected {
			key: key.to_string(),
			reason: reason.into(),
		}
	}
}
