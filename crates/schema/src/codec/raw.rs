use gmodel_primitives::QName;
use serde::{Deserialize, Serialize};

/// A wire-neutral element tree: names and text only, no datatypes.
///
/// This is the boundary with byte-level readers and writers, which map it
/// to and from XML, JSON or any other concrete syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawElement {
	pub name: QName,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub attributes: Vec<(QName, String)>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<RawElement>,
}

impl RawElement {
	pub fn new(name: QName) -> Self {
		Self {
			name,
			text: None,
			attributes: Vec::new(),
			children: Vec::new(),
		}
	}

	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	pub fn with_attribute(mut self, name: QName, value: impl Into<String>) -> Self {
		self.attributes.push((name, value.into()));
		self
	}

	pub fn with_child(mut self, child: RawElement) -> Self {
		self.children.push(child);
		self
	}

	pub fn attribute(&self, name: &QName) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	pub fn child(&self, name: &QName) -> Option<&RawElement> {
		self.children.iter().find(|c| &c.name == name)
	}
}
