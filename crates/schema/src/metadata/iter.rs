//! Ordered traversal of a document element's attributes and children.
//!
//! Both iterators are two-phase state machines. The declared phase walks the
//! bound metadata's key list, skipping hidden keys and expanding virtual
//! slots; the undeclared phase walks whatever is physically stored on the
//! element and was never declared, in storage order. Declared items always
//! precede undeclared ones.
//!
//! A declared pattern key such as `{ns}*` emits, at its position, every
//! stored item it claims: those it matches that no exact declared key names.

use std::borrow::Cow;
use std::slice;
use std::vec;

use super::ElementMetadata;
use crate::document::{Attribute, Element};
use crate::virtuals::VirtualElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
	Declared,
	Undeclared,
	Done,
}

/// Attributes of one element in output order.
pub struct AttributeIter<'a> {
	metadata: &'a ElementMetadata,
	element: &'a Element,
	mode: Mode,
	index: usize,
	pending: vec::IntoIter<&'a Attribute>,
}

impl<'a> AttributeIter<'a> {
	pub(super) fn new(metadata: &'a ElementMetadata, element: &'a Element) -> Self {
		Self {
			metadata,
			element,
			mode: Mode::Declared,
			index: 0,
			pending: Vec::new().into_iter(),
		}
	}

	fn next_declared(&mut self) -> Option<Option<Cow<'a, Attribute>>> {
		let key = self.metadata.attributes().get(self.index)?;
		self.index += 1;
		let bound = self.metadata.bind_attribute(key);
		if !bound.is_visible() {
			return Some(None);
		}
		match bound.virtual_value() {
			Some(generator) => Some(
				generator
					.generate(self.element)
					.map(|value| Cow::Owned(Attribute::from_parts(key.clone(), value))),
			),
			None => {
				self.pending = self.metadata.claimed_attributes(key, self.element).into_iter();
				Some(None)
			}
		}
	}
}

impl<'a> Iterator for AttributeIter<'a> {
	type Item = Cow<'a, Attribute>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(attribute) = self.pending.next() {
				return Some(Cow::Borrowed(attribute));
			}
			match self.mode {
				Mode::Declared => match self.next_declared() {
					Some(Some(item)) => return Some(item),
					Some(None) => {}
					None => {
						self.mode = Mode::Undeclared;
						self.index = 0;
					}
				},
				Mode::Undeclared => {
					let Some(attribute) = self.element.attribute_at(self.index) else {
						self.mode = Mode::Done;
						continue;
					};
					self.index += 1;
					if !self.metadata.is_declared_attribute(attribute.name()) {
						return Some(Cow::Borrowed(attribute));
					}
				}
				Mode::Done => return None,
			}
		}
	}
}

/// Children still to be emitted for the current key.
enum Pending<'a> {
	None,
	Group(slice::Iter<'a, Element>),
	Claimed(vec::IntoIter<&'a Element>),
	Generated(vec::IntoIter<Element>),
}

/// Children of one element in output order.
pub struct ElementIter<'a> {
	metadata: &'a ElementMetadata,
	element: &'a Element,
	mode: Mode,
	index: usize,
	pending: Pending<'a>,
}

impl<'a> ElementIter<'a> {
	pub(super) fn new(metadata: &'a ElementMetadata, element: &'a Element) -> Self {
		Self {
			metadata,
			element,
			mode: Mode::Declared,
			index: 0,
			pending: Pending::None,
		}
	}

	fn drain_pending(&mut self) -> Option<Cow<'a, Element>> {
		let item = match &mut self.pending {
			Pending::None => None,
			Pending::Group(iter) => iter.next().map(Cow::Borrowed),
			Pending::Claimed(iter) => iter.next().map(Cow::Borrowed),
			Pending::Generated(iter) => iter.next().map(Cow::Owned),
		};
		if item.is_none() {
			self.pending = Pending::None;
		}
		item
	}

	/// Advances one declared key; `None` once the list is exhausted.
	fn advance_declared(&mut self) -> Option<Option<Cow<'a, Element>>> {
		let key = self.metadata.elements().get(self.index)?;
		self.index += 1;
		let bound = self.metadata.bind_element(key);
		if !bound.is_visible() {
			return Some(None);
		}
		match bound.virtual_element() {
			Some(VirtualElement::Single(generator)) => {
				return Some(generator.generate(self.element, &bound).map(Cow::Owned));
			}
			Some(VirtualElement::Multiple(generator)) => {
				self.pending = Pending::Generated(generator.generate(self.element, &bound).into_iter());
			}
			None => {
				let claimed = self.metadata.claimed_elements(key, self.element);
				self.pending = Pending::Claimed(claimed.into_iter());
			}
		}
		Some(None)
	}
}

impl<'a> Iterator for ElementIter<'a> {
	type Item = Cow<'a, Element>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(item) = self.drain_pending() {
				return Some(item);
			}
			match self.mode {
				Mode::Declared => match self.advance_declared() {
					Some(Some(item)) => return Some(item),
					Some(None) => {}
					None => {
						self.mode = Mode::Undeclared;
						self.index = 0;
					}
				},
				Mode::Undeclared => {
					let Some((name, group)) = self.element.child_group_at(self.index) else {
						self.mode = Mode::Done;
						continue;
					};
					self.index += 1;
					if !self.metadata.is_declared_element(name) {
						self.pending = Pending::Group(group.iter());
					}
				}
				Mode::Done => return None,
			}
		}
	}
}
