//! Sharing registries and schemas across threads.

mod common;

use std::thread;

use common::*;
use gmodel_primitives::QName;
use gmodel_schema::{ElementMetadata, MetadataRegistry};

#[test]
fn test_concurrent_binds_share_one_instance() {
	init_tracing();
	let schema = photo_model().create_schema().unwrap();

	let bound: Vec<ElementMetadata> = thread::scope(|s| {
		let handles: Vec<_> = (0..8)
			.map(|_| s.spawn(|| schema.bind_element(Some(&feed_key()), &photo_key(), None)))
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	let first = &bound[0];
	assert!(bound.iter().all(|meta| meta.ptr_eq(first)));
	assert!(first.ptr_eq(&schema.bind_element(Some(&feed_key()), &photo_key(), None)));
}

#[test]
fn test_concurrent_declarations_all_land() {
	let registry = MetadataRegistry::new();
	thread::scope(|s| {
		for worker in 0..4 {
			let registry = &registry;
			s.spawn(move || {
				let feed = registry.build_element(None, &feed_key(), None);
				for i in 0..16 {
					feed.add_element(&text(&format!("w{worker}-{i}")));
				}
			});
		}
	});

	let schema = registry.create_schema().unwrap();
	let feed = schema.bind_element(None, &feed_key(), None);
	assert_eq!(feed.elements().len(), 64);
	for worker in 0..4 {
		let own: Vec<String> = names(feed.elements())
			.into_iter()
			.filter(|n| n.starts_with(&format!("w{worker}-")))
			.collect();
		let expected: Vec<String> = (0..16).map(|i| format!("w{worker}-{i}")).collect();
		assert_eq!(own, expected, "per-thread declaration order is preserved");
	}
}

#[test]
fn test_freeze_races_with_binds() {
	let registry = photo_model();
	thread::scope(|s| {
		for _ in 0..4 {
			s.spawn(|| {
				for _ in 0..32 {
					let schema = registry.create_schema().unwrap();
					let feed = schema.bind_element(None, &feed_key(), None);
					assert!(feed.is_declared());
				}
			});
		}
		s.spawn(|| {
			for i in 0..32 {
				registry
					.build_element(None, &feed_key(), None)
					.add_attribute(&gmodel_primitives::AttributeKey::text(QName::local(&format!("a{i}"))));
			}
		});
	});

	let feed = registry
		.create_schema()
		.unwrap()
		.bind_element(None, &feed_key(), None);
	assert_eq!(feed.attributes().len(), 33);
}
