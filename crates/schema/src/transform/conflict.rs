use super::TransformKey;

/// Transforms whose scalar fields can be compared for conflicts.
pub(crate) trait Conflicting {
	fn differing(&self, other: &Self) -> Vec<&'static str>;
}

impl Conflicting for super::AttributeTransform {
	fn differing(&self, other: &Self) -> Vec<&'static str> {
		super::AttributeTransform::differing(self, other)
	}
}

impl Conflicting for super::ElementTransform {
	fn differing(&self, other: &Self) -> Vec<&'static str> {
		super::ElementTransform::differing(self, other)
	}
}

/// Warns about pairs of matching transforms that set the same field to
/// different values while neither scope is more specific than the other.
///
/// The later declaration still wins; this only makes the outcome visible.
/// Returns the number of conflicting pairs found.
pub(crate) fn report_conflicts<T: Conflicting>(
	scope: &TransformKey,
	parts: &[(&TransformKey, &T)],
) -> usize {
	let mut found = 0;
	for (i, (earlier_key, earlier)) in parts.iter().enumerate() {
		for (later_key, later) in &parts[i + 1..] {
			if !earlier_key.is_unordered_with(later_key) {
				continue;
			}
			let fields = earlier.differing(later);
			if fields.is_empty() {
				continue;
			}
			found += 1;
			tracing::warn!(
				domain = "schema",
				scope = %scope,
				earlier = %earlier_key,
				winner = %later_key,
				fields = ?fields,
				"unordered declarations conflict; later declaration wins",
			);
		}
	}
	found
}
