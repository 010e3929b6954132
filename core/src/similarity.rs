use crate::entity::TaggedEntity;
use crate::weighted::{Weight, WeightedList};

/// Tags present on both entities, each weighted by the product of its two
/// source weights. Products saturate at the `Weight` bounds.
pub fn shared_tags<A, B>(a: &A, b: &B) -> WeightedList<String>
where
    A: TaggedEntity + ?Sized,
    B: TaggedEntity + ?Sized,
{
    let mut combined = WeightedList::new();
    for (tag, weight_a) in a.tags().entries() {
        if let Some(weight_b) = b.tags().weight_of(tag) {
            combined.add_with_weight(tag.clone(), weight_a.saturating_mul(weight_b));
        }
    }
    combined
}

/// Similarity rank: the sum of [`shared_tags`] weights. Zero when nothing is shared.
pub fn rank<A, B>(a: &A, b: &B) -> Weight
where
    A: TaggedEntity + ?Sized,
    B: TaggedEntity + ?Sized,
{
    shared_tags(a, b).total_weight()
}
