use crate::entity::TaggedEntity;
use crate::similarity::rank;
use crate::weighted::WeightedList;

/// Ranks the corpus by similarity to `query`, most similar first.
///
/// Candidates sharing the query's key are skipped, as are candidates with a
/// rank of zero. Nothing in the corpus is modified.
pub fn related_to<'a, E, I>(query: &E, corpus: I) -> WeightedList<&'a E>
where
    E: TaggedEntity + PartialEq + ?Sized,
    I: IntoIterator<Item = &'a E>,
{
    let mut related = WeightedList::new();
    for candidate in corpus {
        if candidate.key() == query.key() {
            continue;
        }
        let score = rank(query, candidate);
        if score == 0 {
            continue;
        }
        tracing::debug!(candidate = candidate.key(), score, "related candidate");
        related.add_with_weight(candidate, score);
    }
    related
}
