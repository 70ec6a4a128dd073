use bookstore_model::Identified;
use bookstore_types::RecordId;
use std::collections::HashSet;

/// Returns `fetched` with every value of `must_include` that it lacks
/// prepended, in `must_include` order.
///
/// `must_include` accepts anything iterable whose items convert into
/// `Option<T>`: nothing, a single `Option<T>`, a `Vec<T>` or a
/// `Vec<Option<T>>`. `None` items are skipped.
///
/// - `fetched` is returned untouched (order and contents), including entries
///   that share an identifier with a `must_include` value.
/// - A `must_include` value is dropped when `fetched` or an earlier accepted
///   `must_include` value already carries its identifier.
/// - A `must_include` value without an identifier is always kept: it stands
///   for an unsaved record and matches nothing.
pub fn reconcile<T, I>(fetched: Vec<T>, must_include: I) -> Vec<T>
where
    T: Identified,
    I: IntoIterator,
    I::Item: Into<Option<T>>,
{
    let mut present: Option<HashSet<RecordId>> = None;
    let mut missing = Vec::new();

    for candidate in must_include.into_iter().filter_map(|item| item.into()) {
        let Some(id) = candidate.record_id() else {
            missing.push(candidate);
            continue;
        };
        let present = present
            .get_or_insert_with(|| fetched.iter().filter_map(Identified::record_id).collect());
        if present.insert(id) {
            missing.push(candidate);
        }
    }

    if missing.is_empty() {
        return fetched;
    }
    missing.reserve(fetched.len());
    missing.extend(fetched);
    missing
}
