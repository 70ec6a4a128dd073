use bookstore_model::Identified;

/// Returns the selected value that is the same record as `option`, or
/// `option` itself when nothing matches.
///
/// The result always borrows either `option` or an element of `selected`,
/// never a new value, so callers may compare by address. Scanning stops at
/// the first match. An `option` without an identifier never matches.
pub fn resolve_selected<'a, T: Identified>(option: &'a T, selected: Option<&'a [T]>) -> &'a T {
    selected
        .into_iter()
        .flatten()
        .find(|candidate| candidate.is_same_record(option))
        .unwrap_or(option)
}
