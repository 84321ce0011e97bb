/// Joins the non-blank fragments with a single space, in order.
pub fn join_fragments<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds a base description from an optional batch prefix and an optional
/// author description. Both absent yields the empty string, which is still a
/// valid counter bucket.
pub fn compose(prefix: Option<&str>, own: Option<&str>) -> String {
    join_fragments(prefix.into_iter().chain(own))
}
