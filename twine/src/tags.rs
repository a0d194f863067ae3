//! Tag queries: an AND of OR-groups over a definition's tags, where a tag
//! prefixed with `~` is negated.

/// A parsed tag query. Every group must be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagQuery {
    pub groups: Vec<Vec<String>>,
}

impl TagQuery {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }

    /// Builds a query from command-line style arguments where each argument
    /// is one comma-separated OR-group, e.g. `["ui,web", "~beta"]`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let groups = args
            .iter()
            .map(|arg| {
                arg.as_ref()
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|group| !group.is_empty())
            .collect();
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Evaluates the query against a definition and its reference's tags.
    pub fn matches(
        &self,
        definition_tags: Option<&[String]>,
        reference_tags: Option<&[String]>,
        include_untagged: bool,
    ) -> bool {
        matches(definition_tags, reference_tags, &self.groups, include_untagged)
    }
}

/// Decides whether a definition passes a tag query.
///
/// The definition's own tags win over the reference's; only when the
/// definition has no tag list at all are the reference's tags consulted.
/// A group passes when one of its plain tags is present, or when it has
/// negated tags and none of them is present.
pub fn matches<S: AsRef<str>>(
    definition_tags: Option<&[String]>,
    reference_tags: Option<&[String]>,
    query: &[Vec<S>],
    include_untagged: bool,
) -> bool {
    if query.is_empty() {
        return true;
    }

    let tags = match definition_tags.or(reference_tags) {
        Some(tags) if !tags.is_empty() => tags,
        _ => return include_untagged,
    };
    let has = |tag: &str| tags.iter().any(|t| t == tag);

    query.iter().all(|group| {
        let (negated, regular): (Vec<&str>, Vec<&str>) = group
            .iter()
            .map(|tag| AsRef::<str>::as_ref(tag))
            .partition(|tag| tag.starts_with('~'));

        let regular_match = regular.iter().any(|tag| has(tag));
        let negated_match = !negated.is_empty() && negated.iter().all(|tag| !has(&tag[1..]));

        regular_match || negated_match
    })
}
