use crate::core::candidate::Candidate;

/// Result of matching a query against the candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    /// Candidates whose name contains the query, in input order.
    pub matches: Vec<Candidate>,
    /// Name of the first match when the query is a prefix of it, else empty.
    pub completion: String,
}

impl Suggestion {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Part of the completion the user has not typed yet. Empty when there is
    /// no completion or when `query` already covers it.
    pub fn remainder<'a>(&'a self, query: &str) -> &'a str {
        self.completion.strip_prefix(query).unwrap_or("")
    }
}

/// Filters `candidates` by case-sensitive substring containment and derives
/// the ghost completion from the first hit.
///
/// An empty query never matches anything. Order and duplicates are kept as
/// given; identity lives in `Candidate::id`, not the name.
pub fn suggest(query: &str, candidates: &[Candidate]) -> Suggestion {
    let matches: Vec<Candidate> = if query.is_empty() {
        Vec::new()
    } else {
        candidates
            .iter()
            .filter(|candidate| candidate.name.contains(query))
            .cloned()
            .collect()
    };

    let top = matches.first().map(|c| c.name.as_str()).unwrap_or("");
    let completion = if top.starts_with(query) {
        top.to_string()
    } else {
        String::new()
    };

    Suggestion {
        matches,
        completion,
    }
}
