use serde::{Deserialize, Serialize};

/// One searchable entry. `id` is opaque and carries identity; `name` is what
/// the query is matched against and what the list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Candidate;

    #[test]
    fn decodes_records_and_ignores_extra_fields() {
        let raw = r#"[{"id":"1","name":"Plumbing","icon":"wrench"},{"id":"2","name":"Painting"}]"#;
        let parsed: Vec<Candidate> = serde_json::from_str(raw).expect("candidates should decode");
        assert_eq!(
            parsed,
            vec![
                Candidate::new("1", "Plumbing"),
                Candidate::new("2", "Painting")
            ]
        );
    }

    #[test]
    fn missing_name_is_rejected() {
        let raw = r#"[{"id":"1"}]"#;
        assert!(serde_json::from_str::<Vec<Candidate>>(raw).is_err());
    }
}
