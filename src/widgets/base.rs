#[derive(Debug, Clone)]
pub struct ComponentBase {
    id: String,
    label: String,
}

impl ComponentBase {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn focus_marker(&self, focused: bool) -> &'static str {
        if focused { ">" } else { " " }
    }

    /// `"> Label: "`, or an empty prefix for an unlabeled component.
    pub fn prompt(&self, focused: bool) -> String {
        if self.label.is_empty() {
            return String::new();
        }
        format!("{} {}: ", self.focus_marker(focused), self.label)
    }
}
