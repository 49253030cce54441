/// Accordion-style coordinator: at most one panel is expanded at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: Option<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.open.as_deref() == Some(id)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Open `id`, closing whichever panel was open; closes `id` if it already was.
    pub fn toggle(&mut self, id: &str) {
        if self.is_expanded(id) {
            self.open = None;
        } else {
            self.open = Some(id.to_string());
        }
    }

    /// Close `id` if it is the open panel.
    pub fn close(&mut self, id: &str) {
        if self.is_expanded(id) {
            self.open = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/expansion.rs"]
mod tests;
