/// Inputs shorter than this get no suggestions.
pub const MIN_INPUT_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 5;

/// Suggestion list with a keyboard highlight.
#[derive(Debug, Default)]
pub struct Suggestions {
    items: Vec<String>,
    selected: Option<usize>,
}

impl Suggestions {
    /// Refilters `labels` for `input` and clears the highlight.
    pub fn update(&mut self, labels: &[String], input: &str) {
        self.selected = None;
        self.items.clear();

        if input.trim().chars().count() < MIN_INPUT_CHARS {
            return;
        }

        let needle = input.trim().to_lowercase();
        self.items = labels
            .iter()
            .filter(|label| label.to_lowercase().contains(&needle))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = match self.selected {
            None => Some(0),
            Some(i) => Some((i + 1).min(self.items.len() - 1)),
        };
    }

    pub fn up(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        }
    }

    /// Takes the highlighted item, if any, and empties the list.
    pub fn commit(&mut self) -> Option<String> {
        let chosen = self.selected.and_then(|i| self.items.get(i).cloned());
        self.clear();
        chosen
    }

    /// Picks item `index` directly, as a click would.
    pub fn pick(&mut self, index: usize) -> Option<String> {
        let chosen = self.items.get(index).cloned();
        self.clear();
        chosen
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = None;
    }
}
