use crate::query::DocumentQuery;

/// Prefix of synthesized ids given to label/description targets.
pub const ID_PREFIX: &str = "acfy-id-";

/// How long the label-id counter lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CounterScope {
    /// Restart at `acfy-id-0` on every reconciliation pass.
    #[default]
    PerCall,
    /// Keep counting across passes made with the same reconciler.
    PerPage,
}

/// Generator of `acfy-id-<n>` identifiers.
#[derive(Debug, Clone, Default)]
pub struct LabelIds {
    next: usize,
}

impl LabelIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// The next id not already used in `document`.
    pub fn next_id<D: DocumentQuery + ?Sized>(&mut self, document: &D) -> String {
        loop {
            let id = format!("{}{}", ID_PREFIX, self.next);
            self.next += 1;
            if !document.contains_id(&id) {
                return id;
            }
        }
    }

    /// How many counter values have been consumed since the last reset.
    pub fn issued(&self) -> usize {
        self.next
    }
}
