//! Autocomplete over the location hierarchy

use std::collections::HashSet;

use crate::locations::LocationIndex;

/// Substring search returning display strings in declaration order
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine {
    index: &'static LocationIndex,
}

impl SearchEngine {
    pub fn new(index: &'static LocationIndex) -> Self {
        Self { index }
    }

    /// Every region followed by its `"District, Region"` entries
    pub fn all_locations(&self) -> Vec<String> {
        let mut results = Vec::new();
        for region in self.index.regions() {
            results.push(region.name.to_string());
            for district in region.districts {
                results.push(format!("{district}, {}", region.name));
            }
        }
        dedup(results)
    }

    /// A candidate matches when every whitespace-separated word of `term`
    /// occurs in its display text, ignoring case. Blank terms list everything.
    pub fn search(&self, term: &str) -> Vec<String> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.all_locations();
        }

        let words: Vec<&str> = term.split_whitespace().collect();
        let matches = |text: &str| {
            let text = text.to_lowercase();
            words.iter().all(|word| text.contains(word))
        };

        let mut results = Vec::new();
        let primary = self.index.primary();
        for district in primary.districts {
            let candidate = format!("{district}, {}", primary.name);
            if matches(&candidate) {
                results.push(candidate);
            }
        }

        for region in self.index.regions() {
            if matches(region.name) {
                results.push(region.name.to_string());
            }
            for district in region.districts {
                let candidate = format!("{district}, {}", region.name);
                if matches(&candidate) {
                    results.push(candidate);
                }
            }
        }

        dedup(results)
    }
}

/// Drop later repeats, keeping first-occurrence order
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
