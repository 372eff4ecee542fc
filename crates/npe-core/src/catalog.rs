use std::collections::HashSet;

use crate::error::CoreError;

/// An ordered allow-list of labels for a constrained field.
///
/// Membership is exact and case-sensitive. A catalog is never empty and never
/// contains the same label twice; both are checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    name: String,
    entries: Vec<String>,
}

impl Catalog {
    pub fn new<I, S>(name: impl Into<String>, entries: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();

        if entries.is_empty() {
            return Err(CoreError::EmptyCatalog(name));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.as_str()) {
                return Err(CoreError::DuplicateEntry {
                    catalog: name,
                    entry: entry.clone(),
                });
            }
        }

        Ok(Self { name, entries })
    }

    /// Display name used as the heading when the catalog is enumerated in a
    /// prompt, e.g. `"DIAGNOSES"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every entry as a `- label` line, in catalog order.
    pub fn bullet_list(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("- {e}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
