use serde::{Deserialize, Serialize};

/// Insertion-ordered set of filter values, as toggled from the facet sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-joined query-string value, dropping empty items.
    pub fn from_csv(input: &str) -> Self {
        let mut set = FilterSet::new();
        for item in input.split(',') {
            let item = item.trim();
            if !item.is_empty() && !set.contains(item) {
                set.0.push(item.to_string());
            }
        }
        set
    }

    pub fn to_csv(&self) -> String {
        self.0.join(",")
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|item| item == value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn toggle(&mut self, value: &str) {
        match self.0.iter().position(|item| item == value) {
            Some(pos) => {
                self.0.remove(pos);
            }
            None => self.0.push(value.to_string()),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for FilterSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for value in iter {
            let value = value.into();
            if !set.contains(&value) {
                set.0.push(value);
            }
        }
        set
    }
}

/// Adds `value` when absent, removes it when present. Removal keeps the
/// order of the remaining values.
pub fn toggle_set_filter(mut filter_set: FilterSet, value: &str) -> FilterSet {
    filter_set.toggle(value);
    filter_set
}

/// Single-valued counterpart of [`toggle_set_filter`]: selecting the active
/// value clears it.
pub fn toggle_modified_filter(current: Option<&str>, value: &str) -> Option<String> {
    if current == Some(value) {
        None
    } else {
        Some(value.to_string())
    }
}
