//! Row records handed from the streamer to the output sink.

/// One converted row: `(column name, text)` pairs in schema order.
///
/// `None` is SQL NULL and is never conflated with an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowRecord {
    cells: Vec<(String, Option<String>)>,
}

impl RowRecord {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { cells: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, name: &str, value: Option<String>) {
        self.cells.push((name.to_string(), value));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at position `index`; outer `None` when out of range.
    pub fn value(&self, index: usize) -> Option<Option<&str>> {
        self.cells.get(index).map(|(_, v)| v.as_deref())
    }

    /// Value of the first cell named `name`.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.cells.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }
}
