use std::collections::HashMap;

use crate::error::BuildError;

use super::Record;

/// Ordered, id-unique collection of records
///
/// A record's position is the coordinate used by the vector space and the
/// similarity index built from this corpus.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
    by_id: HashMap<i64, usize>,
    /// Normalized title -> first position carrying it
    by_title: HashMap<String, usize>,
}

/// Key used for case-insensitive title lookup
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

impl Corpus {
    /// Creates a corpus, rejecting duplicate ids
    pub fn new(records: Vec<Record>) -> Result<Self, BuildError> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_title = HashMap::with_capacity(records.len());

        for (pos, record) in records.iter().enumerate() {
            if by_id.insert(record.id, pos).is_some() {
                return Err(BuildError::DuplicateId(record.id));
            }
            by_title.entry(title_key(&record.title)).or_insert(pos);
        }

        Ok(Self {
            records,
            by_id,
            by_title,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn position_of_id(&self, id: i64) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// First position whose title matches case-insensitively
    pub fn position_of_title(&self, title: &str) -> Option<usize> {
        self.by_title.get(&title_key(title)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_ids() {
        let records = vec![Record::new(1, "A", ""), Record::new(1, "B", "")];
        assert_eq!(Corpus::new(records).unwrap_err(), BuildError::DuplicateId(1));
    }

    #[test]
    fn test_title_lookup_is_case_insensitive_and_first_wins() {
        let corpus = Corpus::new(vec![
            Record::new(10, "Clone", "first"),
            Record::new(11, "Other", ""),
            Record::new(12, "CLONE", "second"),
        ])
        .unwrap();

        assert_eq!(corpus.position_of_title("clone"), Some(0));
        assert_eq!(corpus.position_of_title("  Clone "), Some(0));
        assert_eq!(corpus.position_of_title("missing"), None);
        assert_eq!(corpus.position_of_id(12), Some(2));
        assert_eq!(corpus.get(2).unwrap().text, "second");
    }
}
