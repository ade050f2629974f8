//! Category Encoding Module
//! Explicit integer codes for categorical text columns.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Code assigned to missing (and unseen) values.
pub const MISSING_CODE: i32 = -1;

/// Bidirectional mapping between the distinct values of one column and
/// integer codes.
///
/// Codes are assigned in ascending sorted order of the distinct values, so
/// they are stable within one run over the same data but are not a
/// persisted contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCodes {
    categories: Vec<String>,
    index: HashMap<String, i32>,
}

impl CategoryCodes {
    /// Build the mapping from the observed values of a column.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();
        let categories: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let index = categories
            .iter()
            .enumerate()
            .map(|(code, value)| (value.clone(), code as i32))
            .collect();

        Self { categories, index }
    }

    pub fn encode(&self, value: Option<&str>) -> i32 {
        value
            .and_then(|v| self.index.get(v).copied())
            .unwrap_or(MISSING_CODE)
    }

    pub fn decode(&self, code: i32) -> Option<&str> {
        if code < 0 {
            return None;
        }
        self.categories.get(code as usize).map(String::as_str)
    }

    /// Distinct non-missing values in code order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Category codes for every encoded column, keyed by column name.
pub type CategoryEncodings = BTreeMap<String, CategoryCodes>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_sorted_order() {
        let codes = CategoryCodes::from_values([Some("Games"), Some("Books"), None, Some("Games")]);
        assert_eq!(codes.categories(), &["Books", "Games"]);
        assert_eq!(codes.encode(Some("Books")), 0);
        assert_eq!(codes.encode(Some("Games")), 1);
        assert_eq!(codes.encode(None), MISSING_CODE);
    }

    #[test]
    fn encode_decode_is_a_bijection() {
        let values = [Some("b"), Some("a"), Some("c"), None, Some("a")];
        let codes = CategoryCodes::from_values(values);

        let mut seen = BTreeSet::new();
        for value in values {
            let code = codes.encode(value);
            assert_eq!(codes.decode(code), value);
            seen.insert(code);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![-1, 0, 1, 2]);
    }

    #[test]
    fn unseen_values_map_to_missing() {
        let codes = CategoryCodes::from_values([Some("x")]);
        assert_eq!(codes.encode(Some("y")), MISSING_CODE);
        assert_eq!(codes.decode(5), None);
        assert_eq!(codes.len(), 1);
        assert!(!codes.is_empty());
    }
}
