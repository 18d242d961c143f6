//! The public label table.
//!
//! The classifier emits a class index; callers see a string. The mapping
//! between the two lives in exactly one place (this table) and is never
//! inferred from probability magnitudes or from whichever code path happens
//! to run.
//!
//! Default polarity: index `0` → `"fake"`, index `1` → `"true"` (the two
//! labels in lexicographic order, matching how common training stacks order
//! string class labels at fit time). Deployments whose classifier was trained
//! with the opposite convention override the table via `VERITAS_LABELS`.

use std::str::FromStr;

use thiserror::Error;

use crate::constants::NUM_CLASSES;

/// Public label for the "fabricated article" class.
pub const LABEL_FAKE: &str = "fake";
/// Public label for the "genuine article" class.
pub const LABEL_TRUE: &str = "true";

/// Explicit index → label mapping returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            labels: vec![LABEL_FAKE.to_string(), LABEL_TRUE.to_string()],
        }
    }
}

impl LabelMap {
    /// Builds a table from labels in class-index order.
    pub fn new<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        if labels.len() != NUM_CLASSES {
            return Err(LabelError::WrongCount {
                expected: NUM_CLASSES,
                actual: labels.len(),
            });
        }

        for (index, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(LabelError::EmptyLabel { index });
            }
        }

        for (index, label) in labels.iter().enumerate() {
            if labels[..index].contains(label) {
                return Err(LabelError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }

        Ok(Self { labels })
    }

    /// Returns the public label for a class index, or `None` when the index
    /// falls outside the table.
    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of classes in the table.
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Labels in class-index order.
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl FromStr for LabelMap {
    type Err = LabelError;

    /// Parses a comma-separated table, e.g. `"fake,true"` or `"true,fake"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(',').map(str::trim))
    }
}

impl std::fmt::Display for LabelMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.labels.join(","))
    }
}

/// Errors from building or parsing a label table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// Table must cover every class index exactly once.
    #[error("expected {expected} labels, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    /// Empty strings make responses ambiguous.
    #[error("label for class index {index} is empty")]
    EmptyLabel { index: usize },

    /// Two indices mapping to one string would make the verdict meaningless.
    #[error("duplicate label '{label}'")]
    DuplicateLabel { label: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polarity() {
        let labels = LabelMap::default();
        assert_eq!(labels.label_for(0), Some("fake"));
        assert_eq!(labels.label_for(1), Some("true"));
    }

    #[test]
    fn test_index_out_of_range() {
        let labels = LabelMap::default();
        assert_eq!(labels.label_for(2), None);
    }

    #[test]
    fn test_parse_default_order() {
        let labels: LabelMap = "fake,true".parse().expect("should parse");
        assert_eq!(labels, LabelMap::default());
    }

    #[test]
    fn test_parse_inverted_order() {
        let labels: LabelMap = "true,fake".parse().expect("should parse");
        assert_eq!(labels.label_for(0), Some("true"));
        assert_eq!(labels.label_for(1), Some("fake"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let labels: LabelMap = " fake , true ".parse().expect("should parse");
        assert_eq!(labels.label_for(0), Some("fake"));
        assert_eq!(labels.label_for(1), Some("true"));
    }

    #[test]
    fn test_parse_wrong_count() {
        let err = "fake".parse::<LabelMap>().unwrap_err();
        assert_eq!(
            err,
            LabelError::WrongCount {
                expected: NUM_CLASSES,
                actual: 1,
            }
        );

        let err = "a,b,c".parse::<LabelMap>().unwrap_err();
        assert!(matches!(err, LabelError::WrongCount { actual: 3, .. }));
    }

    #[test]
    fn test_parse_empty_label() {
        let err = "fake,".parse::<LabelMap>().unwrap_err();
        assert_eq!(err, LabelError::EmptyLabel { index: 1 });
    }

    #[test]
    fn test_parse_duplicate_label() {
        let err = "fake,fake".parse::<LabelMap>().unwrap_err();
        assert_eq!(
            err,
            LabelError::DuplicateLabel {
                label: "fake".to_string(),
            }
        );
    }

    #[test]
    fn test_display_round_trip() {
        let labels: LabelMap = "true,fake".parse().expect("should parse");
        assert_eq!(labels.to_string(), "true,fake");
        let reparsed: LabelMap = labels.to_string().parse().expect("should reparse");
        assert_eq!(labels, reparsed);
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = LabelError::WrongCount {
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("2"));
        assert!(err.to_string().contains("3"));

        let err = LabelError::DuplicateLabel {
            label: "fake".to_string(),
        };
        assert!(err.to_string().contains("fake"));
    }
}
