use std::fmt;
use std::str::FromStr;

/// Which encoder output becomes the article embedding.
///
/// `Cls` takes the hidden state of the first token from the last encoder
/// layer. `Pooled` additionally runs that hidden state through the
/// checkpoint's pooler head (dense + tanh), and is only available when the
/// checkpoint ships pooler weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbeddingSource {
    /// Last-layer hidden state of the `[CLS]` token.
    #[default]
    Cls,
    /// Pooler output (`tanh(W * cls + b)`).
    Pooled,
}

impl EmbeddingSource {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingSource::Cls => "cls",
            EmbeddingSource::Pooled => "pooled",
        }
    }
}

impl fmt::Display for EmbeddingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown embedding source name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEmbeddingSourceError {
    value: String,
}

impl fmt::Display for ParseEmbeddingSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown embedding source '{}': expected 'cls' or 'pooled'",
            self.value
        )
    }
}

impl std::error::Error for ParseEmbeddingSourceError {}

impl FromStr for EmbeddingSource {
    type Err = ParseEmbeddingSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cls" => Ok(EmbeddingSource::Cls),
            "pooled" => Ok(EmbeddingSource::Pooled),
            _ => Err(ParseEmbeddingSourceError {
                value: s.to_string(),
            }),
        }
    }
}
