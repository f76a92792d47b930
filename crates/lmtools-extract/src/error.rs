use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected character '{found}' at offset {offset} in selector `{selector}`")]
    UnexpectedChar {
        selector: String,
        found: char,
        offset: usize,
    },

    #[error("Unterminated attribute selector in `{0}`")]
    UnterminatedAttribute(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("Document unavailable: {0}")]
    Document(String),

    #[error("Failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
