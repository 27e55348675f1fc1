#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("cannot decode event: {0}")]
    Decode(#[from] serde_json::Error),
}
