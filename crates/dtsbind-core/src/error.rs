use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid translation unit: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),
}
