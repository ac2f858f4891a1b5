use thiserror::Error;

#[derive(Error, Debug)]
pub enum HrError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Mail transport error: {0}")]
    Mail(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type HrResult<T> = Result<T, HrError>;
