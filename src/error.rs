use thiserror::Error;

pub type OrderResult<T> = Result<T, OrderError>;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("No items provided")]
    EmptyInput,

    #[error("Ledger has {lines} lines but {items} items were supplied")]
    LedgerMismatch { items: usize, lines: usize },

    #[error("Order totals out of range: {0} is not a finite number")]
    OutOfRange(String),

    #[error("Failed to encode workbook: {0}")]
    Encoding(String),

    #[error("Invalid order: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rust_xlsxwriter::XlsxError> for OrderError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        OrderError::Encoding(err.to_string())
    }
}

/// Why a single item's photo could not be embedded.
///
/// Never aborts a build: the row gets a marker instead of a thumbnail.
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("photo payload is empty")]
    MissingPayload,

    #[error("photo payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("photo declared as {declared} but payload is not a {declared} image")]
    FormatMismatch { declared: &'static str },

    #[error("photo could not be embedded: {0}")]
    Image(String),
}
