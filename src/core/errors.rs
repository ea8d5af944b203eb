use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error("pdf error: {0}")]
    Pdf(String),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("xml error: {0}")]
    Xml(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::Pdf(_) => "PDF_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Xml(_) => "XML_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::HttpStatus(_) => "HTTP_STATUS",
            Self::Timeout => "TIMEOUT",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Spreadsheet(value.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout
        } else if let Some(status) = value.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::Network(value.to_string())
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
