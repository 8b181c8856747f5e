use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("pdf export failed: {0}")]
    Pdf(String),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("rasterization failed: {0}")]
    Raster(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<printpdf::Error> for Error {
    fn from(err: printpdf::Error) -> Self {
        Error::Pdf(format!("{err:?}"))
    }
}
