use image::ImageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source returned no data")]
    Empty,

    #[error("Unsupported locator scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(String),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Decoder produced no image")]
    Empty,

    #[error("Invalid dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("Decode worker failed: {0}")]
    Worker(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DownsampleError {
    #[error("Failed to fetch image: {0}")]
    FetchFailed(String),

    #[error("Failed to downsample image: {0}")]
    DecodeFailed(String),

    #[error("Resolve cancelled")]
    Cancelled,
}

impl From<FetchError> for DownsampleError {
    fn from(err: FetchError) -> Self {
        Self::FetchFailed(err.to_string())
    }
}

impl From<DecodeError> for DownsampleError {
    fn from(err: DecodeError) -> Self {
        Self::DecodeFailed(err.to_string())
    }
}

pub type DownsampleResult<T> = Result<T, DownsampleError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Downsample error: {0}")]
    Downsample(#[from] DownsampleError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type AppResult<T> = Result<T, AppError>;
