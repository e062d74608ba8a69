use crate::utils::error::FetchError;
use async_trait::async_trait;
use log::debug;
use std::{path::PathBuf, sync::Arc};
use url::{ParseError, Url};

const FILE_SCHEME: &str = "file";

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl<T: ImageSource + ?Sized> ImageSource for Arc<T> {
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_bytes(locator).await
    }
}

enum Locator {
    Path(PathBuf),
    Url(Url),
}

impl Locator {
    fn parse(locator: &str) -> Result<Self, FetchError> {
        match Url::parse(locator) {
            Ok(url) => Ok(Self::Url(url)),
            Err(ParseError::RelativeUrlWithoutBase) => Ok(Self::Path(PathBuf::from(locator))),
            Err(err) => Err(FetchError::InvalidLocator(format!("{}: {}", locator, err))),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl FileSource {
    pub fn path_for(locator: &str) -> Result<PathBuf, FetchError> {
        match Locator::parse(locator)? {
            Locator::Path(path) => Ok(path),
            Locator::Url(url) if url.scheme() == FILE_SCHEME => url
                .to_file_path()
                .map_err(|_| FetchError::InvalidLocator(locator.to_string())),
            Locator::Url(url) => Err(FetchError::UnsupportedScheme(url.scheme().to_string())),
        }
    }
}

#[async_trait]
impl ImageSource for FileSource {
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let path = Self::path_for(locator)?;
        debug!("Reading {}", path.display());
        let bytes = tokio::fs::read(&path).await?;
        if bytes.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(bytes)
    }
}

#[cfg(feature = "http")]
#[derive(Debug, Default, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ImageSource for HttpSource {
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        debug!("Downloading {}", locator);
        let response = self.client.get(locator).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LocatorSource {
    file: FileSource,
    #[cfg(feature = "http")]
    http: HttpSource,
}

impl LocatorSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageSource for LocatorSource {
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let url = match Locator::parse(locator)? {
            Locator::Path(_) => return self.file.fetch_bytes(locator).await,
            Locator::Url(url) => url,
        };

        match url.scheme() {
            FILE_SCHEME => self.file.fetch_bytes(locator).await,
            #[cfg(feature = "http")]
            "http" | "https" => self.http.fetch_bytes(locator).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}
