pub mod core {
    pub mod cache;
    pub mod coordinator;
    pub mod stats;
}

pub mod utils {
    pub mod cli;
    pub mod error;
}

pub mod image {
    pub mod decoder;
    pub mod loader;
    pub mod raster;
    pub mod size;
    pub mod transform;
}

pub use crate::core::{
    cache::{BoundedImageCache, CacheKey},
    coordinator::{CoordinatorConfig, DownsampleCoordinator},
    stats::CoordinatorStats,
};
pub use crate::image::{
    decoder::{Downscaler, ThumbnailDownscaler},
    loader::{FileSource, ImageSource, LocatorSource},
    raster::DecodedImage,
    size::TargetSize,
};
pub use crate::utils::error::{
    AppError, AppResult, DecodeError, DownsampleError, DownsampleResult, FetchError,
};

#[cfg(feature = "http")]
pub use crate::image::loader::HttpSource;
