use crate::{
    core::{
        cache::{BoundedImageCache, CacheKey},
        stats::{CoordinatorStats, Stats},
    },
    image::{
        decoder::{Downscaler, ThumbnailDownscaler},
        loader::{ImageSource, LocatorSource},
        raster::DecodedImage,
        size::TargetSize,
    },
    utils::error::{DecodeError, DownsampleError, DownsampleResult, FetchError},
};
use dashmap::{mapref::entry::Entry, DashMap};
use log::{debug, warn};
use std::{future::Future, sync::Arc};
use tokio::sync::watch;

type Outcome = Option<DownsampleResult<DecodedImage>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorConfig {
    pub count_limit: usize,
    pub total_cost_limit: usize,
}

impl CoordinatorConfig {
    pub fn new(count_limit: usize, total_cost_limit: usize) -> Self {
        Self {
            count_limit,
            total_cost_limit,
        }
    }
}

enum Lookup {
    Ready(DecodedImage),
    Pending(watch::Receiver<Outcome>),
}

struct Shared {
    cache: BoundedImageCache,
    in_flight: DashMap<CacheKey, watch::Receiver<Outcome>>,
    source: Arc<dyn ImageSource>,
    downscaler: Arc<dyn Downscaler>,
    stats: Stats,
}

struct InFlightGuard {
    shared: Arc<Shared>,
    key: CacheKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.shared.in_flight.remove(&self.key);
    }
}

impl Shared {
    async fn fetch_and_decode(
        &self,
        key: &CacheKey,
        max_pixel_dimension: f64,
    ) -> DownsampleResult<DecodedImage> {
        let bytes = self.source.fetch_bytes(key.locator()).await?;
        if bytes.is_empty() {
            return Err(FetchError::Empty.into());
        }

        let downscaler = Arc::clone(&self.downscaler);
        let image = tokio::task::spawn_blocking(move || {
            downscaler.decode_and_scale(&bytes, max_pixel_dimension)
        })
        .await
        .map_err(|err| DecodeError::Worker(err.to_string()))??;

        Ok(image)
    }

    async fn run(
        self: Arc<Self>,
        key: CacheKey,
        max_pixel_dimension: f64,
        sender: watch::Sender<Outcome>,
    ) {
        let guard = InFlightGuard {
            shared: Arc::clone(&self),
            key,
        };
        let key = &guard.key;

        debug!("Decoding {} at {}px", key, max_pixel_dimension);
        let outcome = self.fetch_and_decode(key, max_pixel_dimension).await;

        match &outcome {
            Ok(image) => {
                self.stats.record_decode();
                self.cache.set(key.clone(), image.clone());
            }
            Err(err) => {
                self.stats.record_failure();
                warn!("Failed to resolve {}: {}", key, err);
            }
        }

        drop(guard);
        sender.send_replace(Some(outcome));
    }
}

#[derive(Clone)]
pub struct DownsampleCoordinator {
    shared: Arc<Shared>,
}

impl DownsampleCoordinator {
    pub fn new(source: impl ImageSource + 'static, downscaler: impl Downscaler + 'static) -> Self {
        Self::with_config(source, downscaler, CoordinatorConfig::default())
    }

    pub fn with_config(
        source: impl ImageSource + 'static,
        downscaler: impl Downscaler + 'static,
        config: CoordinatorConfig,
    ) -> Self {
        Self::from_shared(Arc::new(source), Arc::new(downscaler), config)
    }

    pub fn from_shared(
        source: Arc<dyn ImageSource>,
        downscaler: Arc<dyn Downscaler>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                cache: BoundedImageCache::with_limits(config.count_limit, config.total_cost_limit),
                in_flight: DashMap::new(),
                source,
                downscaler,
                stats: Stats::default(),
            }),
        }
    }

    pub fn standard(config: CoordinatorConfig) -> Self {
        Self::with_config(LocatorSource::new(), ThumbnailDownscaler, config)
    }

    pub async fn resolve(&self, locator: &str, size: TargetSize) -> DownsampleResult<DecodedImage> {
        let key = CacheKey::new(locator, &size);

        if let Some(image) = self.shared.cache.get(&key) {
            self.shared.stats.record_hit();
            debug!("Cache hit for {}", key);
            return Ok(image);
        }

        match self.lookup(key, size.max_pixel_dimension()) {
            Lookup::Ready(image) => Ok(image),
            Lookup::Pending(receiver) => Self::wait(receiver).await,
        }
    }

    /// Returns `Cancelled` once `cancel` completes. The shared decode keeps running.
    pub async fn resolve_with_cancel<F>(
        &self,
        locator: &str,
        size: TargetSize,
        cancel: F,
    ) -> DownsampleResult<DecodedImage>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            result = self.resolve(locator, size) => result,
            _ = cancel => {
                debug!("Resolve of {} cancelled", locator);
                Err(DownsampleError::Cancelled)
            }
        }
    }

    fn lookup(&self, key: CacheKey, max_pixel_dimension: f64) -> Lookup {
        let (key, receiver, sender) = match self.shared.in_flight.entry(key) {
            Entry::Occupied(entry) => {
                self.shared.stats.record_coalesced();
                debug!("Joining in-flight decode for {}", entry.key());
                return Lookup::Pending(entry.get().clone());
            }
            Entry::Vacant(entry) => {
                if let Some(image) = self.shared.cache.get(entry.key()) {
                    self.shared.stats.record_hit();
                    return Lookup::Ready(image);
                }

                self.shared.stats.record_miss();
                let key = entry.key().clone();
                let (sender, receiver) = watch::channel(None);
                entry.insert(receiver.clone());
                (key, receiver, sender)
            }
        };

        tokio::spawn(Shared::run(
            Arc::clone(&self.shared),
            key,
            max_pixel_dimension,
            sender,
        ));
        Lookup::Pending(receiver)
    }

    async fn wait(mut receiver: watch::Receiver<Outcome>) -> DownsampleResult<DecodedImage> {
        let outcome = receiver
            .wait_for(Option::is_some)
            .await
            .map_err(|_| DownsampleError::Cancelled)?;

        match &*outcome {
            Some(result) => result.clone(),
            None => Err(DownsampleError::Cancelled),
        }
    }

    /// 0 disables a limit.
    pub fn set_cache_limits(&self, count_limit: usize, total_cost_limit: usize) {
        self.shared.cache.set_limits(count_limit, total_cost_limit);
    }

    pub fn clear_cache(&self) {
        debug!("Clearing {} cached images", self.shared.cache.len());
        self.shared.cache.clear();
    }

    pub fn cache(&self) -> &BoundedImageCache {
        &self.shared.cache
    }

    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.len()
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.shared.stats.snapshot()
    }
}
