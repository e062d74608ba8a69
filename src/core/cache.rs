use crate::image::{raster::DecodedImage, size::TargetSize};
use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use std::{
    fmt,
    hash::{Hash, Hasher},
};

#[derive(Clone, Debug)]
pub struct CacheKey {
    locator: String,
    width: f64,
    height: f64,
}

impl CacheKey {
    pub fn new(locator: &str, size: &TargetSize) -> Self {
        Self {
            locator: locator.to_string(),
            width: size.target_width().unwrap_or(0.0),
            height: size.target_height().unwrap_or(0.0),
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

// -0.0 and 0.0 must land on the same key.
fn dimension_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.locator == other.locator
            && dimension_bits(self.width) == dimension_bits(other.width)
            && dimension_bits(self.height) == dimension_bits(other.height)
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.locator.hash(state);
        dimension_bits(self.width).hash(state);
        dimension_bits(self.height).hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.locator, self.width, self.height)
    }
}

struct CacheEntry {
    image: DecodedImage,
    cost: usize,
}

struct Inner {
    entries: LruCache<CacheKey, CacheEntry>,
    total_cost: usize,
    count_limit: usize,
    total_cost_limit: usize,
}

impl Inner {
    fn over_limits(&self) -> bool {
        (self.count_limit > 0 && self.entries.len() > self.count_limit)
            || (self.total_cost_limit > 0 && self.total_cost > self.total_cost_limit)
    }

    fn evict(&mut self) {
        while self.over_limits() {
            let Some((key, entry)) = self.entries.pop_lru() else {
                break;
            };
            self.total_cost -= entry.cost;
            debug!("Evicted {} (cost {})", key, entry.cost);
        }
    }

    fn take(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.pop(key)?;
        self.total_cost -= entry.cost;
        Some(entry)
    }
}

pub struct BoundedImageCache {
    inner: Mutex<Inner>,
}

impl Default for BoundedImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedImageCache {
    pub fn new() -> Self {
        Self::with_limits(0, 0)
    }

    pub fn with_limits(count_limit: usize, total_cost_limit: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                total_cost: 0,
                count_limit,
                total_cost_limit,
            }),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<DecodedImage> {
        self.inner
            .lock()
            .entries
            .get(key)
            .map(|entry| entry.image.clone())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock().entries.contains(key)
    }

    pub fn set(&self, key: CacheKey, image: DecodedImage) {
        let cost = image.cost();
        self.set_with_cost(key, image, cost);
    }

    pub fn set_with_cost(&self, key: CacheKey, image: DecodedImage, cost: usize) {
        let mut inner = self.inner.lock();
        inner.take(&key);

        if inner.total_cost_limit > 0 && cost > inner.total_cost_limit {
            debug!(
                "Not caching {}: cost {} exceeds limit {}",
                key, cost, inner.total_cost_limit
            );
            return;
        }

        inner.entries.put(key, CacheEntry { image, cost });
        inner.total_cost += cost;
        inner.evict();
    }

    pub fn remove(&self, key: &CacheKey) -> Option<DecodedImage> {
        self.inner.lock().take(key).map(|entry| entry.image)
    }

    pub fn set_limits(&self, count_limit: usize, total_cost_limit: usize) {
        let mut inner = self.inner.lock();
        inner.count_limit = count_limit;
        inner.total_cost_limit = total_cost_limit;
        inner.evict();
    }

    /// Returns `(count_limit, total_cost_limit)`.
    pub fn limits(&self) -> (usize, usize) {
        let inner = self.inner.lock();
        (inner.count_limit, inner.total_cost_limit)
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.total_cost = 0;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_cost(&self) -> usize {
        self.inner.lock().total_cost
    }
}
