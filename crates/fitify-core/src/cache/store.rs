use super::key::CacheKey;
use super::record::GeneratedImage;
use crate::image::ImageRef;
use lru::LruCache;
use std::num::NonZeroUsize;

/// How many entries the in-memory cache may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheCapacity {
    /// No eviction.
    #[default]
    Unbounded,
    /// Least-recently-used eviction above this many entries.
    Bounded(NonZeroUsize),
}

impl CacheCapacity {
    /// `None` and `Some(0)` both mean unbounded.
    pub fn from_limit(limit: Option<usize>) -> Self {
        limit
            .and_then(NonZeroUsize::new)
            .map(Self::Bounded)
            .unwrap_or(Self::Unbounded)
    }
}

/// Memoization of generation results, keyed by [`CacheKey`].
///
/// Written only after a successful generation or when restored from the
/// persisted history. The core never invalidates entries.
pub struct GenerationCache {
    entries: LruCache<CacheKey, ImageRef>,
    capacity: CacheCapacity,
}

impl GenerationCache {
    pub fn new(capacity: CacheCapacity) -> Self {
        let entries = match capacity {
            CacheCapacity::Unbounded => LruCache::unbounded(),
            CacheCapacity::Bounded(cap) => LruCache::new(cap),
        };
        Self { entries, capacity }
    }

    /// Builds a cache pre-filled from persisted history.
    ///
    /// Records are replayed oldest first, so for duplicate keys the newest
    /// record wins and recent records are the last to be evicted.
    pub fn restore<I>(capacity: CacheCapacity, records: I) -> Self
    where
        I: IntoIterator<Item = GeneratedImage>,
    {
        let mut cache = Self::new(capacity);
        for record in records {
            let key = record.cache_key();
            cache.store(key, record.generated_image);
        }
        cache
    }

    pub fn capacity(&self) -> CacheCapacity {
        self.capacity
    }

    /// Returns the cached image for `key`, marking it recently used.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<ImageRef> {
        self.entries.get(key).cloned()
    }

    /// Returns the cached image without touching recency.
    pub fn peek(&self, key: &CacheKey) -> Option<&ImageRef> {
        self.entries.peek(key)
    }

    /// Inserts or overwrites the entry for `key` (last write wins).
    pub fn store(&mut self, key: CacheKey, image: ImageRef) {
        self.entries.put(key, image);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GenerationCache {
    fn default() -> Self {
        Self::new(CacheCapacity::Unbounded)
    }
}

impl std::fmt::Debug for GenerationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NewGeneratedImage;
    use crate::image::ImageIdentity;
    use crate::pose::Pose;

    fn key(garment: &str) -> CacheKey {
        CacheKey::garment(ImageIdentity::from_content(b"me"), garment, &Pose::new("P0"))
    }

    #[test]
    fn test_store_then_lookup() {
        let mut cache = GenerationCache::default();
        assert!(cache.lookup(&key("g1")).is_none());

        cache.store(key("g1"), ImageRef::new("img1"));
        assert_eq!(cache.lookup(&key("g1")), Some(ImageRef::new("img1")));
        assert!(cache.lookup(&key("g2")).is_none());
    }

    #[test]
    fn test_store_is_idempotent_and_last_write_wins() {
        let mut cache = GenerationCache::default();
        cache.store(key("g1"), ImageRef::new("img1"));
        cache.store(key("g1"), ImageRef::new("img1"));
        assert_eq!(cache.len(), 1);

        cache.store(key("g1"), ImageRef::new("img1-v2"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&key("g1")), Some(ImageRef::new("img1-v2")));
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut cache = GenerationCache::new(CacheCapacity::from_limit(None));
        for i in 0..500 {
            cache.store(key(&format!("g{i}")), ImageRef::new(format!("img{i}")));
        }
        assert_eq!(cache.len(), 500);
        assert!(cache.contains(&key("g0")));
    }

    #[test]
    fn test_bounded_evicts_least_recently_used() {
        let mut cache = GenerationCache::new(CacheCapacity::from_limit(Some(2)));
        cache.store(key("g1"), ImageRef::new("img1"));
        cache.store(key("g2"), ImageRef::new("img2"));
        // touch g1 so g2 becomes the eviction candidate
        assert!(cache.lookup(&key("g1")).is_some());
        cache.store(key("g3"), ImageRef::new("img3"));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&key("g1")));
        assert!(!cache.contains(&key("g2")));
        assert!(cache.contains(&key("g3")));
    }

    #[test]
    fn test_zero_limit_means_unbounded() {
        assert_eq!(CacheCapacity::from_limit(Some(0)), CacheCapacity::Unbounded);
    }

    #[test]
    fn test_restore_prefers_newest_record() {
        let base = ImageIdentity::from_content(b"me");
        let make = |image: &str| {
            NewGeneratedImage {
                base_identity: base,
                model_image: ImageRef::new("model"),
                garment_id: Some("g1".into()),
                garment_name: None,
                generated_image: ImageRef::new(image),
                pose: Some(Pose::new("P0")),
            }
            .into_record()
        };

        let cache = GenerationCache::restore(
            CacheCapacity::Unbounded,
            vec![make("old"), make("new")],
        );
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.peek(&key("g1")), Some(&ImageRef::new("new")));
    }
}
