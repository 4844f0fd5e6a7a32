//! Bounded cache of materialized icon bitmaps
//!
//! Holds at most [`MAX_TIMERS`] bitmaps, enough for every record to show a
//! distinct icon. Eviction is FIFO by insertion: a hit does not refresh an
//! entry's position.

use heapless::Deque;

use crate::catalog;
use crate::error::{BitmapError, IconCacheError};
use crate::record::MAX_TIMERS;
use crate::traits::BitmapLoader;

/// Icon index → bitmap handle cache
pub struct IconCache<L: BitmapLoader> {
    loader: L,
    entries: Deque<(u8, L::Handle), MAX_TIMERS>,
}

impl<L: BitmapLoader> IconCache<L> {
    /// Create an empty cache over a loader
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: Deque::new(),
        }
    }

    /// Number of cached bitmaps
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if an icon is currently cached
    pub fn contains(&self, icon: u8) -> bool {
        self.entries.iter().any(|(cached, _)| *cached == icon)
    }

    /// Cached icon indices, oldest first
    pub fn icons(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().map(|(icon, _)| *icon)
    }

    /// Bitmap for an icon, loading it on a miss
    ///
    /// When the cache is full the oldest entry is released first. A failed
    /// load leaves the cache unchanged.
    pub fn get(&mut self, icon: u8) -> Result<&L::Handle, IconCacheError> {
        let entry = catalog::icon_entry(icon).ok_or(IconCacheError::UnknownIcon)?;

        if let Some(pos) = self.entries.iter().position(|(cached, _)| *cached == icon) {
            return Ok(self.handle_at(pos));
        }

        let handle = self.loader.load(entry.resource)?;

        if self.entries.is_full() {
            if let Some((_evicted, old)) = self.entries.pop_front() {
                #[cfg(feature = "defmt")]
                defmt::debug!("icon cache: evicting icon {}", _evicted);
                self.loader.release(old);
            }
        }

        // Room was made above, so the push cannot fail
        if let Err((_, handle)) = self.entries.push_back((icon, handle)) {
            self.loader.release(handle);
            return Err(IconCacheError::Materialize(BitmapError::OutOfMemory));
        }

        Ok(self.handle_at(self.entries.len() - 1))
    }

    fn handle_at(&self, pos: usize) -> &L::Handle {
        let (front, back) = self.entries.as_slices();
        match front.get(pos) {
            Some((_, handle)) => handle,
            None => &back[pos - front.len()].1,
        }
    }

    /// Release every cached bitmap
    pub fn clear(&mut self) {
        while let Some((_, handle)) = self.entries.pop_front() {
            self.loader.release(handle);
        }
    }

    /// Access the underlying loader
    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: BitmapLoader> Drop for IconCache<L> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingLoader;
    use proptest::prelude::*;

    #[test]
    fn test_hit_returns_same_handle() {
        let mut cache = IconCache::new(CountingLoader::default());
        let first = *cache.get(3).unwrap();
        let second = *cache.get(3).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.loader().loads, 1);
    }

    #[test]
    fn test_eleventh_icon_evicts_first() {
        let mut cache = IconCache::new(CountingLoader::default());
        for icon in 1..=MAX_TIMERS as u8 + 1 {
            cache.get(icon).unwrap();
        }

        assert_eq!(cache.len(), MAX_TIMERS);
        assert!(!cache.contains(1));
        let resident: Vec<u8> = cache.icons().collect();
        let expected: Vec<u8> = (2..=MAX_TIMERS as u8 + 1).collect();
        assert_eq!(resident, expected);
        assert_eq!(cache.loader().released.as_slice(), &[1]);
    }

    #[test]
    fn test_hit_does_not_refresh_position() {
        let mut cache = IconCache::new(CountingLoader::default());
        for icon in 1..=MAX_TIMERS as u8 {
            cache.get(icon).unwrap();
        }
        // Touch the oldest entry, then overflow
        cache.get(1).unwrap();
        cache.get(20).unwrap();

        assert!(!cache.contains(1));
        assert_eq!(cache.icons().next(), Some(2));
        assert_eq!(cache.icons().last(), Some(20));
    }

    #[test]
    fn test_hit_after_wraparound_returns_cached_handle() {
        let mut cache = IconCache::new(CountingLoader::default());
        for icon in 1..=MAX_TIMERS as u8 + 3 {
            cache.get(icon).unwrap();
        }
        let loads = cache.loader().loads;

        // Entries now straddle the end of the ring buffer
        for icon in 4..=MAX_TIMERS as u8 + 3 {
            let first = *cache.get(icon).unwrap();
            assert_eq!(*cache.get(icon).unwrap(), first);
        }
        assert_eq!(cache.loader().loads, loads);
    }

    #[test]
    fn test_failed_load_leaves_cache_intact() {
        let mut cache = IconCache::new(CountingLoader::default());
        for icon in 1..=MAX_TIMERS as u8 {
            cache.get(icon).unwrap();
        }
        cache.loader_mut_for_test().fail_next = true;

        assert_eq!(
            cache.get(30),
            Err(IconCacheError::Materialize(BitmapError::OutOfMemory))
        );
        assert_eq!(cache.len(), MAX_TIMERS);
        assert!(cache.contains(1));
        assert!(cache.loader().released.is_empty());
    }

    #[test]
    fn test_unknown_icon() {
        let mut cache = IconCache::new(CountingLoader::default());
        assert_eq!(cache.get(52), Err(IconCacheError::UnknownIcon));
        assert_eq!(cache.loader().loads, 0);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut cache = IconCache::new(CountingLoader::default());
        for icon in [4, 5, 6] {
            cache.get(icon).unwrap();
        }
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.loader().released.len(), 3);
    }

    impl<L: BitmapLoader> IconCache<L> {
        fn loader_mut_for_test(&mut self) -> &mut L {
            &mut self.loader
        }
    }

    proptest! {
        #[test]
        fn prop_resident_icons_follow_insertion_order(icons in proptest::collection::vec(0u8..catalog::ICON_COUNT as u8, 0..60)) {
            let mut cache = IconCache::new(CountingLoader::default());
            let mut model: std::collections::VecDeque<u8> = std::collections::VecDeque::new();

            for icon in icons {
                cache.get(icon).unwrap();
                if !model.contains(&icon) {
                    if model.len() == MAX_TIMERS {
                        model.pop_front();
                    }
                    model.push_back(icon);
                }
            }

            let resident: Vec<u8> = cache.icons().collect();
            let expected: Vec<u8> = model.iter().copied().collect();
            prop_assert_eq!(resident, expected);
            let live = cache.loader().loads - cache.loader().released.len() as u32;
            prop_assert_eq!(live as usize, model.len());
        }
    }
}
