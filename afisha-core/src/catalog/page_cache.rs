//! TTL cache for upstream top-list pages, keyed by list kind and page number.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use afisha_model::TopListKind;
use dashmap::DashMap;
use tracing::debug;

use crate::providers::kinopoisk_types::TopFilmsPage;

pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10 * 60);

type PageKey = (TopListKind, u32);

#[derive(Debug, Clone)]
struct CachedPage {
    payload: Arc<TopFilmsPage>,
    expires_at: Instant,
}

/// Shared across requests. Expired entries are treated as absent and replaced
/// on the next fetch; nothing is evicted otherwise.
#[derive(Debug, Clone)]
pub struct TopPageCache {
    entries: Arc<DashMap<PageKey, CachedPage>>,
    ttl: Duration,
}

impl Default for TopPageCache {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_TTL)
    }
}

impl TopPageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, kind: TopListKind, page: u32) -> Option<Arc<TopFilmsPage>> {
        self.get_at(kind, page, Instant::now())
    }

    pub fn get_at(
        &self,
        kind: TopListKind,
        page: u32,
        now: Instant,
    ) -> Option<Arc<TopFilmsPage>> {
        let entry = self.entries.get(&(kind, page))?;
        if now < entry.expires_at {
            Some(Arc::clone(&entry.payload))
        } else {
            None
        }
    }

    /// Last write wins.
    pub fn insert(
        &self,
        kind: TopListKind,
        page: u32,
        payload: TopFilmsPage,
    ) -> Arc<TopFilmsPage> {
        self.insert_at(kind, page, payload, Instant::now())
    }

    pub fn insert_at(
        &self,
        kind: TopListKind,
        page: u32,
        payload: TopFilmsPage,
        now: Instant,
    ) -> Arc<TopFilmsPage> {
        let payload = Arc::new(payload);
        self.entries.insert(
            (kind, page),
            CachedPage {
                payload: Arc::clone(&payload),
                expires_at: now + self.ttl,
            },
        );
        debug!(kind = %kind, page, "top list page cached");
        payload
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::kinopoisk_types::TopFilmItem;

    fn page_with(id: i64) -> TopFilmsPage {
        TopFilmsPage {
            pages_count: Some(1),
            films: vec![TopFilmItem {
                film_id: Some(id),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn entry_is_live_until_expiry() {
        let cache = TopPageCache::new(Duration::from_secs(600));
        let t0 = Instant::now();
        cache.insert_at(TopListKind::Top100Popular, 1, page_with(1), t0);

        assert!(
            cache
                .get_at(TopListKind::Top100Popular, 1, t0 + Duration::from_secs(599))
                .is_some()
        );
        assert!(
            cache
                .get_at(TopListKind::Top100Popular, 1, t0 + Duration::from_secs(600))
                .is_none()
        );
    }

    #[test]
    fn keys_are_per_kind_and_page() {
        let cache = TopPageCache::default();
        cache.insert(TopListKind::Top100Popular, 1, page_with(1));

        assert!(cache.get(TopListKind::Top100Popular, 2).is_none());
        assert!(cache.get(TopListKind::Top250Best, 1).is_none());
    }

    #[test]
    fn refetch_overwrites_previous_payload() {
        let cache = TopPageCache::default();
        cache.insert(TopListKind::TopAwait, 1, page_with(1));
        cache.insert(TopListKind::TopAwait, 1, page_with(2));

        let page = cache.get(TopListKind::TopAwait, 1).unwrap();
        assert_eq!(page.films[0].film_id, Some(2));
        assert_eq!(cache.len(), 1);
    }
}
