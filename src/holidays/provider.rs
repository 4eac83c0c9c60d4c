use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use itertools::Itertools;
use reqwest::Client;

use super::{HolidayError, HolidayFetcher, HolidayKind, HolidayMap, group_by_date};
use crate::cache::Cache;
use crate::core::AppConfig;

/// Anything that can produce the holidays of a month.
#[async_trait]
pub trait HolidayProvider: Send + Sync {
    async fn get_month(&self, year: i32, month: u32) -> Result<HolidayMap, HolidayError>;
}

/// Adapts a single special-day feed to a `HolidayMap`.
pub struct ExternalHolidayProvider {
    fetcher: HolidayFetcher,
}

impl ExternalHolidayProvider {
    pub fn new(fetcher: HolidayFetcher) -> Self {
        Self { fetcher }
    }

    pub fn kind(&self) -> HolidayKind {
        self.fetcher.kind()
    }
}

#[async_trait]
impl HolidayProvider for ExternalHolidayProvider {
    async fn get_month(&self, year: i32, month: u32) -> Result<HolidayMap, HolidayError> {
        let items = self.fetcher.fetch(year, month).await?;
        Ok(group_by_date(items))
    }
}

/// Fans out to every child provider at once and merges the results.
/// A single failing child fails the whole month.
pub struct CompositeHolidayProvider {
    providers: Vec<Arc<dyn HolidayProvider>>,
}

impl CompositeHolidayProvider {
    pub fn new(providers: Vec<Arc<dyn HolidayProvider>>) -> Self {
        Self { providers }
    }

    /// Merge the given feeds in order.
    pub fn from_feeds(feeds: &[Arc<ExternalHolidayProvider>]) -> Self {
        Self::new(
            feeds
                .iter()
                .map(|feed| feed.clone() as Arc<dyn HolidayProvider>)
                .collect(),
        )
    }

    /// Public holidays, anniversaries and sundry days, in that order.
    pub fn korean_special_days(config: &AppConfig, client: Client, cache: Arc<dyn Cache>) -> Self {
        Self::from_feeds(&korean_special_day_feeds(config, client, cache))
    }
}

/// One provider per special-day feed, in `HolidayKind::ALL` order,
/// sharing a client and cache.
pub fn korean_special_day_feeds(
    config: &AppConfig,
    client: Client,
    cache: Arc<dyn Cache>,
) -> Vec<Arc<ExternalHolidayProvider>> {
    HolidayKind::ALL
        .into_iter()
        .map(|kind| {
            let fetcher =
                HolidayFetcher::from_config(kind, config, client.clone(), cache.clone());
            Arc::new(ExternalHolidayProvider::new(fetcher))
        })
        .collect()
}

#[async_trait]
impl HolidayProvider for CompositeHolidayProvider {
    async fn get_month(&self, year: i32, month: u32) -> Result<HolidayMap, HolidayError> {
        let maps = try_join_all(self.providers.iter().map(|p| p.get_month(year, month))).await?;
        Ok(merge_maps(maps))
    }
}

/// Concatenate per-date lists in the order given, dropping repeats of
/// the same (date, name, kind, source).
pub fn merge_maps(maps: impl IntoIterator<Item = HolidayMap>) -> HolidayMap {
    let mut merged = HolidayMap::new();
    for map in maps {
        for (date, items) in map {
            merged.entry(date).or_default().extend(items);
        }
    }
    for items in merged.values_mut() {
        *items = std::mem::take(items)
            .into_iter()
            .unique_by(|item| item.identity())
            .collect();
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::{HolidayItem, HolidaySource};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn item(date: &str, name: &str, kind: HolidayKind, source: HolidaySource) -> HolidayItem {
        HolidayItem {
            date: date.to_string(),
            name: name.to_string(),
            source,
            is_holiday: kind == HolidayKind::Public,
            kind,
        }
    }

    struct StaticProvider(HolidayMap);

    #[async_trait]
    impl HolidayProvider for StaticProvider {
        async fn get_month(&self, _year: i32, _month: u32) -> Result<HolidayMap, HolidayError> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl HolidayProvider for FailingProvider {
        async fn get_month(&self, _year: i32, _month: u32) -> Result<HolidayMap, HolidayError> {
            Err(HolidayError::UpstreamResult {
                code: "99".to_string(),
                message: "boom".to_string(),
            })
        }
    }

    /// Only resolves once every sibling has started, so a sequential
    /// composite would never finish.
    struct RendezvousProvider {
        barrier: Arc<Barrier>,
        map: HolidayMap,
    }

    #[async_trait]
    impl HolidayProvider for RendezvousProvider {
        async fn get_month(&self, _year: i32, _month: u32) -> Result<HolidayMap, HolidayError> {
            self.barrier.wait().await;
            Ok(self.map.clone())
        }
    }

    #[tokio::test]
    async fn it_merges_in_provider_order() {
        let public = group_by_date(vec![item("2024-05-05", "어린이날", HolidayKind::Public, HolidaySource::External)]);
        let anniversary = group_by_date(vec![
            item("2024-05-05", "어린이날", HolidayKind::Anniversary, HolidaySource::External),
            item("2024-05-08", "어버이날", HolidayKind::Anniversary, HolidaySource::External),
        ]);
        let composite = CompositeHolidayProvider::new(vec![
            Arc::new(StaticProvider(public)),
            Arc::new(StaticProvider(anniversary)),
        ]);

        let map = composite.get_month(2024, 5).await.unwrap();
        let may5 = &map["2024-05-05"];
        assert_eq!(may5.len(), 2);
        assert_eq!(may5[0].kind, HolidayKind::Public);
        assert_eq!(may5[1].kind, HolidayKind::Anniversary);
        assert_eq!(map["2024-05-08"].len(), 1);
    }

    #[tokio::test]
    async fn it_dedupes_identical_entries_across_providers() {
        let same = group_by_date(vec![item("2024-06-06", "현충일", HolidayKind::Public, HolidaySource::External)]);
        let builtin = group_by_date(vec![item("2024-06-06", "현충일", HolidayKind::Public, HolidaySource::Builtin)]);
        let composite = CompositeHolidayProvider::new(vec![
            Arc::new(StaticProvider(same.clone())),
            Arc::new(StaticProvider(same)),
            Arc::new(StaticProvider(builtin)),
        ]);

        let map = composite.get_month(2024, 6).await.unwrap();
        let items = &map["2024-06-06"];
        // Same entry from two providers collapses, a different source does not
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, HolidaySource::External);
        assert_eq!(items[1].source, HolidaySource::Builtin);
    }

    #[tokio::test]
    async fn it_fails_when_any_provider_fails() {
        let ok = group_by_date(vec![item("2024-10-03", "개천절", HolidayKind::Public, HolidaySource::External)]);
        let composite = CompositeHolidayProvider::new(vec![
            Arc::new(StaticProvider(ok)),
            Arc::new(FailingProvider),
        ]);
        assert!(composite.get_month(2024, 10).await.is_err());
    }

    #[tokio::test]
    async fn it_queries_providers_concurrently() {
        let barrier = Arc::new(Barrier::new(3));
        let providers: Vec<Arc<dyn HolidayProvider>> = (0..3)
            .map(|i| {
                Arc::new(RendezvousProvider {
                    barrier: barrier.clone(),
                    map: group_by_date(vec![item(
                        &format!("2024-01-0{}", i + 1),
                        "day",
                        HolidayKind::Sundry,
                        HolidaySource::External,
                    )]),
                }) as Arc<dyn HolidayProvider>
            })
            .collect();
        let composite = CompositeHolidayProvider::new(providers);

        let map = tokio::time::timeout(Duration::from_secs(5), composite.get_month(2024, 1))
            .await
            .expect("providers were not polled concurrently")
            .unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn it_registers_one_feed_per_kind_in_order() {
        let config = AppConfig::default();
        let cache: Arc<dyn Cache> = Arc::new(crate::cache::MemoryCache::default());
        let feeds = korean_special_day_feeds(&config, Client::new(), cache);
        let kinds: Vec<HolidayKind> = feeds.iter().map(|feed| feed.kind()).collect();
        assert_eq!(kinds, HolidayKind::ALL.to_vec());
    }
}
