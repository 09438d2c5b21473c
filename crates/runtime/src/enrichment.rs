use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::cache::{get_json, keys, set_json, CacheTtl, ResponseCache};
use crate::store::CollectionStore;
use crate::{check_set_id, normalize, parse_oracle_id, CardCatalog, CardPrint, CoreError, CoreResult, RawPrinting, RawSetInfo};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub name: String,
    pub oracle_id: String,
    pub art_uri: Option<String>,
    pub prints: Vec<CardPrint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collected_count: usize,
    pub total_count: usize,
    pub completed_percentage: f64,
}

/// Share of `total` that is `collected`, rounded to one decimal.
/// A card without prints has no meaningful completion, so zero is an error.
pub fn completion_stats(collected: usize, total: usize) -> CoreResult<CollectionStats> {
    if total == 0 {
        return Err(CoreError::Upstream("no qualifying prints were found for this card".to_string()));
    }

    let completed_percentage = (collected as f64 * 1000.0 / total as f64).round() / 10.0;
    Ok(CollectionStats {
        collected_count: collected,
        total_count: total,
        completed_percentage,
    })
}

/// Joins catalog data, the response cache and a user's collected prints.
/// Read only: nothing here writes to the store.
#[derive(Clone)]
pub struct EnrichmentService {
    catalog: Arc<dyn CardCatalog>,
    cache: Arc<dyn ResponseCache>,
    store: Arc<dyn CollectionStore>,
    ttl: CacheTtl,
}

impl EnrichmentService {
    pub fn new(
        catalog: Arc<dyn CardCatalog>,
        cache: Arc<dyn ResponseCache>,
        store: Arc<dyn CollectionStore>,
    ) -> Self {
        Self::with_ttl(catalog, cache, store, CacheTtl::default())
    }

    pub fn with_ttl(
        catalog: Arc<dyn CardCatalog>,
        cache: Arc<dyn ResponseCache>,
        store: Arc<dyn CollectionStore>,
        ttl: CacheTtl,
    ) -> Self {
        Self { catalog, cache, store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn CollectionStore> {
        &self.store
    }

    /// All printings of a card, served from the cache when possible.
    pub async fn card_printings(&self, card_id: &str) -> CoreResult<Vec<RawPrinting>> {
        let card_id = parse_oracle_id(card_id)?;
        let key = keys::card_printings(&card_id);
        if let Some(printings) = get_json::<Vec<RawPrinting>>(self.cache.as_ref(), &key).await {
            debug!("Cache hit for {}", key);
            return Ok(printings);
        }

        debug!("Cache miss for {}", key);
        let printings = self.catalog.search_printings_by_card_id(&card_id).await?;
        self.remember(&key, &printings, self.ttl.card_printings).await;
        Ok(printings)
    }

    pub async fn set_info(&self, set_id: &str) -> CoreResult<RawSetInfo> {
        check_set_id(set_id)?;
        let key = keys::set_info(set_id);
        if let Some(info) = get_json::<RawSetInfo>(self.cache.as_ref(), &key).await {
            debug!("Cache hit for {}", key);
            return Ok(info);
        }

        debug!("Cache miss for {}", key);
        let info = self.catalog.get_set_metadata(set_id).await?;
        self.remember(&key, &info, self.ttl.set_info).await;
        Ok(info)
    }

    /// Icon uri of a set. Lookup failures are logged and yield `None`; they are not cached.
    pub async fn set_icon(&self, set_id: &str) -> Option<String> {
        let key = keys::set_icon(set_id);
        // a cached null is a set without an icon, still a hit
        if let Some(icon) = get_json::<Option<String>>(self.cache.as_ref(), &key).await {
            return icon;
        }

        match self.set_info(set_id).await {
            Ok(info) => {
                self.remember(&key, &info.icon_svg_uri, self.ttl.set_icon).await;
                info.icon_svg_uri
            }
            Err(e) => {
                error!("Failed to resolve icon for set {}: {}", set_id, e);
                None
            }
        }
    }

    /// Card name, art and every print, each flagged with whether `collection_id` holds it.
    pub async fn card_view(&self, card_id: &str, collection_id: i64) -> CoreResult<CardView> {
        let card_id = parse_oracle_id(card_id)?;
        self.require_collection(collection_id).await?;

        let printings = self.card_printings(&card_id).await?;
        let first = printings
            .iter()
            .find(|printing| !printing.is_digital())
            .ok_or_else(|| CoreError::Upstream(format!("no qualifying prints were found for card {}", card_id)))?;

        let icons = self.set_icons(&printings).await;
        let collected = self.store.collected_print_ids(collection_id).await?;

        let mut prints = normalize(&printings, &icons);
        for print in prints.iter_mut() {
            print.is_collected = Some(collected.contains(&print.print_id));
        }

        Ok(CardView {
            name: first.name.clone(),
            oracle_id: card_id,
            art_uri: first.art_crop_uri(),
            prints,
        })
    }

    /// Collected versus available prints of the collection's card. Both sides count the
    /// same normalized prints, so digital printings and stray ids never skew the ratio.
    pub async fn collection_stats(&self, collection_id: i64) -> CoreResult<CollectionStats> {
        let collection = self.require_collection(collection_id).await?;

        let printings = self.card_printings(&collection.card_id).await?;
        let prints = normalize(&printings, &HashMap::new());
        let collected = self.store.collected_print_ids(collection_id).await?;

        let collected_count = prints
            .iter()
            .filter(|print| collected.contains(&print.print_id))
            .count();

        completion_stats(collected_count, prints.len())
    }

    async fn require_collection(&self, collection_id: i64) -> CoreResult<crate::Collection> {
        self.store
            .find_collection(collection_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Collection {} not found", collection_id)))
    }

    async fn set_icons(&self, printings: &[RawPrinting]) -> HashMap<String, String> {
        let set_ids: HashSet<&str> = printings
            .iter()
            .filter(|printing| !printing.is_digital())
            .map(|printing| printing.set_id.as_str())
            .collect();

        let lookups = set_ids.into_iter().map(|set_id| async move {
            (set_id.to_string(), self.set_icon(set_id).await)
        });

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(set_id, icon)| icon.map(|icon| (set_id, icon)))
            .collect()
    }

    async fn remember<T: Serialize>(&self, key: &str, value: &T, ttl: std::time::Duration) {
        if let Err(e) = set_json(self.cache.as_ref(), key, value, ttl).await {
            warn!("Failed to cache {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_of_the_prints() {
        let stats = completion_stats(3, 12).unwrap();
        assert_eq!(stats.completed_percentage, 25.0);
        assert_eq!(stats.collected_count, 3);
        assert_eq!(stats.total_count, 12);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(completion_stats(4, 11).unwrap().completed_percentage, 36.4);
        assert_eq!(completion_stats(1, 3).unwrap().completed_percentage, 33.3);
        assert_eq!(completion_stats(2, 3).unwrap().completed_percentage, 66.7);
        assert_eq!(completion_stats(0, 7).unwrap().completed_percentage, 0.0);
    }

    #[test]
    fn zero_total_is_an_upstream_error() {
        assert!(matches!(completion_stats(0, 0), Err(CoreError::Upstream(_))));
    }
}
