mod error;
mod collection;
mod store;
mod catalog;
mod cache;
mod prints;
mod enrichment;

pub use error::{CoreError, CoreResult};
pub use collection::{User, Collection, CollectedCardPrint};
pub use store::{CollectionStore, PgCollectionStore, MemoryCollectionStore, bootstrap_schema};
pub use catalog::{
    check_set_id, parse_oracle_id, CardCatalog, CatalogError, RawPrinting, RawSetInfo, ImageUris, CardFace,
};
pub use cache::{ResponseCache, MemoryCache, CacheTtl, get_json, set_json, keys, ttl};
pub use prints::{CardPrint, Language, normalize, resolve_language, LANGUAGES, UNKNOWN_LANGUAGE, FOIL_SUFFIX};
pub use enrichment::{EnrichmentService, CardView, CollectionStats, completion_stats};
