mod language;
mod normalizer;

use serde::{Deserialize, Serialize};

pub use language::{resolve_language, Language, LANGUAGES, UNKNOWN_LANGUAGE};
pub use normalizer::{normalize, FOIL_SUFFIX};

/// One printing of a card in one language and finish, as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPrint {
    pub print_id: String,

    pub set_id: String,
    pub set_name: String,
    pub set_release_date: String,

    pub language: Language,
    pub image_uri: Option<String>,
    pub artist: Option<String>,

    pub is_foil_variant: bool,
    pub foil_capable: bool,
    pub nonfoil_capable: bool,

    pub set_icon: Option<String>,

    /// Filled in by the enrichment step; `None` until then.
    pub is_collected: Option<bool>,
}
