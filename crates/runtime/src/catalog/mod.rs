use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{CoreError, CoreResult};

const MAX_SET_ID_LEN: usize = 64;

/// Failure talking to the external card catalog. Never retried here; callers decide.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("catalog transport error: {0}")]
    Transport(String),

    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

/// Read access to the external card catalog.
#[async_trait::async_trait]
pub trait CardCatalog: Send + Sync {
    /// Every printing of the card identified by `card_id` (its oracle id), multilingual,
    /// ordered by release date ascending. Partial results are never returned.
    async fn search_printings_by_card_id(&self, card_id: &str) -> Result<Vec<RawPrinting>, CatalogError>;

    async fn get_set_metadata(&self, set_id: &str) -> Result<RawSetInfo, CatalogError>;
}

/// Canonical hyphenated form of an oracle id. Anything else would change the meaning
/// of the `oracleid:` search expression.
pub fn parse_oracle_id(card_id: &str) -> CoreResult<String> {
    let card_id = card_id.trim();
    if card_id.is_empty() {
        return Err(CoreError::Validation("The card_id field is required.".to_string()));
    }

    Uuid::try_parse(card_id)
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| CoreError::Validation(format!("{} is not a valid card id.", card_id)))
}

/// Set ids are UUIDs or set codes: ascii letters, digits and hyphens.
pub fn check_set_id(set_id: &str) -> CoreResult<()> {
    let valid = !set_id.is_empty()
        && set_id.len() <= MAX_SET_ID_LEN
        && set_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("{} is not a valid set id.", set_id)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUris {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub art_crop: Option<String>,
    #[serde(default)]
    pub border_crop: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// One entry of a catalog card search, as the catalog sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPrinting {
    pub id: String,
    #[serde(default)]
    pub oracle_id: Option<String>,
    pub name: String,
    pub lang: String,

    pub set_id: String,
    pub set_name: String,
    pub released_at: String,

    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub digital: Option<bool>,
    #[serde(default)]
    pub foil: bool,
    #[serde(default)]
    pub nonfoil: bool,

    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

impl RawPrinting {
    /// A missing flag counts as a physical printing.
    pub fn is_digital(&self) -> bool {
        self.digital.unwrap_or(false)
    }

    /// Top level images, or the front face's for multi-faced layouts.
    pub fn images(&self) -> Option<&ImageUris> {
        self.image_uris.as_ref().or_else(|| {
            self.card_faces
                .as_ref()
                .and_then(|faces| faces.iter().find_map(|face| face.image_uris.as_ref()))
        })
    }

    pub fn png_uri(&self) -> Option<String> {
        self.images().and_then(|images| images.png.clone())
    }

    pub fn art_crop_uri(&self) -> Option<String> {
        self.images().and_then(|images| images.art_crop.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSetInfo {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub set_type: Option<String>,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub card_count: Option<u32>,
    #[serde(default)]
    pub digital: Option<bool>,
    #[serde(default)]
    pub icon_svg_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_sparse_catalog_entry() {
        let raw: RawPrinting = serde_json::from_value(json!({
            "id": "p1",
            "name": "Opt",
            "lang": "en",
            "set_id": "s1",
            "set_name": "Ixalan",
            "released_at": "2017-09-29",
            "unknown_field": 3
        })).unwrap();

        assert!(!raw.is_digital());
        assert!(!raw.foil);
        assert!(raw.png_uri().is_none());
    }

    #[test]
    fn falls_back_to_front_face_images() {
        let raw: RawPrinting = serde_json::from_value(json!({
            "id": "p1",
            "name": "Delver of Secrets // Insectile Aberration",
            "lang": "en",
            "set_id": "s1",
            "set_name": "Innistrad",
            "released_at": "2011-09-30",
            "card_faces": [
                { "name": "Delver of Secrets", "image_uris": { "png": "front.png", "art_crop": "front.jpg" } },
                { "name": "Insectile Aberration", "image_uris": { "png": "back.png" } }
            ]
        })).unwrap();

        assert_eq!(raw.png_uri().as_deref(), Some("front.png"));
        assert_eq!(raw.art_crop_uri().as_deref(), Some("front.jpg"));
    }

    #[test]
    fn oracle_ids_are_canonicalized() {
        assert_eq!(
            parse_oracle_id(" 4457ED35-7C10-48C8-9776-456485FDF070 ").unwrap(),
            "4457ed35-7c10-48c8-9776-456485fdf070"
        );
        assert_eq!(
            parse_oracle_id("4457ed357c1048c89776456485fdf070").unwrap(),
            "4457ed35-7c10-48c8-9776-456485fdf070"
        );
    }

    #[test]
    fn search_syntax_is_not_an_oracle_id() {
        assert!(matches!(parse_oracle_id("abc or t:creature"), Err(CoreError::Validation(_))));
        assert!(matches!(
            parse_oracle_id("4457ed35-7c10-48c8-9776-456485fdf070 or t:creature"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(parse_oracle_id("  "), Err(CoreError::Validation(_))));
    }

    #[test]
    fn set_ids_are_single_path_segments() {
        assert!(check_set_id("xln").is_ok());
        assert!(check_set_id("fd1ae4b5-95f3-4c1f-b62e-2f4aa0b7d1f4").is_ok());
        assert!(check_set_id("../cards/some-card").is_err());
        assert!(check_set_id("s1?q=x").is_err());
        assert!(check_set_id("").is_err());
        assert!(check_set_id(&"a".repeat(65)).is_err());
    }
}
