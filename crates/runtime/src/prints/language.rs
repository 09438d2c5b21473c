use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub code: String,
    pub flag_icon: String,
}

impl Language {
    fn flagged(name: &str, code: &str, flag: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            flag_icon: format!("fi fi-{} fis", flag),
        }
    }
}

/// Catalog language code to display metadata.
pub static LANGUAGES: Lazy<HashMap<&'static str, Language>> = Lazy::new(|| {
    [
        ("en", Language::flagged("English", "en", "gb")),
        ("it", Language::flagged("Italian", "it", "it")),
        ("de", Language::flagged("German", "de", "de")),
        ("fr", Language::flagged("French", "fr", "fr")),
        ("es", Language::flagged("Spanish", "es", "es")),
        ("pt", Language::flagged("Portuguese", "pt", "pt")),
        ("ja", Language::flagged("Japanese", "jp", "jp")),
        ("ko", Language::flagged("Korean", "ko", "kr")),
        ("zhs", Language::flagged("S-Chinese", "zhs", "cn")),
        ("zht", Language::flagged("T-Chinese", "zht", "tw")),
        ("ru", Language::flagged("Russian", "ru", "ru")),
    ]
    .into_iter()
    .collect()
});

/// Used for every code missing from `LANGUAGES`.
pub static UNKNOWN_LANGUAGE: Lazy<Language> = Lazy::new(|| Language::flagged("Unknown", "unknown", "xx"));

pub fn resolve_language(code: &str) -> Language {
    LANGUAGES
        .get(code)
        .unwrap_or(&*UNKNOWN_LANGUAGE)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        let japanese = resolve_language("ja");
        assert_eq!(japanese.name, "Japanese");
        assert_eq!(japanese.code, "jp");
        assert_eq!(japanese.flag_icon, "fi fi-jp fis");

        assert_eq!(resolve_language("en").flag_icon, "fi fi-gb fis");
        assert_eq!(LANGUAGES.len(), 11);
    }

    #[test]
    fn unknown_code_is_never_english() {
        let unknown = resolve_language("xx");
        assert_eq!(unknown, *UNKNOWN_LANGUAGE);
        assert_ne!(unknown, resolve_language("en"));
        assert_eq!(resolve_language("").code, "unknown");
        // codes are case sensitive, as the catalog sends them lowercase
        assert_eq!(resolve_language("EN").code, "unknown");
    }
}
