use std::collections::HashMap;

use super::{resolve_language, CardPrint};
use crate::RawPrinting;

pub const FOIL_SUFFIX: &str = "_foil";

/// Turns catalog printings into the prints a collector can own.
///
/// Digital printings are dropped. A printing sold in both finishes becomes two records, the
/// nonfoil one first under the catalog id and the foil one right after it under
/// `<id>_foil`. Input order is kept otherwise. `set_icons` maps set ids to icon uris; sets
/// missing from it get no icon.
pub fn normalize(raw: &[RawPrinting], set_icons: &HashMap<String, String>) -> Vec<CardPrint> {
    let mut prints = Vec::with_capacity(raw.len());

    for printing in raw.iter().filter(|printing| !printing.is_digital()) {
        let base = CardPrint {
            print_id: printing.id.clone(),
            set_id: printing.set_id.clone(),
            set_name: printing.set_name.clone(),
            set_release_date: printing.released_at.clone(),
            language: resolve_language(&printing.lang),
            image_uri: printing.png_uri(),
            artist: printing.artist.clone(),
            is_foil_variant: printing.foil && !printing.nonfoil,
            foil_capable: printing.foil,
            nonfoil_capable: printing.nonfoil,
            set_icon: set_icons.get(&printing.set_id).cloned(),
            is_collected: None,
        };

        if printing.foil && printing.nonfoil {
            let foil = CardPrint {
                print_id: format!("{}{}", printing.id, FOIL_SUFFIX),
                is_foil_variant: true,
                ..base.clone()
            };
            prints.push(base);
            prints.push(foil);
        } else {
            prints.push(base);
        }
    }

    prints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageUris, UNKNOWN_LANGUAGE};

    fn printing(id: &str, foil: bool, nonfoil: bool) -> RawPrinting {
        RawPrinting {
            id: id.to_string(),
            name: "Opt".to_string(),
            lang: "en".to_string(),
            set_id: format!("set-{}", id),
            set_name: "Ixalan".to_string(),
            released_at: "2017-09-29".to_string(),
            artist: Some("Tyler Jacobson".to_string()),
            foil,
            nonfoil,
            image_uris: Some(ImageUris {
                png: Some(format!("https://img/{}.png", id)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn both_finishes_expand_into_two_records() {
        let prints = normalize(&[printing("a", true, true)], &HashMap::new());

        assert_eq!(prints.len(), 2);
        let (nonfoil, foil) = (&prints[0], &prints[1]);
        assert_eq!(nonfoil.print_id, "a");
        assert!(!nonfoil.is_foil_variant);
        assert_eq!(foil.print_id, "a_foil");
        assert!(foil.is_foil_variant);

        let same_otherwise = CardPrint {
            print_id: nonfoil.print_id.clone(),
            is_foil_variant: nonfoil.is_foil_variant,
            ..foil.clone()
        };
        assert_eq!(&same_otherwise, nonfoil);
    }

    #[test]
    fn single_finish_yields_one_record() {
        let prints = normalize(&[printing("f", true, false), printing("n", false, true)], &HashMap::new());

        assert_eq!(prints.len(), 2);
        assert_eq!(prints[0].print_id, "f");
        assert!(prints[0].is_foil_variant);
        assert_eq!(prints[1].print_id, "n");
        assert!(!prints[1].is_foil_variant);
    }

    #[test]
    fn digital_printings_never_appear() {
        let mut digital = printing("d", true, true);
        digital.digital = Some(true);
        let mut explicit_paper = printing("p", false, true);
        explicit_paper.digital = Some(false);

        let prints = normalize(&[digital, explicit_paper, printing("m", false, true)], &HashMap::new());

        let ids: Vec<_> = prints.iter().map(|print| print.print_id.as_str()).collect();
        assert_eq!(ids, ["p", "m"]);
    }

    #[test]
    fn order_is_kept_with_foils_after_their_nonfoil() {
        let raw = [printing("1", true, true), printing("2", false, true), printing("3", true, true)];
        let ids: Vec<_> = normalize(&raw, &HashMap::new())
            .into_iter()
            .map(|print| print.print_id)
            .collect();

        assert_eq!(ids, ["1", "1_foil", "2", "3", "3_foil"]);
    }

    #[test]
    fn unknown_language_uses_the_fallback_entry() {
        let mut raw = printing("x", false, true);
        raw.lang = "xx".to_string();

        let prints = normalize(&[raw], &HashMap::new());
        assert_eq!(prints[0].language, *UNKNOWN_LANGUAGE);
    }

    #[test]
    fn icons_are_looked_up_by_set_and_missing_ones_stay_empty() {
        let icons = HashMap::from([("set-a".to_string(), "https://svg/a.svg".to_string())]);
        let prints = normalize(&[printing("a", false, true), printing("b", false, true)], &icons);

        assert_eq!(prints[0].set_icon.as_deref(), Some("https://svg/a.svg"));
        assert!(prints[1].set_icon.is_none());
        assert!(prints.iter().all(|print| print.is_collected.is_none()));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(normalize(&[], &HashMap::new()).is_empty());
    }
}
