//! Pattern table for promotion text extraction
//!
//! Every regex and keyword list the parser and collector match against
//! lives here, compiled once. Keeping the table in one place lets the
//! extraction grammar be reviewed and unit-tested in isolation from the
//! scraping machinery.
//!
//! Dictionary order matters: `identify_airline` takes the first entry with
//! any matching keyword, so more specific partners must not be shadowed by
//! earlier, broader keywords.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::promotion::Airline;

/// Case-insensitive substring keywords per transfer partner, in match
/// priority order.
pub static AIRLINE_KEYWORDS: &[(Airline, &[&str])] = &[
    (Airline::Latam, &["latam", "latam pass"]),
    (Airline::Azul, &["azul", "azul fidelidade", "tudoazul"]),
    (Airline::Smiles, &["smiles", "gol"]),
    (Airline::FlyingBlue, &["flying blue", "air france", "klm"]),
    (Airline::United, &["united", "mileageplus", "mileage plus"]),
    (Airline::Tap, &["tap", "miles&go", "miles and go"]),
    (Airline::Iberia, &["iberia", "avios"]),
    (Airline::BritishAirways, &["british airways", "ba executive club"]),
    (Airline::Aeromexico, &["aeromexico", "club premier"]),
    (Airline::Etihad, &["etihad", "guest"]),
];

/// Bonus percentage: "40% de bônus", "110% bônus", "até 90% de bônus".
pub static BONUS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)%\s*(?:de\s*)?bônus").expect("valid bonus regex"));

/// First DD/MM/YYYY occurrence: "até 01/08/2025", "válido até 30/09/2025".
pub static VALIDITY_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").expect("valid date regex"));

/// Minimum points with unit: "mínimo de 10.000 pontos", "15 mil pontos".
/// The numeric part may carry "." as a thousands separator.
pub static MINIMUM_POINTS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+\.?\d*)\s*(mil|k|pontos)").expect("valid points regex"));

/// Broad partner/bonus/transfer filter applied to search-result cards.
pub static CONTENT_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)latam|azul|smiles|flying blue|united|tap|iberia|british|aeromexico|etihad|gol|bônus|bonus|transferir|milhas",
    )
    .expect("valid content keyword regex")
});

/// Transfer-section link filter applied during the menu scan.
pub static MENU_LINK_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)transferir.*pontos|companhias.*aéreas").expect("valid menu keyword regex")
});

/// Banner/carousel filter; wider than the card filter because banners are
/// often image-only with sparse alt text ("pontos" alone qualifies).
pub static BANNER_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)latam|azul|smiles|flying blue|united|tap|iberia|british|aeromexico|etihad|transferir|bônus|bonus|milhas|pontos",
    )
    .expect("valid banner keyword regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_pattern_accepts_optional_de() {
        assert!(BONUS_PATTERN.is_match("40% de bônus"));
        assert!(BONUS_PATTERN.is_match("110% bônus"));
        assert!(BONUS_PATTERN.is_match("até 90% DE BÔNUS"));
        assert!(!BONUS_PATTERN.is_match("40% de desconto"));
    }

    #[test]
    fn date_pattern_matches_first_occurrence() {
        let caps = VALIDITY_DATE_PATTERN
            .captures("válido até 30/09/2025 ou 01/10/2025")
            .unwrap();
        assert_eq!(&caps[1], "30");
        assert_eq!(&caps[2], "09");
        assert_eq!(&caps[3], "2025");
    }

    #[test]
    fn points_pattern_captures_unit_token() {
        let caps = MINIMUM_POINTS_PATTERN.captures("mínimo de 10.000 pontos").unwrap();
        assert_eq!(&caps[1], "10.000");
        assert_eq!(&caps[2], "pontos");

        let caps = MINIMUM_POINTS_PATTERN.captures("a partir de 15 mil").unwrap();
        assert_eq!(&caps[1], "15");
        assert_eq!(caps[2].to_lowercase(), "mil");
    }

    #[test]
    fn menu_keywords_require_transfer_context() {
        assert!(MENU_LINK_KEYWORDS.is_match("Transferir seus pontos"));
        assert!(MENU_LINK_KEYWORDS.is_match("Companhias Aéreas parceiras"));
        assert!(!MENU_LINK_KEYWORDS.is_match("Resgatar produtos"));
    }
}
