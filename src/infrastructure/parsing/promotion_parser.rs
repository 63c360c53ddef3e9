//! Free-text promotion parser
//!
//! Turns one raw candidate (title/description/link) into a typed
//! `Promotion`, or rejects it. Each field extractor is an independent pure
//! function over the combined text, so the marketing copy can mention the
//! fields in any order. Candidates whose text resolves no transfer partner
//! are dropped as noise, not reported as failures.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::patterns;
use crate::domain::promotion::{Airline, Promotion, RawCandidate};

/// Per-record parse failure. Isolated: one malformed candidate never stops
/// the rest of the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Matched validity date {day:02}/{month:02}/{year} is not a real calendar date")]
    InvalidCalendarDate { day: u32, month: u32, year: i32 },
}

/// Outcome of a full batch parse, with drop reasons counted separately so
/// noise filtering stays observable in logs and cycle summaries.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub promotions: Vec<Promotion>,
    /// Candidates whose text matched no airline keyword (noise filter).
    pub unresolved_dropped: usize,
    /// Candidates rejected by a per-record parse failure.
    pub failed: usize,
}

/// Resolve the transfer partner from the candidate text. First dictionary
/// entry with any case-insensitive substring match wins.
pub fn identify_airline(text: &str) -> Airline {
    let lower = text.to_lowercase();
    for (airline, keywords) in patterns::AIRLINE_KEYWORDS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *airline;
        }
    }
    Airline::Unresolved
}

/// Extract the bonus percentage: "40% de bônus", "110% bônus".
pub fn extract_bonus_percentage(text: &str) -> Option<u32> {
    patterns::BONUS_PATTERN
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Extract the first DD/MM/YYYY occurrence as a calendar date.
///
/// `Ok(None)` means no date was stated (ongoing promotion). A matched but
/// impossible date (e.g. 31/02/2025) is a per-record failure.
pub fn extract_validity_date(text: &str) -> Result<Option<NaiveDate>, ParseError> {
    let Some(caps) = patterns::VALIDITY_DATE_PATTERN.captures(text) else {
        return Ok(None);
    };
    // Captures are all-digit groups, bounded by the pattern widths.
    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: u32 = caps[2].parse().unwrap_or(0);
    let year: i32 = caps[3].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or(ParseError::InvalidCalendarDate { day, month, year })
}

/// Extract the minimum points threshold: "mínimo de 10.000 pontos",
/// "15 mil pontos", "250 pontos". "." is a thousands separator and is
/// stripped before parsing; "mil"/"k" multiply by 1000.
pub fn extract_minimum_points(text: &str) -> Option<u64> {
    let caps = patterns::MINIMUM_POINTS_PATTERN.captures(text)?;
    let digits = caps[1].replace('.', "");
    let base: u64 = digits.parse().ok()?;
    match caps[2].to_lowercase().as_str() {
        "mil" | "k" => Some(base * 1000),
        _ => Some(base),
    }
}

/// Parse one candidate. `Ok(None)` is the unresolved-airline drop.
pub fn parse_candidate(raw: &RawCandidate) -> Result<Option<Promotion>, ParseError> {
    let full_text = format!("{} {}", raw.title, raw.description);

    let airline = identify_airline(&full_text);
    if airline == Airline::Unresolved {
        return Ok(None);
    }

    let bonus_percentage = extract_bonus_percentage(&full_text);
    let valid_until = extract_validity_date(&full_text)?;
    let minimum_points = extract_minimum_points(&full_text);

    Ok(Some(Promotion {
        id: Promotion::identity(airline, bonus_percentage, valid_until),
        airline,
        bonus_percentage,
        valid_until,
        minimum_points,
        title: raw.title.trim().to_string(),
        description: raw.description.trim().to_string(),
        link: raw.link.clone(),
        scraped_at: Utc::now(),
    }))
}

/// Parse every candidate independently. One record's malformed text never
/// prevents its siblings from parsing.
pub fn parse_candidates(candidates: &[RawCandidate]) -> ParseReport {
    let mut report = ParseReport::default();

    for raw in candidates {
        match parse_candidate(raw) {
            Ok(Some(promotion)) => {
                debug!(
                    "Parsed promotion: {} - {}% bonus",
                    promotion.airline,
                    promotion.bonus_percentage.unwrap_or(0)
                );
                report.promotions.push(promotion);
            }
            Ok(None) => {
                report.unresolved_dropped += 1;
                debug!("Dropped candidate with unresolved airline: {}", raw.title);
            }
            Err(e) => {
                report.failed += 1;
                warn!("Error parsing promotion candidate '{}': {}", raw.title, e);
            }
        }
    }

    info!(
        "Parsed {} promotions ({} unresolved dropped, {} failed)",
        report.promotions.len(),
        report.unresolved_dropped,
        report.failed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn candidate(title: &str, description: &str) -> RawCandidate {
        RawCandidate::new(title, description, "https://www.livelo.com.br/promo")
    }

    #[test]
    fn parses_full_latam_announcement() {
        let raw = candidate(
            "Transferência para LATAM Pass com 30% de bônus",
            "Transfira seus pontos Livelo para LATAM Pass e ganhe 30% de bônus. \
             Válido até 24/02/2025. Mínimo de 15.000 pontos.",
        );
        let promo = parse_candidate(&raw).unwrap().unwrap();

        assert_eq!(promo.airline, Airline::Latam);
        assert_eq!(promo.bonus_percentage, Some(30));
        assert_eq!(promo.valid_until, NaiveDate::from_ymd_opt(2025, 2, 24));
        assert_eq!(promo.minimum_points, Some(15_000));
        assert_eq!(promo.id, "latam-30-2025-02-24");
    }

    #[test]
    fn wording_differences_do_not_change_identity() {
        let a = candidate("Azul com 110% de bônus", "Válido até 30/09/2025.");
        let b = candidate(
            "Promoção TudoAzul",
            "Transfira agora e ganhe 110% de bônus até 30/09/2025!",
        );
        let parsed_a = parse_candidate(&a).unwrap().unwrap();
        let parsed_b = parse_candidate(&b).unwrap().unwrap();
        assert_eq!(parsed_a.id, parsed_b.id);
        assert_eq!(parsed_a.id, "azul-110-2025-09-30");
    }

    #[test]
    fn candidate_without_airline_keyword_is_dropped() {
        let raw = candidate("Ganhe pontos em supermercados", "Acumule 5 pontos por real.");
        assert_eq!(parse_candidate(&raw).unwrap(), None);

        let report = parse_candidates(&[raw, candidate("Smiles", "60% de bônus")]);
        assert_eq!(report.promotions.len(), 1);
        assert_eq!(report.unresolved_dropped, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn impossible_calendar_date_fails_the_record_only() {
        let bad = candidate("LATAM Pass", "30% de bônus até 31/02/2025");
        let good = candidate("Smiles", "60% de bônus até 09/10/2025");
        let report = parse_candidates(&[bad, good]);
        assert_eq!(report.promotions.len(), 1);
        assert_eq!(report.promotions[0].airline, Airline::Smiles);
        assert_eq!(report.failed, 1);
    }

    #[rstest]
    #[case("15 mil pontos", Some(15_000))]
    #[case("10.000 pontos", Some(10_000))]
    #[case("250 pontos", Some(250))]
    #[case("mínimo de 20k", Some(20_000))]
    #[case("sem requisito", None)]
    fn minimum_points_unit_conversion(#[case] text: &str, #[case] expected: Option<u64>) {
        assert_eq!(extract_minimum_points(text), expected);
    }

    #[rstest]
    #[case("40% de bônus", Some(40))]
    #[case("110% bônus", Some(110))]
    #[case("até 90% de bônus", Some(90))]
    #[case("40% de desconto", None)]
    fn bonus_extraction(#[case] text: &str, #[case] expected: Option<u32>) {
        assert_eq!(extract_bonus_percentage(text), expected);
    }

    #[test]
    fn missing_date_means_ongoing() {
        let raw = candidate("Azul Fidelidade", "Transferências com 110% de bônus");
        let promo = parse_candidate(&raw).unwrap().unwrap();
        assert_eq!(promo.valid_until, None);
        assert_eq!(promo.id, "azul-110-ongoing");
    }

    #[test]
    fn airline_dictionary_order_is_stable() {
        // "Azul" appears before "gol" in the text, but dictionary priority
        // decides: LATAM is checked first, then Azul, then Smiles.
        assert_eq!(identify_airline("gol e azul juntas"), Airline::Azul);
        assert_eq!(identify_airline("voe GOL com Smiles"), Airline::Smiles);
        assert_eq!(identify_airline("programa Avios da Iberia"), Airline::Iberia);
        assert_eq!(identify_airline("texto sem companhia"), Airline::Unresolved);
    }
}
