use once_cell::sync::Lazy;
use regex::Regex;

/// Shown when a card lists no price; the buyer checks the ticketing site.
pub const PRICE_NOT_LISTED: &str = "Biletix/Bubilet";

const CURRENCY_SUFFIX: &str = "TL";

static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]{2,4})\s*(?:TL|₺)").expect("valid currency regex"));

static BARE_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{3,4}\b").expect("valid amount regex"));

type PriceRule = fn(&str) -> Option<String>;

/// Price rules, tried in order
const PRICE_RULES: &[PriceRule] = &[currency_marked, last_bare_amount];

/// Finds a displayable price in card text, or the "not listed" sentinel.
pub fn extract_price(text: &str) -> String {
    let flat = text.replace('\n', " ");
    PRICE_RULES
        .iter()
        .find_map(|rule| rule(flat.trim()))
        .unwrap_or_else(|| PRICE_NOT_LISTED.to_string())
}

fn currency_marked(text: &str) -> Option<String> {
    CURRENCY_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|digits| format!("{} {}", digits.as_str(), CURRENCY_SUFFIX))
}

/// Trailing numbers on a card are usually the price; leading ones are
/// dates and times.
fn last_bare_amount(text: &str) -> Option<String> {
    BARE_AMOUNT_RE
        .find_iter(text)
        .last()
        .map(|m| format!("{} {}", m.as_str(), CURRENCY_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_marked_amount() {
        assert_eq!(extract_price("Zorlu PSM\n20 Kasım 2025 21:00\n350 TL"), "350 TL");
    }

    #[test]
    fn lira_sign_and_lowercase_marker() {
        assert_eq!(extract_price("Mabel Matiz 2200₺"), "2200 TL");
        assert_eq!(extract_price("Giriş 450 tl"), "450 TL");
        assert_eq!(extract_price("Giriş 450TL"), "450 TL");
    }

    #[test]
    fn last_bare_number_without_currency() {
        assert_eq!(extract_price("Ekim 2025 konseri\nBiletler 275"), "275 TL");
    }

    #[test]
    fn currency_rule_beats_bare_numbers() {
        assert_eq!(extract_price("80 TL\nSalon 1200"), "80 TL");
    }

    #[test]
    fn currency_amount_needs_two_to_four_digits() {
        assert_eq!(extract_price("Giriş 5 TL"), PRICE_NOT_LISTED);
        assert_eq!(extract_price("Loca 12345 TL"), "2345 TL");
    }

    #[test]
    fn five_digit_bare_number_is_not_a_price() {
        assert_eq!(extract_price("Duman\nKapasite 12000"), PRICE_NOT_LISTED);
    }

    #[test]
    fn nothing_price_like() {
        assert_eq!(extract_price("Duman\nKüçükÇiftlik Park\n21:00"), PRICE_NOT_LISTED);
        assert_eq!(extract_price(""), PRICE_NOT_LISTED);
    }
}
