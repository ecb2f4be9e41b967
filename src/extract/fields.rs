use crate::models::UNKNOWN_VENUE;

/// Substrings that mark a line as a venue name. Matching is case-sensitive.
pub const VENUE_KEYWORDS: &[&str] = &[
    "Sahne", "Merkezi", "Hall", "Club", "Park", "Pub", "Jolly", "IF", "Dorock", "Vadi", "Arena",
    "Tiyatro",
];

type VenueRule = fn(&[&str]) -> Option<String>;

/// Venue rules, tried in order
const VENUE_RULES: &[VenueRule] = &[venue_by_keyword, venue_by_position];

/// Title and venue located in a card's lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFields {
    pub title: String,
    pub venue: String,
}

/// Picks the title and venue out of segmented lines.
///
/// Returns `None` only when there are no lines at all.
pub fn locate(lines: &[&str]) -> Option<LocatedFields> {
    let title = lines.first()?.to_string();
    let venue = VENUE_RULES
        .iter()
        .find_map(|rule| rule(lines))
        .unwrap_or_else(|| UNKNOWN_VENUE.to_string());

    Some(LocatedFields { title, venue })
}

fn venue_by_keyword(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find(|line| VENUE_KEYWORDS.iter().any(|kw| line.contains(kw)))
        .map(|line| line.to_string())
}

fn venue_by_position(lines: &[&str]) -> Option<String> {
    lines.get(1).map(|line| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_line_wins_over_position() {
        let lines = ["Duman", "25 Ekim 21:00", "KüçükÇiftlik Park", "Zorlu Sahne"];
        let fields = locate(&lines).unwrap();
        assert_eq!(fields.title, "Duman");
        assert_eq!(fields.venue, "KüçükÇiftlik Park");
    }

    #[test]
    fn falls_back_to_second_line() {
        let lines = ["Kayhan Kalhor & Erdal Erzincan", "Zorlu PSM", "350 TL"];
        assert_eq!(locate(&lines).unwrap().venue, "Zorlu PSM");
    }

    #[test]
    fn single_line_gets_unknown_venue() {
        let fields = locate(&["Yalnız Başlık"]).unwrap();
        assert_eq!(fields.title, "Yalnız Başlık");
        assert_eq!(fields.venue, UNKNOWN_VENUE);
    }

    #[test]
    fn keyword_match_is_case_sensitive() {
        let lines = ["Konser", "Kadıköy", "hall of fame"];
        assert_eq!(locate(&lines).unwrap().venue, "Kadıköy");
    }

    #[test]
    fn no_lines_no_fields() {
        assert!(locate(&[]).is_none());
    }
}
