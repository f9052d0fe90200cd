//! US-location and internship-title predicates.
//!
//! The two predicates are deliberately separate; the filter composes them and
//! adds the empty/remote location carve-out.

use crate::models::JobCard;

const INTERN_KEYWORDS: &[&str] = &["intern", "internship"];

/// Non-US places, matched as whole words. Any hit rejects the location before
/// positive evidence is considered, so "Remote (Bangalore, India)" is not a US
/// location.
const NON_US_KEYWORDS: &[&str] = &[
    "india", "bangalore", "bengaluru", "hyderabad", "mumbai", "delhi", "gurgaon", "gurugram",
    "noida", "pune", "chennai", "kolkata", "united kingdom", "england", "scotland", "london",
    "manchester", "edinburgh", "ireland", "canada", "toronto", "vancouver", "montreal",
    "mexico", "brazil", "são paulo", "sao paulo", "argentina", "buenos aires", "colombia",
    "bogota", "chile", "santiago", "germany", "berlin", "munich", "hamburg", "france",
    "spain", "madrid", "barcelona", "portugal", "lisbon", "netherlands", "amsterdam",
    "switzerland", "zurich", "sweden", "stockholm", "poland", "warsaw", "krakow", "ukraine",
    "kyiv", "israel", "tel aviv", "singapore", "japan", "tokyo", "china", "beijing",
    "shanghai", "shenzhen", "hong kong", "taiwan", "taipei", "korea", "seoul", "vietnam",
    "philippines", "manila", "indonesia", "jakarta", "australia", "sydney", "new zealand",
    "nigeria", "lagos", "kenya", "nairobi", "egypt", "cairo", "south africa", "dubai",
    "united arab emirates", "uae", "uk", "eu", "emea", "apac", "latam", "europe",
];

const US_STATE_CODES: &[&str] = &[
    "al", "ak", "az", "ar", "ca", "co", "ct", "de", "fl", "ga", "hi", "id", "il", "in", "ia",
    "ks", "ky", "la", "me", "md", "ma", "mi", "mn", "ms", "mo", "mt", "ne", "nv", "nh", "nj",
    "nm", "ny", "nc", "nd", "oh", "ok", "or", "pa", "ri", "sc", "sd", "tn", "tx", "ut", "vt",
    "va", "wa", "wv", "wi", "wy", "dc",
];

const US_KEYWORDS: &[&str] = &[
    "united states", "usa", "u.s.", "remote", "san francisco", "bay area", "silicon valley",
    "new york", "nyc", "brooklyn", "seattle", "austin", "boston", "cambridge, ma",
    "los angeles", "santa monica", "chicago", "denver", "boulder", "atlanta", "miami",
    "palo alto", "menlo park", "mountain view", "sunnyvale", "san jose", "san mateo",
    "redwood city", "santa clara", "oakland", "berkeley", "san diego", "irvine", "portland",
    "salt lake city", "phoenix", "dallas", "houston", "raleigh", "durham", "pittsburgh",
    "philadelphia", "washington", "minneapolis", "nashville", "detroit", "columbus",
];

pub fn is_intern_title(title: &str) -> bool {
    let title = title.to_lowercase();
    INTERN_KEYWORDS.iter().any(|keyword| title.contains(keyword))
}

pub fn is_us_location(location: &str) -> bool {
    if location.trim().is_empty() {
        return false;
    }

    let lower = location.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| c == ',' || c.is_whitespace() || c == '(' || c == ')' || c == '/')
        .filter(|token| !token.is_empty())
        .collect();

    if NON_US_KEYWORDS.iter().any(|keyword| contains_word(&lower, keyword)) {
        return false;
    }

    if tokens.iter().any(|token| US_STATE_CODES.contains(token)) {
        return true;
    }

    US_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Whole-word containment: "india" must not match "indianapolis".
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Internship titles located in the US, or with no location or a remote one.
pub fn is_us_intern(card: &JobCard) -> bool {
    if !is_intern_title(&card.title) {
        return false;
    }
    let location = card.location.trim();
    location.is_empty() || location.to_lowercase().contains("remote") || is_us_location(location)
}

pub fn retain_us_interns(cards: &[JobCard]) -> Vec<JobCard> {
    cards.iter().filter(|card| is_us_intern(card)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, location: &str) -> JobCard {
        JobCard {
            title: title.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn intern_titles_are_case_insensitive() {
        assert!(is_intern_title("Software Engineering Intern"));
        assert!(is_intern_title("INTERNSHIP Program"));
        assert!(!is_intern_title("Senior Software Engineer"));
    }

    #[test]
    fn us_locations() {
        assert!(is_us_location("San Francisco, CA"));
        assert!(is_us_location("Remote"));
        assert!(is_us_location("Austin, TX"));
        assert!(is_us_location("Washington, DC"));
        assert!(is_us_location("United States"));
        assert!(!is_us_location("Bangalore, India"));
        assert!(!is_us_location(""));
        assert!(!is_us_location("Lagos"));
    }

    #[test]
    fn negative_keywords_override_positive_evidence() {
        assert!(!is_us_location("Remote (Bangalore, India)"));
        assert!(!is_us_location("New York or London"));
        assert!(!is_us_location("Austin, TX / Toronto, ON"));
        assert!(!is_us_location("Remote - UK"));
    }

    #[test]
    fn negative_keywords_only_match_whole_words() {
        assert!(is_us_location("Milwaukee, WI"));
        assert!(is_us_location("Indianapolis, IN"));
    }

    #[test]
    fn filter_keeps_empty_and_remote_locations() {
        assert!(is_us_intern(&card("Data Intern", "")));
        assert!(is_us_intern(&card("Design Intern", "Remote")));
        assert!(!is_us_intern(&card("Backend Intern", "London, UK")));
        assert!(!is_us_intern(&card("Backend Engineer", "Austin, TX")));
    }

    #[test]
    fn retain_preserves_order() {
        let cards = vec![
            card("ML Intern", "Seattle, WA"),
            card("Staff Engineer", "Seattle, WA"),
            card("Data Intern", ""),
            card("Backend Intern", "Berlin, Germany"),
        ];
        let kept: Vec<String> = retain_us_interns(&cards).into_iter().map(|c| c.title).collect();
        assert_eq!(kept, vec!["ML Intern", "Data Intern"]);
    }
}
