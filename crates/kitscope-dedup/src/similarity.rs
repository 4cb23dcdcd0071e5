//! String similarity on a 0–100 scale, backed by `rapidfuzz`.

use rapidfuzz::distance::indel;

/// Normalized Indel similarity: `100 * (len_a + len_b - indel) / (len_a + len_b)`,
/// counted in chars.
///
/// Two empty strings are identical and score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }

    let distance = indel::distance(a.chars(), b.chars());
    100.0 * (total - distance) as f64 / total as f64
}

/// [`ratio`] after splitting on whitespace, sorting the tokens and rejoining
/// them with single spaces. Insensitive to word order and spacing runs.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_basics() {
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("abc", ""), 0.0);
        assert_eq!(ratio("abc", "abc"), 100.0);
        assert_eq!(ratio("abcd", "abce"), 75.0);
    }

    #[test]
    fn test_token_sort_ignores_order_and_spacing() {
        assert_eq!(token_sort_ratio("fuzzy wuzzy", "wuzzy fuzzy"), 100.0);
        assert_eq!(token_sort_ratio("IQ8  PLUS", " PLUS IQ8"), 100.0);
    }

    #[test]
    fn test_pinned_equipment_scores() {
        // One token vs two tokens: "ENPHASE|IQ8A" against "A ENPHASE|IQ8".
        assert_eq!(token_sort_ratio("ENPHASE|IQ8A", "ENPHASE|IQ8 A"), 88.0);
        assert_eq!(
            token_sort_ratio("SOLAREDGE|SE7600H-US", "SOLAREDGE|SE3800H-US"),
            90.0
        );
        assert_eq!(
            token_sort_ratio("SOLAREDGE|SE7600H-US", "SOLAREDGE|SE7600H US"),
            95.0
        );
        assert_eq!(token_sort_ratio("GENERIC|ABC", "OTHER|XYZ"), 30.0);
    }

    #[test]
    fn test_ratio_is_symmetric() {
        let pairs = [
            ("ENPHASE|IQ7PLUS", "ENPHASE|IQ7PLUS-72-2"),
            ("TESLA|POWERWALL 2", "TESLA|POWERWALL 3"),
        ];
        for (a, b) in pairs {
            assert_eq!(token_sort_ratio(a, b), token_sort_ratio(b, a));
        }
    }

    #[test]
    fn test_ratio_tracks_indel_distance() {
        // Sorted tokens: "ENPHASE|IQ8A" against "A ENPHASE|IQ8", three edits apart.
        assert_eq!(indel::distance("ENPHASE|IQ8A".chars(), "A ENPHASE|IQ8".chars()), 3);
        assert_eq!(ratio("ENPHASE|IQ8A", "A ENPHASE|IQ8"), 88.0);
    }

    #[test]
    fn test_ratio_counts_chars_not_bytes() {
        assert_eq!(ratio("ÉTÉ", "ETE"), 100.0 * 2.0 / 6.0);
    }
}
