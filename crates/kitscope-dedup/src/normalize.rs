//! Canonical forms for free-text manufacturer and model strings.
//!
//! Two model normalizers exist on purpose: the exact matcher needs a coarse key
//! that erases separator noise, the fuzzy matcher needs separators kept so that
//! similarity scores still see the model's structure.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;

/// Cleaned alias -> canonical manufacturer name.
static MANUFACTURER_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("AP SYSTEM", "APSYSTEMS"),
        ("APSYSTEM", "APSYSTEMS"),
        ("APS", "APSYSTEMS"),
        ("ENPHASE", "ENPHASE"),
        ("ENPHASE ENERGY", "ENPHASE"),
        ("HANWHA Q CELLS", "HANWHA Q CELLS"),
        ("Q CELLS", "HANWHA Q CELLS"),
        ("QCELLS", "HANWHA Q CELLS"),
        ("HANWHA", "HANWHA Q CELLS"),
        ("SOLAREDGE", "SOLAREDGE"),
        ("SOLAR EDGE", "SOLAREDGE"),
        ("TESLA", "TESLA"),
        ("TESLA ENERGY", "TESLA"),
        ("CHILICON POWER", "CHILICON POWER"),
        ("CHILICON", "CHILICON POWER"),
        ("APTOS SOLAR", "APTOS SOLAR"),
        ("APTOS", "APTOS SOLAR"),
        ("HOYMILES", "HOYMILES"),
        ("FRANKLIN", "FRANKLIN"),
        ("FRANKLIN ENERGY", "FRANKLIN"),
        ("GENERAC", "GENERAC"),
        ("GENERAC POWER SYSTEMS", "GENERAC"),
        ("CANADIAN SOLAR", "CANADIAN SOLAR"),
        ("CANADIANSOLAR", "CANADIAN SOLAR"),
        ("JA SOLAR", "JA SOLAR"),
        ("JASOLAR", "JA SOLAR"),
        ("TRINA SOLAR", "TRINA SOLAR"),
        ("TRINA", "TRINA SOLAR"),
        ("PANASONIC", "PANASONIC"),
        ("LG", "LG"),
        ("LG ELECTRONICS", "LG"),
        ("REC SOLAR", "REC SOLAR"),
        ("REC", "REC SOLAR"),
        ("SILFAB SOLAR", "SILFAB SOLAR"),
        ("SILFAB", "SILFAB SOLAR"),
        ("MISSION SOLAR", "MISSION SOLAR"),
        ("MISSION", "MISSION SOLAR"),
        // "U.S. SOLAR" lands here once the dots are stripped.
        ("US SOLAR", "US SOLAR"),
    ]
    .into_iter()
    .collect()
});

/// Canonical manufacturer name for a raw string.
///
/// Trims, uppercases, drops `.` and `,`, collapses whitespace, then applies
/// the alias table. Unknown names come back cleaned but otherwise unchanged.
/// Idempotent for every input.
pub fn normalize_manufacturer(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let stripped: String = upper.chars().filter(|c| !matches!(c, '.' | ',')).collect();
    let cleaned = collapse_whitespace(&stripped);

    match lookup_manufacturer(&cleaned) {
        Some(canonical) => canonical.to_string(),
        None => cleaned,
    }
}

/// Raw alias lookup on an already-cleaned manufacturer string.
fn lookup_manufacturer(cleaned: &str) -> Option<&'static str> {
    MANUFACTURER_ALIASES.get(cleaned).copied()
}

/// Distinct canonical manufacturer names known to the alias table, sorted.
pub fn canonical_manufacturers() -> Vec<&'static str> {
    MANUFACTURER_ALIASES
        .values()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Model form used by the fuzzy matcher: trimmed, uppercased, single-spaced.
/// Separators such as `-`, `_` and `/` are preserved.
pub fn normalize_model_fuzzy(raw: &str) -> String {
    collapse_whitespace(&raw.to_uppercase())
}

/// Model form used by the exact matcher.
///
/// Starts from [`normalize_model_fuzzy`] and removes `-`, `_`, `/`, `.` and
/// spaces, so `SUN-240`, `SUN 240` and `SUN240` share one key.
pub fn normalize_model_exact(raw: &str) -> String {
    normalize_model_fuzzy(raw)
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '/' | '.' | ' '))
        .collect()
}

/// True when a record's manufacturer should be rewritten.
///
/// Case-only differences do not count: the raw value is trimmed and
/// uppercased before it is compared with its canonical form.
pub fn manufacturer_needs_update(raw: &str) -> bool {
    raw.trim().to_uppercase() != normalize_manufacturer(raw)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_aliases() {
        assert_eq!(normalize_manufacturer("Q.Cells"), "HANWHA Q CELLS");
        assert_eq!(normalize_manufacturer("Q CELLS"), "HANWHA Q CELLS");
        assert_eq!(normalize_manufacturer("qcells"), "HANWHA Q CELLS");
        assert_eq!(normalize_manufacturer("  Enphase   Energy "), "ENPHASE");
        assert_eq!(normalize_manufacturer("U.S. Solar"), "US SOLAR");
        assert_eq!(normalize_manufacturer("Generac Power Systems,"), "GENERAC");
    }

    #[test]
    fn test_unmapped_manufacturer_is_cleaned() {
        assert_eq!(normalize_manufacturer("Generic Corp"), "GENERIC CORP");
        assert_eq!(normalize_manufacturer("Acme, Inc."), "ACME INC");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize_manufacturer(""), "");
        assert_eq!(normalize_manufacturer("   "), "");
        assert_eq!(normalize_model_fuzzy(""), "");
        assert_eq!(normalize_model_exact(" \t "), "");
    }

    #[test]
    fn test_manufacturer_idempotent() {
        let inputs = [
            "Q.Cells",
            "Generic Corp",
            "A . B",
            "x ,",
            "  solar   edge ",
            "straße",
            "",
            "APS",
        ];
        for input in inputs {
            let once = normalize_manufacturer(input);
            assert_eq!(normalize_manufacturer(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_canonical_names_are_fixed_points() {
        for name in canonical_manufacturers() {
            assert_eq!(normalize_manufacturer(name), name);
        }
    }

    #[test]
    fn test_canonical_manufacturers_sorted_and_distinct() {
        let names = canonical_manufacturers();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(names.contains(&"HANWHA Q CELLS"));
        assert_eq!(lookup_manufacturer("SOLAR EDGE"), Some("SOLAREDGE"));
        assert_eq!(lookup_manufacturer("solar edge"), None);
    }

    #[test]
    fn test_model_variants_diverge_on_separators() {
        assert_eq!(normalize_model_fuzzy(" sun-240 "), "SUN-240");
        assert_eq!(normalize_model_exact(" sun-240 "), "SUN240");
        assert_eq!(normalize_model_exact("SUN240"), "SUN240");
        assert_eq!(normalize_model_exact("sun_240/b"), "SUN240B");
        assert_eq!(normalize_model_fuzzy("IQ8   A"), "IQ8 A");
    }

    #[test]
    fn test_exact_model_scenario() {
        assert_eq!(normalize_model_exact("Q.PEAK-DUO-400"), "QPEAKDUO400");
        assert_eq!(normalize_model_exact("QPEAK DUO 400"), "QPEAKDUO400");
    }

    #[test]
    fn test_manufacturer_needs_update() {
        assert!(manufacturer_needs_update("Q.Cells"));
        assert!(manufacturer_needs_update("Enphase Energy"));
        assert!(manufacturer_needs_update("Generic Corp."));
        assert!(!manufacturer_needs_update("Enphase"));
        assert!(!manufacturer_needs_update(" Generic Corp "));
        assert!(!manufacturer_needs_update(""));
    }
}
