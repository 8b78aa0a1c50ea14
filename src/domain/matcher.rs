//! Fuzzy payer-name matching against the roster.
//!
//! Payment rails report payer names as free text, so comparison happens on a
//! canonical key: lowercase, diacritics stripped, whitespace removed. Two
//! names match when either normalized key contains the other.

use crate::domain::student::Student;

/// Canonical comparison key for a name. Idempotent.
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Resolves a payer name to a roster entry by bidirectional containment of
/// the normalized keys. The first roster entry in iteration order wins; no
/// tie-break is applied when several entries would match.
pub fn resolve<'a>(payer_name: &str, roster: &'a [Student]) -> Option<&'a Student> {
    let payer = normalize(payer_name);
    roster.iter().find(|student| {
        let candidate = normalize(&student.name);
        candidate.contains(&payer) || payer.contains(&candidate)
    })
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}
