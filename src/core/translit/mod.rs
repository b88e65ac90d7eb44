//! Latin → Cyrillic transliteration.
//!
//! Longest-match by table order: at every Latin position the multi-character
//! patterns are tried first, in the order they were configured, then the
//! single-character map. Case is restored per matched segment.

mod table;

pub use table::{MappingTable, MultiPattern, TableConfig};

/// Case-preserving transducer over a fixed `MappingTable`.
#[derive(Debug, Clone, Default)]
pub struct Transliterator {
    table: MappingTable,
}

impl Transliterator {
    pub fn new(table: MappingTable) -> Self {
        Self { table }
    }

    pub fn transliterate(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let lower: Vec<char> = chars.iter().map(|c| c.to_ascii_lowercase()).collect();
        let mut out = String::with_capacity(text.len() * 2);
        let mut i = 0;

        while i < chars.len() {
            if !is_latin_or_apostrophe(lower[i]) {
                out.push(chars[i]);
                i += 1;
                continue;
            }

            if let Some(pattern) = self.match_multi(&lower[i..]) {
                let len = pattern.latin.len();
                out.push_str(&apply_case(&chars[i..i + len], &pattern.cyrillic));
                i += len;
                continue;
            }

            match self.table.single(lower[i]) {
                Some(mapped) => out.push_str(&apply_case(&chars[i..i + 1], mapped)),
                None => out.push(chars[i]),
            }
            i += 1;
        }

        out
    }

    fn match_multi(&self, rest: &[char]) -> Option<&MultiPattern> {
        self.table
            .multi()
            .iter()
            .find(|p| rest.len() >= p.latin.len() && rest[..p.latin.len()] == p.latin[..])
    }
}

fn is_latin_or_apostrophe(lower: char) -> bool {
    lower.is_ascii_lowercase() || lower == '\''
}

/// SH → Ш, Sh → Ш, sh and sH → ш (the replacement as stored).
fn apply_case(source: &[char], replacement: &str) -> String {
    if is_all_upper(source) {
        return replacement.to_uppercase();
    }

    if let Some((first, rest)) = source.split_first() {
        if first.is_uppercase() && is_all_lower(rest) {
            return capitalize(replacement);
        }
    }

    replacement.to_string()
}

fn is_all_upper(segment: &[char]) -> bool {
    segment.iter().any(|c| c.is_uppercase()) && !segment.iter().any(|c| c.is_lowercase())
}

fn is_all_lower(segment: &[char]) -> bool {
    segment.iter().any(|c| c.is_lowercase()) && !segment.iter().any(|c| c.is_uppercase())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}

/// True if the name contains at least one Cyrillic letter.
pub fn has_cyrillic(s: &str) -> bool {
    s.chars().any(|c| {
        matches!(c, '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}') && c.is_alphabetic()
    })
}
