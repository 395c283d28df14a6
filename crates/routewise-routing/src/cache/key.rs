//! Cache key derivation.
//!
//! Keys must stay byte-compatible with existing deployments: the
//! normalization and the 32-bit string hash below reproduce the established
//! format exactly, including its quirks (ASCII-only word characters, a
//! punctuation strip that runs after whitespace collapsing).

use routewise_core::{Priority, TaskCategory};

/// Lowercases, trims, collapses whitespace runs to one space, then strips
/// every character that is not an ASCII word character or whitespace.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || ch.is_whitespace())
        .collect()
}

/// `hash = hash * 31 + unit` over UTF-16 code units with 32-bit wraparound,
/// rendered as the base-36 absolute value.
pub fn fingerprint_hash(normalized: &str) -> String {
    let hash = normalized.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    to_base36(hash.unsigned_abs())
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(char::from(DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Derived key for one request: the map key plus the normalized text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub key: String,
    pub fingerprint: String,
}

impl CacheKey {
    pub fn new(input: &str, category: TaskCategory, priority: Priority) -> Self {
        let fingerprint = normalize(input);
        let key = format!("{category}:{priority}:{}", fingerprint_hash(&fingerprint));
        Self { key, fingerprint }
    }
}
