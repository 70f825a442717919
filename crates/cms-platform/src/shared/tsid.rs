//! TSID Generator
//!
//! Generates Time-Sorted IDs as 13-character Crockford Base32 strings.

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

static COUNTER: AtomicU16 = AtomicU16::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new TSID, e.g. "0HZXEQ5Y8JY5Z".
    ///
    /// Layout (64 bits):
    /// - 42 bits: milliseconds since epoch
    /// - 10 bits: random
    /// - 12 bits: counter (4096 ids per millisecond)
    pub fn generate() -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let counter = COUNTER.fetch_add(1, Ordering::SeqCst) as u64;
        let random = u64::from(rand::random::<u16>()) & 0x3FF;

        let tsid = ((now & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | (counter & 0xFFF);
        encode_crockford(tsid)
    }

    pub fn to_long(tsid: &str) -> Option<i64> {
        decode_crockford(tsid).map(|v| v as i64)
    }

    pub fn from_long(value: i64) -> String {
        encode_crockford(value as u64)
    }

    /// Normalize a loosely supplied identifier. Anything that is not a
    /// well-formed TSID becomes the empty default identifier.
    pub fn parse_or_default(value: &str) -> String {
        let value = value.trim();
        match decode_crockford(value) {
            Some(decoded) => encode_crockford(decoded),
            None => String::new(),
        }
    }
}

fn encode_crockford(mut value: u64) -> String {
    let mut result = [b'0'; 13];
    for slot in result.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }
    result.iter().map(|&b| b as char).collect()
}

fn decode_crockford(s: &str) -> Option<u64> {
    if s.len() != 13 {
        return None;
    }

    let mut result: u64 = 0;
    for c in s.chars() {
        let c = c.to_ascii_uppercase();
        let val = match c {
            '0'..='9' => c as u64 - '0' as u64,
            'A'..='H' => c as u64 - 'A' as u64 + 10,
            'J'..='K' => c as u64 - 'J' as u64 + 18,
            'M'..='N' => c as u64 - 'M' as u64 + 20,
            'P'..='T' => c as u64 - 'P' as u64 + 22,
            'V'..='Z' => c as u64 - 'V' as u64 + 27,
            _ => return None,
        };
        result = (result << 5) | val;
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_tsid() {
        assert_eq!(TsidGenerator::generate().len(), 13);
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(TsidGenerator::generate()), "Duplicate TSID generated");
        }
    }

    #[test]
    fn test_round_trip() {
        let id = TsidGenerator::generate();
        let num = TsidGenerator::to_long(&id).unwrap();
        assert_eq!(TsidGenerator::from_long(num), id);
    }

    #[test]
    fn test_parse_or_default() {
        let id = TsidGenerator::generate();
        assert_eq!(TsidGenerator::parse_or_default(&id.to_lowercase()), id);
        assert_eq!(TsidGenerator::parse_or_default(&format!(" {} ", id)), id);
        assert_eq!(TsidGenerator::parse_or_default("not-an-id"), "");
        assert_eq!(TsidGenerator::parse_or_default(""), "");
    }
}
