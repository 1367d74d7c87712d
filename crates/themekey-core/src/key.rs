//! # License Keys
//!
//! Defines [`LicenseKey`], the opaque unique identifier of an issued
//! license, and the generator that mints fresh keys against an exclusion
//! set.
//!
//! ## Key Format
//!
//! `LIC-` followed by three `-`-joined groups of four uppercase hex digits,
//! each group drawn from a cryptographically random 2-byte value:
//! `LIC-03AF-9C21-E004`. The 48-bit space makes birthday collisions
//! negligible at realistic issuance volumes, but the generator still
//! enforces uniqueness with an explicit retry loop against the supplied
//! exclusion set.

use std::collections::HashSet;

use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by every license key.
const KEY_PREFIX: &str = "LIC-";

/// Number of 4-hex-digit groups following the prefix.
const KEY_GROUPS: usize = 3;

/// A validated license key in `LIC-XXXX-XXXX-XXXX` form.
///
/// Immutable once created. Construct via [`LicenseKey::parse`] for
/// externally supplied strings or [`generate`] for fresh keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseKey(String);

/// Errors from parsing an externally supplied license key.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    /// The string does not match `LIC-XXXX-XXXX-XXXX`.
    #[error("malformed license key: {0:?}")]
    Malformed(String),
}

impl LicenseKey {
    /// Parse and validate an externally supplied license key.
    ///
    /// Accepts exactly the canonical form: the `LIC-` prefix followed by
    /// three groups of four uppercase hex digits. Lowercase hex is accepted
    /// and canonicalized to uppercase, since keys are retyped from emails.
    pub fn parse(s: &str) -> Result<Self, KeyError> {
        let trimmed = s.trim();
        let malformed = || KeyError::Malformed(s.to_string());

        let body = trimmed.strip_prefix(KEY_PREFIX).ok_or_else(malformed)?;
        let groups: Vec<&str> = body.split('-').collect();
        if groups.len() != KEY_GROUPS {
            return Err(malformed());
        }
        for group in &groups {
            if group.len() != 4 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(malformed());
            }
        }

        Ok(Self(format!(
            "{KEY_PREFIX}{}",
            body.to_ascii_uppercase()
        )))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LicenseKey {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<LicenseKey> for String {
    fn from(key: LicenseKey) -> Self {
        key.0
    }
}

/// Draw one random key, without uniqueness checks.
fn draw<R: RngCore>(rng: &mut R) -> LicenseKey {
    let mut groups = [0u16; KEY_GROUPS];
    for group in &mut groups {
        let mut bytes = [0u8; 2];
        rng.fill_bytes(&mut bytes);
        *group = u16::from_be_bytes(bytes);
    }
    LicenseKey(format!(
        "{KEY_PREFIX}{:04X}-{:04X}-{:04X}",
        groups[0], groups[1], groups[2]
    ))
}

/// Generate a fresh license key absent from `existing`.
///
/// Retries until the drawn key is outside the exclusion set. Callers in
/// production pass `&mut rand_core::OsRng`; tests may supply a
/// deterministic `RngCore`.
pub fn generate<R: RngCore>(rng: &mut R, existing: &HashSet<LicenseKey>) -> LicenseKey {
    loop {
        let key = draw(rng);
        if !existing.contains(&key) {
            return key;
        }
    }
}

/// Generate `count` fresh keys, unique among themselves and against
/// `existing`.
///
/// Each newly drawn key joins the exclusion set before the next draw, so
/// the returned sequence contains no intra-batch duplicates.
pub fn generate_batch<R: RngCore>(
    rng: &mut R,
    count: usize,
    existing: &HashSet<LicenseKey>,
) -> Vec<LicenseKey> {
    let mut taken = existing.clone();
    let mut batch = Vec::with_capacity(count);
    for _ in 0..count {
        let key = generate(rng, &taken);
        taken.insert(key.clone());
        batch.push(key);
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    /// Deterministic RNG yielding a fixed byte sequence, cycling.
    struct SequenceRng {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl SequenceRng {
        fn new(bytes: Vec<u8>) -> Self {
            Self { bytes, pos: 0 }
        }
    }

    impl RngCore for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0u8; 4];
            self.fill_bytes(&mut buf);
            u32::from_be_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf);
            u64::from_be_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest.iter_mut() {
                *byte = self.bytes[self.pos % self.bytes.len()];
                self.pos += 1;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    // ── Format tests ─────────────────────────────────────────────────

    #[test]
    fn generated_key_matches_format() {
        let key = generate(&mut OsRng, &HashSet::new());
        let s = key.as_str();
        assert!(s.starts_with("LIC-"));
        assert_eq!(s.len(), "LIC-XXXX-XXXX-XXXX".len());
        let groups: Vec<&str> = s["LIC-".len()..].split('-').collect();
        assert_eq!(groups.len(), 3);
        for group in groups {
            assert_eq!(group.len(), 4);
            assert!(group
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn parse_accepts_canonical_form() {
        let key = LicenseKey::parse("LIC-03AF-9C21-E004").unwrap();
        assert_eq!(key.as_str(), "LIC-03AF-9C21-E004");
    }

    #[test]
    fn parse_uppercases_hex() {
        let key = LicenseKey::parse("LIC-03af-9c21-e004").unwrap();
        assert_eq!(key.as_str(), "LIC-03AF-9C21-E004");
    }

    #[test]
    fn parse_trims_whitespace() {
        let key = LicenseKey::parse("  LIC-0000-0000-0000  ").unwrap();
        assert_eq!(key.as_str(), "LIC-0000-0000-0000");
    }

    #[test]
    fn parse_rejects_bad_input() {
        for bad in [
            "",
            "LIC-",
            "0000-0000-0000",
            "LIC-0000-0000",
            "LIC-0000-0000-0000-0000",
            "LIC-000-0000-0000",
            "LIC-00000-0000-0000",
            "LIC-GGGG-0000-0000",
            "lic-0000-0000-0000",
        ] {
            assert!(LicenseKey::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn serde_roundtrip_validates() {
        let key = LicenseKey::parse("LIC-ABCD-1234-EF00").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"LIC-ABCD-1234-EF00\"");
        let parsed: LicenseKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
        assert!(serde_json::from_str::<LicenseKey>("\"not-a-key\"").is_err());
    }

    // ── Generator tests ──────────────────────────────────────────────

    #[test]
    fn generate_retries_past_collisions() {
        // First draw collides with the exclusion set (all zero bytes),
        // forcing the retry branch; second draw (all 0x11) is fresh.
        let mut rng = SequenceRng::new(vec![
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LIC-0000-0000-0000
            0x11, 0x11, 0x11, 0x11, 0x11, 0x11, // LIC-1111-1111-1111
        ]);
        let existing: HashSet<LicenseKey> =
            [LicenseKey::parse("LIC-0000-0000-0000").unwrap()].into();

        let key = generate(&mut rng, &existing);
        assert_eq!(key.as_str(), "LIC-1111-1111-1111");
    }

    #[test]
    fn batch_is_unique_within_itself_and_against_existing() {
        let existing: HashSet<LicenseKey> = generate_batch(&mut OsRng, 8, &HashSet::new())
            .into_iter()
            .collect();

        let batch = generate_batch(&mut OsRng, 32, &existing);
        assert_eq!(batch.len(), 32);

        let distinct: HashSet<&LicenseKey> = batch.iter().collect();
        assert_eq!(distinct.len(), 32, "batch contains duplicates");
        for key in &batch {
            assert!(!existing.contains(key), "batch reused existing key {key}");
        }
    }

    #[test]
    fn batch_of_zero_is_empty() {
        let batch = generate_batch(&mut OsRng, 0, &HashSet::new());
        assert!(batch.is_empty());
    }

    #[test]
    fn batch_threads_exclusion_set_between_draws() {
        // RNG repeats the same 6 bytes then moves on: without threading the
        // exclusion set, the batch would contain two identical keys.
        let mut rng = SequenceRng::new(vec![
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, // first draw
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, // colliding second draw
            0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0xBB, // retry succeeds
        ]);
        let batch = generate_batch(&mut rng, 2, &HashSet::new());
        assert_eq!(batch[0].as_str(), "LIC-AAAA-AAAA-AAAA");
        assert_eq!(batch[1].as_str(), "LIC-BBBB-BBBB-BBBB");
    }
}
