//! Deterministic feature encoding for `(name, gender)` pairs.
//!
//! Both the predictive model and the historical rank table key off the same
//! fixed-width encoding, so this module is the single source of truth for
//! the layout: one gender bit followed by [`NAME_WIDTH`] character codes.
//! Encoding is total - any input string maps to a vector, with unknown
//! characters collapsing to the pad code.

use serde::{Deserialize, Serialize};

/// Number of character slots in an encoded name.
///
/// Names shorter than this are padded with the space code; longer names are
/// silently truncated. The historical artifacts were built with the same
/// truncation, so changing this invalidates every stored key.
pub const NAME_WIDTH: usize = 15;

/// Total feature-vector length: gender bit + character codes.
pub const FEATURE_LEN: usize = 1 + NAME_WIDTH;

/// Gender indicator carried in the first feature slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Gender {
    /// The feature-vector encoding of the gender: `F` = 0, `M` = 1.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }
}

impl core::str::FromStr for Gender {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" | "f" => Ok(Self::Female),
            "M" | "m" => Ok(Self::Male),
            other => Err(crate::Error::InvalidRequest {
                reason: format!("gender must be F or M, got {other:?}"),
            }),
        }
    }
}

impl core::fmt::Display for Gender {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::Female => write!(f, "F"),
            Self::Male => write!(f, "M"),
        }
    }
}

/// Fixed-width numeric encoding of a `(gender, name)` pair.
///
/// `Eq + Hash` so it can key the historical table directly.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FeatureVector([u8; FEATURE_LEN]);

impl FeatureVector {
    /// The raw slots: gender bit first, then [`NAME_WIDTH`] character codes.
    pub const fn as_bytes(&self) -> &[u8; FEATURE_LEN] {
        &self.0
    }

    pub const fn gender_bit(&self) -> u8 {
        self.0[0]
    }
}

/// Maps a character to its code in the closed alphabet.
///
/// Space is 0, `a`..`z` are 1..=26. Anything outside the alphabet falls
/// back to the pad code so encoding never fails.
const fn char_code(c: char) -> u8 {
    match c {
        'a'..='z' => c as u8 - b'a' + 1,
        _ => 0,
    }
}

/// Encodes a `(name, gender)` pair into a [`FeatureVector`].
///
/// Lowercases the input, maps each character through the closed alphabet,
/// and pads or truncates to [`NAME_WIDTH`]. Total over all inputs,
/// including the empty string.
pub fn encode(name: &str, gender: Gender) -> FeatureVector {
    let mut slots = [0_u8; FEATURE_LEN];
    slots[0] = gender.bit();

    let lowered = name.to_lowercase();
    for (slot, c) in slots[1..].iter_mut().zip(lowered.chars()) {
        *slot = char_code(c);
    }

    FeatureVector(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_layout_is_gender_bit_plus_codes() {
        let v = encode("abz", Gender::Male);
        assert_eq!(v.gender_bit(), 1);
        assert_eq!(&v.as_bytes()[1..4], &[1, 2, 26]);
        // Remainder is padded with the space code.
        assert!(v.as_bytes()[4..].iter().all(|&c| c == 0));
    }

    #[test]
    fn encoding_is_case_insensitive() {
        assert_eq!(encode("Emma", Gender::Female), encode("eMMA", Gender::Female));
    }

    #[test]
    fn genders_encode_to_distinct_vectors() {
        assert_ne!(encode("emma", Gender::Female), encode("emma", Gender::Male));
    }

    #[test]
    fn encoding_is_total() {
        // Empty, over-length, and out-of-alphabet inputs all encode.
        encode("", Gender::Female);
        encode(&"a".repeat(1000), Gender::Male);
        let odd = encode("x-æ a12!", Gender::Female);
        assert_eq!(odd.as_bytes().len(), FEATURE_LEN);
    }

    #[test]
    fn over_length_names_truncate_to_width() {
        let long = encode(&"a".repeat(40), Gender::Female);
        let exact = encode(&"a".repeat(NAME_WIDTH), Gender::Female);
        assert_eq!(long, exact);
    }

    #[test]
    fn unmapped_characters_fall_back_to_pad_code() {
        assert_eq!(encode("a!b", Gender::Female), encode("a b", Gender::Female));
    }
}
