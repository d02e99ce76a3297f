//! Byte layout of a sealed record.
//!
//! ```text
//! IV (16) || ciphertext (N × 16, N ≥ 1) || tag (32)
//! ```
//!
//! The format carries no length prefix, version or algorithm identifier. Key
//! and algorithm agreement happens out of band.

use crate::error::EtmError;

/// Length of the full key material (encryption half + MAC half).
pub const KEY_LEN: usize = 64;

/// Length of each key half.
pub const SUBKEY_LEN: usize = KEY_LEN / 2;

/// AES block size.
pub const BLOCK_LEN: usize = 16;

/// CBC initialisation vector length (one block).
pub const IV_LEN: usize = BLOCK_LEN;

/// Truncated HMAC-SHA-512 tag length.
pub const TAG_LEN: usize = 32;

/// Smallest byte sequence that [`SealedRecord::parse`] accepts.
pub const MIN_SEALED_LEN: usize = IV_LEN + TAG_LEN;

/// A borrowed view over the three parts of a sealed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealedRecord<'a> {
    pub iv: &'a [u8; IV_LEN],
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8; TAG_LEN],
}

impl<'a> SealedRecord<'a> {
    /// Split `sealed` into IV, ciphertext and tag.
    ///
    /// Only the minimum length is checked here; block alignment of the
    /// ciphertext is left to the caller so that it can be judged after the
    /// tag has been verified.
    ///
    /// # Errors
    ///
    /// Returns [`EtmError::CiphertextTooShort`] if `sealed` is shorter than
    /// [`MIN_SEALED_LEN`].
    pub fn parse(sealed: &'a [u8]) -> Result<Self, EtmError> {
        if sealed.len() < MIN_SEALED_LEN {
            return Err(EtmError::CiphertextTooShort);
        }

        let (iv, rest) = sealed.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

        Ok(Self {
            iv: iv.try_into().map_err(|_| EtmError::CiphertextTooShort)?,
            ciphertext,
            tag: tag.try_into().map_err(|_| EtmError::CiphertextTooShort)?,
        })
    }

    /// Whether the ciphertext is a non-empty whole number of blocks.
    pub fn is_block_aligned(&self) -> bool {
        !self.ciphertext.is_empty() && self.ciphertext.len() % BLOCK_LEN == 0
    }
}

/// Concatenate the three parts into the wire representation.
pub fn assemble(iv: &[u8; IV_LEN], ciphertext: &[u8], tag: &[u8; TAG_LEN]) -> Vec<u8> {
    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len() + TAG_LEN);
    out.extend_from_slice(iv);
    out.extend_from_slice(ciphertext);
    out.extend_from_slice(tag);
    out
}

/// Length of `plaintext_len` bytes after PKCS#7 padding.
pub const fn padded_len(plaintext_len: usize) -> usize {
    (plaintext_len / BLOCK_LEN + 1) * BLOCK_LEN
}

/// Length of the sealed record for a plaintext of `plaintext_len` bytes.
pub const fn sealed_len(plaintext_len: usize) -> usize {
    IV_LEN + padded_len(plaintext_len) + TAG_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_input() {
        assert!(matches!(
            SealedRecord::parse(&[0u8; 31]),
            Err(EtmError::CiphertextTooShort)
        ));
        assert!(matches!(
            SealedRecord::parse(&[0u8; MIN_SEALED_LEN - 1]),
            Err(EtmError::CiphertextTooShort)
        ));
    }

    #[test]
    fn splits_into_parts() {
        let mut sealed = vec![0x11u8; IV_LEN];
        sealed.extend_from_slice(&[0x22u8; 2 * BLOCK_LEN]);
        sealed.extend_from_slice(&[0x33u8; TAG_LEN]);

        let record = SealedRecord::parse(&sealed).unwrap();
        assert_eq!(record.iv, &[0x11u8; IV_LEN]);
        assert_eq!(record.ciphertext, &[0x22u8; 2 * BLOCK_LEN][..]);
        assert_eq!(record.tag, &[0x33u8; TAG_LEN]);
        assert!(record.is_block_aligned());
    }

    #[test]
    fn minimum_length_has_empty_ciphertext() {
        let sealed = [0u8; MIN_SEALED_LEN];
        let record = SealedRecord::parse(&sealed).unwrap();
        assert!(record.ciphertext.is_empty());
        assert!(!record.is_block_aligned());
    }

    #[test]
    fn misaligned_ciphertext_is_reported() {
        let sealed = [0u8; MIN_SEALED_LEN + 5];
        let record = SealedRecord::parse(&sealed).unwrap();
        assert_eq!(record.ciphertext.len(), 5);
        assert!(!record.is_block_aligned());
    }

    #[test]
    fn assemble_inverts_parse() {
        let iv = [1u8; IV_LEN];
        let ciphertext = [2u8; BLOCK_LEN];
        let tag = [3u8; TAG_LEN];
        let sealed = assemble(&iv, &ciphertext, &tag);
        assert_eq!(sealed.len(), sealed_len(0));

        let record = SealedRecord::parse(&sealed).unwrap();
        assert_eq!(record.iv, &iv);
        assert_eq!(record.ciphertext, &ciphertext[..]);
        assert_eq!(record.tag, &tag);
    }

    #[test]
    fn lengths() {
        assert_eq!(padded_len(0), 16);
        assert_eq!(padded_len(4), 16);
        assert_eq!(padded_len(15), 16);
        assert_eq!(padded_len(16), 32);
        assert_eq!(sealed_len(4), 64);
        assert_eq!(sealed_len(16), 80);
        assert_eq!(MIN_SEALED_LEN, 48);
    }
}
