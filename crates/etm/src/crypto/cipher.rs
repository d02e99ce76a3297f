//! AES-256-CBC + HMAC-SHA-512 encrypt-then-MAC sealing of byte payloads.
//!
//! **Key layout:** the 64-byte key is split in half. Bytes `0..32` key
//! AES-256, bytes `32..64` key HMAC-SHA-512.
//!
//! **Tag:** the first 32 bytes of
//! `HMAC-SHA-512(mac_key, A || IV || ciphertext || AL)`, where `A` is the
//! associated data and `AL` is its length in bits as a big-endian `u64`.
//! Plain [`Aes256Sha512::seal`] uses an empty `A`.
//!
//! **Order of checks in `open`:** the tag is compared in constant time before
//! any decryption happens. Padding is inspected only for authenticated input,
//! and a padding failure is reported as an authentication failure so the two
//! cannot be told apart.

use std::fmt;

use aes::Aes256;
use cbc::cipher::{generic_array::GenericArray, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use common::record::{self, SealedRecord, BLOCK_LEN, IV_LEN, KEY_LEN, SUBKEY_LEN, TAG_LEN};
use common::EtmError;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::padding;
use super::random::{OsRandom, RandomSource};
use crate::aead::Aead;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha512 = Hmac<Sha512>;

/// Authenticated cipher bound to one 64-byte key.
///
/// Holds no per-call state: `seal` and `open` take `&self` and may run
/// concurrently on a shared instance.
pub struct Aes256Sha512<R = OsRandom> {
    enc_key: Zeroizing<[u8; SUBKEY_LEN]>,
    /// HMAC state already keyed with the MAC half; cloned for every tag.
    mac: HmacSha512,
    random: R,
}

impl Aes256Sha512 {
    /// Build a cipher from 64 bytes of key material.
    ///
    /// IVs are drawn from the platform CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`EtmError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, EtmError> {
        Self::from_parts(key, OsRandom)
    }
}

impl<R: RandomSource> Aes256Sha512<R> {
    fn from_parts(key: &[u8], random: R) -> Result<Self, EtmError> {
        if key.len() != KEY_LEN {
            return Err(EtmError::InvalidKeyLength);
        }
        let (enc_half, mac_half) = key.split_at(SUBKEY_LEN);

        let mut enc_key = Zeroizing::new([0u8; SUBKEY_LEN]);
        enc_key.copy_from_slice(enc_half);

        let mac = <HmacSha512 as Mac>::new_from_slice(mac_half)
            .map_err(|_| EtmError::InvalidKeyLength)?;

        Ok(Self {
            enc_key,
            mac,
            random,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_random_source(key: &[u8], random: R) -> Result<Self, EtmError> {
        Self::from_parts(key, random)
    }

    /// Encrypt and authenticate `plaintext`.
    ///
    /// Returns `IV || ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`EtmError::RandomSourceExhausted`] if a full IV could not be
    /// read; nothing is encrypted in that case.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, EtmError> {
        self.seal_with_associated_data(plaintext, &[])
    }

    /// Like [`Aes256Sha512::seal`], additionally binding `associated_data`
    /// into the tag. The associated data is not part of the output and must
    /// be presented again to open the record.
    pub fn seal_with_associated_data(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError> {
        let mut iv = [0u8; IV_LEN];
        self.random
            .fill(&mut iv)
            .map_err(EtmError::RandomSourceExhausted)?;

        let ciphertext = self.encrypt(&iv, plaintext);
        let tag = self.tag(associated_data, &iv, &ciphertext);

        Ok(record::assemble(&iv, &ciphertext, &tag))
    }

    /// Verify and decrypt a record produced by [`Aes256Sha512::seal`].
    ///
    /// # Errors
    ///
    /// Returns [`EtmError::CiphertextTooShort`] if `sealed` is shorter than an
    /// IV plus a tag. Returns [`EtmError::AuthenticationFailed`] if the tag does
    /// not verify (wrong key or tampered data) or the authenticated plaintext
    /// is malformed.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, EtmError> {
        self.open_with_associated_data(sealed, &[])
    }

    /// Like [`Aes256Sha512::open`] for records sealed with associated data.
    pub fn open_with_associated_data(
        &self,
        sealed: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError> {
        let record = SealedRecord::parse(sealed)?;
        self.verify(&record, associated_data)?;
        self.decrypt(&record)
    }

    /// Constant-time tag check. Must succeed before [`Self::decrypt`] runs.
    pub(crate) fn verify(
        &self,
        record: &SealedRecord<'_>,
        associated_data: &[u8],
    ) -> Result<(), EtmError> {
        let expected = self.tag(associated_data, record.iv, record.ciphertext);
        if !bool::from(expected[..].ct_eq(&record.tag[..])) {
            return Err(EtmError::AuthenticationFailed);
        }
        Ok(())
    }

    pub(crate) fn decrypt(&self, record: &SealedRecord<'_>) -> Result<Vec<u8>, EtmError> {
        if !record.is_block_aligned() {
            return Err(EtmError::AuthenticationFailed);
        }

        let mut buf = Zeroizing::new(record.ciphertext.to_vec());
        let mut dec = Aes256CbcDec::new((&*self.enc_key).into(), record.iv.into());
        for block in buf.chunks_exact_mut(BLOCK_LEN) {
            dec.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }

        let plaintext = padding::unpad(&buf).map_err(|_| EtmError::AuthenticationFailed)?;
        Ok(plaintext.to_vec())
    }

    fn encrypt(&self, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
        let mut buf = padding::pad(plaintext);
        let mut enc = Aes256CbcEnc::new((&*self.enc_key).into(), iv.into());
        for block in buf.chunks_exact_mut(BLOCK_LEN) {
            enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        buf
    }

    fn tag(&self, associated_data: &[u8], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> [u8; TAG_LEN] {
        let associated_bits = (associated_data.len() as u64) * 8;

        let mut mac = self.mac.clone();
        mac.update(associated_data);
        mac.update(iv);
        mac.update(ciphertext);
        mac.update(&associated_bits.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&digest[..TAG_LEN]);
        tag
    }
}

impl<R: RandomSource> Aead for Aes256Sha512<R> {
    fn seal_with_associated_data(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError> {
        Aes256Sha512::<R>::seal_with_associated_data(self, plaintext, associated_data)
    }

    fn open_with_associated_data(
        &self,
        sealed: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError> {
        Aes256Sha512::<R>::open_with_associated_data(self, sealed, associated_data)
    }
}

impl<R> fmt::Debug for Aes256Sha512<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        f.write_str("Aes256Sha512([REDACTED])")
    }
}
