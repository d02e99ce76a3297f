//! [`Keyring`]: a primary cipher plus previously used ones.
//!
//! New records are always sealed under the primary key. Opening tries the
//! primary key first and then each previous key in the order given, so records
//! written before a key change stay readable. Deciding when keys change is up
//! to the caller.

use common::{EtmError, SealedRecord};

use crate::aead::Aead;
use crate::crypto::Aes256Sha512;

/// Ordered set of ciphers sharing one wire format.
#[derive(Debug)]
pub struct Keyring {
    primary: Aes256Sha512,
    previous: Vec<Aes256Sha512>,
}

impl Keyring {
    /// Build a keyring from a primary key and zero or more previous keys.
    ///
    /// # Errors
    ///
    /// Returns [`EtmError::InvalidKeyLength`] if any key is not 64 bytes.
    pub fn new<K>(
        primary_key: &[u8],
        previous_keys: impl IntoIterator<Item = K>,
    ) -> Result<Self, EtmError>
    where
        K: AsRef<[u8]>,
    {
        let primary = Aes256Sha512::new(primary_key)?;
        let previous = previous_keys
            .into_iter()
            .map(|key| Aes256Sha512::new(key.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { primary, previous })
    }

    /// Number of keys, primary included.
    pub fn key_count(&self) -> usize {
        1 + self.previous.len()
    }

    /// The cipher used for sealing.
    pub fn primary(&self) -> &Aes256Sha512 {
        &self.primary
    }

    fn ciphers(&self) -> impl Iterator<Item = &Aes256Sha512> {
        std::iter::once(&self.primary).chain(self.previous.iter())
    }
}

impl Aead for Keyring {
    fn seal_with_associated_data(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError> {
        self.primary.seal_with_associated_data(plaintext, associated_data)
    }

    /// The record is parsed once, so a short input fails before any key is
    /// tried. The first key whose tag verifies decides the outcome.
    fn open_with_associated_data(
        &self,
        sealed: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError> {
        let record = SealedRecord::parse(sealed)?;

        for cipher in self.ciphers() {
            if cipher.verify(&record, associated_data).is_ok() {
                return cipher.decrypt(&record);
            }
        }

        Err(EtmError::AuthenticationFailed)
    }
}
