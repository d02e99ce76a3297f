//! The seal/open abstraction consumers program against.

use common::EtmError;

/// Authenticated encryption of opaque byte payloads.
///
/// Implementations must verify integrity before releasing any plaintext and
/// must report every failure to the caller instead of retrying or logging it.
pub trait Aead {
    fn seal_with_associated_data(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError>;

    fn open_with_associated_data(
        &self,
        sealed: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, EtmError>;

    /// Seal with no associated data.
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, EtmError> {
        self.seal_with_associated_data(plaintext, &[])
    }

    /// Open a record sealed with no associated data.
    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, EtmError> {
        self.open_with_associated_data(sealed, &[])
    }
}
