//! Error taxonomy shared by the cipher and its consumers.

use thiserror::Error;

use crate::record::KEY_LEN;

/// Every failure the encrypt-then-MAC cipher can report.
///
/// All variants are terminal. None of them describe a transient fault, so
/// callers must not retry the operation that produced them.
///
/// Variants map to process exit codes (sysexits) used by `sealctl`:
/// - [`EtmError::InvalidKeyLength`] → 78 (`EX_CONFIG`)
/// - [`EtmError::RandomSourceExhausted`] → 74 (`EX_IOERR`)
/// - everything produced by `open` → 65 (`EX_DATAERR`)
#[derive(Debug, Error)]
pub enum EtmError {
    /// Key material is not exactly [`KEY_LEN`] bytes.
    #[error("etm: key must be {KEY_LEN} bytes long")]
    InvalidKeyLength,

    /// The random source could not supply a full IV.
    ///
    /// Carries the source's error unchanged (for example an unexpected
    /// end-of-stream).
    #[error(transparent)]
    RandomSourceExhausted(std::io::Error),

    /// The sealed value cannot hold an IV, one tag and nothing else.
    #[error("encrypted value too short")]
    CiphertextTooShort,

    /// The tag did not verify, or the authenticated plaintext was malformed.
    #[error("message authentication failed")]
    AuthenticationFailed,

    /// PKCS#7 padding is malformed.
    ///
    /// Only the standalone padding helper reports this; `open` folds it into
    /// [`EtmError::AuthenticationFailed`].
    #[error("invalid padding")]
    InvalidPadding,
}

impl EtmError {
    /// Returns the process exit code a command-line consumer should use.
    pub fn exit_code(&self) -> u8 {
        match self {
            EtmError::InvalidKeyLength => 78,
            EtmError::RandomSourceExhausted(_) => 74,
            EtmError::CiphertextTooShort
            | EtmError::AuthenticationFailed
            | EtmError::InvalidPadding => 65,
        }
    }
}
