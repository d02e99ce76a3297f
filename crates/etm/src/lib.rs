//! Encrypt-then-MAC sealing of secrets with a single 64-byte key.
//!
//! ```
//! use etm::Aes256Sha512;
//!
//! let cipher = Aes256Sha512::new(&[0x5a; 64])?;
//! let sealed = cipher.seal(b"client secret")?;
//! assert_eq!(cipher.open(&sealed)?, b"client secret");
//! # Ok::<(), etm::EtmError>(())
//! ```

pub mod aead;
pub mod crypto;
pub mod keyring;

pub use aead::Aead;
pub use common::record::{BLOCK_LEN, IV_LEN, KEY_LEN, MIN_SEALED_LEN, TAG_LEN};
pub use common::{EtmError, SealedRecord};
pub use crypto::{Aes256Sha512, OsRandom, RandomSource};
pub use keyring::Keyring;
