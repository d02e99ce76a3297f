//! AES-256-CBC + HMAC-SHA-512 encrypt-then-MAC primitives.
//!
//! This module has no I/O beyond reading IV bytes from its random source, and
//! it never logs: every failure is returned to the caller.
//!
//! # Sealed record format
//!
//! ```text
//! IV (16 bytes) || AES-256-CBC(PKCS#7(plaintext)) || HMAC-SHA-512 tag, first 32 bytes
//! ```
//!
//! The format is fixed and un-versioned; see [`common::record`] for the layout
//! constants.

pub mod cipher;
pub mod padding;
pub mod random;

pub use cipher::Aes256Sha512;
pub use random::{OsRandom, RandomSource};
