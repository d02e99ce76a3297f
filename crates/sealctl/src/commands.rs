//! `seal` and `open` over byte streams.
//!
//! Both commands buffer the whole input: a sealed record is authenticated as a
//! unit, so nothing may be written before the tag has been checked.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use etm::Aead;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::cli::Encoding;

/// Read a plaintext from `reader`, seal it and write the record to `writer`.
pub fn seal<A, R, W>(
    aead: &A,
    mut reader: R,
    mut writer: W,
    associated_data: &[u8],
    encoding: Encoding,
) -> Result<()>
where
    A: Aead + ?Sized,
    R: Read,
    W: Write,
{
    let mut plaintext = Zeroizing::new(Vec::new());
    reader
        .read_to_end(&mut plaintext)
        .context("failed to read plaintext")?;

    let sealed = aead.seal_with_associated_data(&plaintext, associated_data)?;

    let written = match encoding {
        Encoding::Base64 => writeln!(writer, "{}", STANDARD.encode(&sealed)),
        Encoding::Raw => writer.write_all(&sealed),
    };
    written.context("failed to write sealed record")?;
    writer.flush().context("failed to flush output")?;

    info!(
        plaintext_len = plaintext.len(),
        sealed_len = sealed.len(),
        associated_data_len = associated_data.len(),
        "payload sealed"
    );
    Ok(())
}

/// Read a sealed record from `reader`, open it and write the plaintext to
/// `writer`. Nothing is written unless the record authenticates.
pub fn open<A, R, W>(
    aead: &A,
    mut reader: R,
    mut writer: W,
    associated_data: &[u8],
    encoding: Encoding,
) -> Result<()>
where
    A: Aead + ?Sized,
    R: Read,
    W: Write,
{
    let mut input = Vec::new();
    reader
        .read_to_end(&mut input)
        .context("failed to read sealed record")?;

    let sealed = match encoding {
        Encoding::Base64 => {
            let text = std::str::from_utf8(&input).context("sealed record is not base64 text")?;
            STANDARD
                .decode(text.trim())
                .context("sealed record is not valid base64")?
        }
        Encoding::Raw => input,
    };
    debug!(sealed_len = sealed.len(), "opening record");

    let plaintext = Zeroizing::new(aead.open_with_associated_data(&sealed, associated_data)?);

    writer
        .write_all(&plaintext)
        .context("failed to write plaintext")?;
    writer.flush().context("failed to flush output")?;

    info!(plaintext_len = plaintext.len(), "payload opened");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use etm::{EtmError, Keyring};

    fn keyring() -> Keyring {
        Keyring::new(&[0x2Au8; 64], Vec::<Vec<u8>>::new()).unwrap()
    }

    fn seal_to_vec(keyring: &Keyring, plaintext: &[u8], ad: &[u8], encoding: Encoding) -> Vec<u8> {
        let mut out = Vec::new();
        seal(keyring, plaintext, &mut out, ad, encoding).unwrap();
        out
    }

    #[test]
    fn base64_round_trip() {
        let keyring = keyring();
        let sealed = seal_to_vec(&keyring, b"db-password", b"", Encoding::Base64);
        assert_eq!(sealed.last(), Some(&b'\n'));

        let mut opened = Vec::new();
        open(&keyring, sealed.as_slice(), &mut opened, b"", Encoding::Base64).unwrap();
        assert_eq!(opened, b"db-password");
    }

    #[test]
    fn raw_round_trip_with_associated_data() {
        let keyring = keyring();
        let sealed = seal_to_vec(&keyring, b"token", b"ctx", Encoding::Raw);
        assert_eq!(sealed.len(), etm::MIN_SEALED_LEN + 16);

        let mut opened = Vec::new();
        open(&keyring, sealed.as_slice(), &mut opened, b"ctx", Encoding::Raw).unwrap();
        assert_eq!(opened, b"token");
    }

    #[test]
    fn wrong_associated_data_writes_nothing() {
        let keyring = keyring();
        let sealed = seal_to_vec(&keyring, b"token", b"ctx", Encoding::Raw);

        let mut opened = Vec::new();
        let err = open(&keyring, sealed.as_slice(), &mut opened, b"other", Encoding::Raw)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtmError>(),
            Some(EtmError::AuthenticationFailed)
        ));
        assert!(opened.is_empty());
    }

    #[test]
    fn short_record_is_reported() {
        let keyring = keyring();
        let mut opened = Vec::new();
        let err = open(&keyring, &[0u8; 10][..], &mut opened, b"", Encoding::Raw).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtmError>(),
            Some(EtmError::CiphertextTooShort)
        ));
    }

    #[test]
    fn invalid_base64_is_not_a_cipher_error() {
        let keyring = keyring();
        let mut opened = Vec::new();
        let err = open(&keyring, &b"@@@@"[..], &mut opened, b"", Encoding::Base64).unwrap_err();
        assert!(err.downcast_ref::<EtmError>().is_none());
    }
}
