//! Public-API behaviour of the sealing cipher and keyring.

use etm::{Aead, Aes256Sha512, EtmError, Keyring, SealedRecord, IV_LEN, MIN_SEALED_LEN, TAG_LEN};

fn key(seed: u8) -> Vec<u8> {
    (0..64u8).map(|i| i.wrapping_mul(31).wrapping_add(seed)).collect()
}

#[test]
fn seal_then_open_restores_plaintext() {
    let cipher = Aes256Sha512::new(&key(1)).unwrap();
    let cases: [&[u8]; 5] = [b"", b"a", b"test", &[0xFF; 16], &[0; 1000]];
    for plaintext in cases {
        let sealed = cipher.seal(plaintext).unwrap();
        assert_eq!(cipher.open(&sealed).unwrap(), plaintext);
    }
}

#[test]
fn sealed_layout_is_iv_ciphertext_tag() {
    let cipher = Aes256Sha512::new(&key(2)).unwrap();
    let sealed = cipher.seal(b"0123456789abcdef0").unwrap();

    // 17 bytes of plaintext pad to two blocks.
    assert_eq!(sealed.len(), IV_LEN + 32 + TAG_LEN);
    assert_eq!((sealed.len() - MIN_SEALED_LEN) % 16, 0);

    let record = SealedRecord::parse(&sealed).unwrap();
    assert_eq!(record.ciphertext.len(), 32);
    assert!(record.is_block_aligned());
}

#[test]
fn ciphertext_does_not_contain_plaintext() {
    let cipher = Aes256Sha512::new(&key(3)).unwrap();
    let plaintext = b"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    let sealed = cipher.seal(plaintext).unwrap();
    assert!(!sealed
        .windows(plaintext.len())
        .any(|window| window == plaintext));
}

#[test]
fn truncated_records_are_rejected() {
    let cipher = Aes256Sha512::new(&key(4)).unwrap();
    let sealed = cipher.seal(b"truncate me").unwrap();

    for len in 0..MIN_SEALED_LEN {
        assert!(matches!(
            cipher.open(&sealed[..len]),
            Err(EtmError::CiphertextTooShort)
        ));
    }
    for len in MIN_SEALED_LEN..sealed.len() {
        assert!(matches!(
            cipher.open(&sealed[..len]),
            Err(EtmError::AuthenticationFailed)
        ));
    }
}

#[test]
fn appended_bytes_are_rejected() {
    let cipher = Aes256Sha512::new(&key(5)).unwrap();
    let mut sealed = cipher.seal(b"extend me").unwrap();
    sealed.push(0);
    assert!(matches!(
        cipher.open(&sealed),
        Err(EtmError::AuthenticationFailed)
    ));
}

#[test]
fn tag_and_ciphertext_tampering_fail_the_same_way() {
    let cipher = Aes256Sha512::new(&key(6)).unwrap();
    let sealed = cipher.seal(b"same failure either way").unwrap();

    let mut bad_ciphertext = sealed.clone();
    bad_ciphertext[IV_LEN] ^= 0x80;
    let mut bad_tag = sealed.clone();
    let last = bad_tag.len() - 1;
    bad_tag[last] ^= 0x01;

    let a = cipher.open(&bad_ciphertext).unwrap_err();
    let b = cipher.open(&bad_tag).unwrap_err();
    assert!(matches!(a, EtmError::AuthenticationFailed));
    assert!(matches!(b, EtmError::AuthenticationFailed));
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn records_from_one_key_do_not_open_under_another() {
    let a = Aes256Sha512::new(&key(7)).unwrap();
    let b = Aes256Sha512::new(&key(8)).unwrap();
    let sealed = a.seal(b"private").unwrap();
    assert!(matches!(b.open(&sealed), Err(EtmError::AuthenticationFailed)));
}

#[test]
fn keyring_reads_old_records_and_writes_new_ones() {
    let old_key = key(9);
    let new_key = key(10);

    let legacy = Aes256Sha512::new(&old_key).unwrap().seal(b"v1 data").unwrap();

    let keyring = Keyring::new(&new_key, [old_key.as_slice()]).unwrap();
    assert_eq!(keyring.open(&legacy).unwrap(), b"v1 data");

    let fresh = keyring.seal(b"v2 data").unwrap();
    let new_only = Aes256Sha512::new(&new_key).unwrap();
    assert_eq!(new_only.open(&fresh).unwrap(), b"v2 data");
}

#[test]
fn invalid_key_lengths_are_rejected_at_construction() {
    assert!(matches!(
        Aes256Sha512::new(&[0u8; 63]),
        Err(EtmError::InvalidKeyLength)
    ));
    assert!(matches!(
        Aes256Sha512::new(&[0u8; 65]),
        Err(EtmError::InvalidKeyLength)
    ));
    assert!(matches!(
        Keyring::new(&[0u8; 32], Vec::<Vec<u8>>::new()),
        Err(EtmError::InvalidKeyLength)
    ));
}
