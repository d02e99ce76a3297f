//! PKCS#7 block padding.

use common::record::BLOCK_LEN;
use common::EtmError;
use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater};

/// Pad `data` to a whole number of blocks.
///
/// Always appends between 1 and [`BLOCK_LEN`] bytes, each equal to the
/// number of bytes appended; empty input becomes one full padding block.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let fill = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut out = Vec::with_capacity(data.len() + fill);
    out.extend_from_slice(data);
    out.resize(data.len() + fill, fill as u8);
    out
}

/// Strip PKCS#7 padding from `data`.
///
/// The check runs over the entire final block regardless of where it fails.
///
/// # Errors
///
/// Returns [`EtmError::InvalidPadding`] if `data` is not a non-empty
/// multiple of [`BLOCK_LEN`], if the final byte is outside `1..=BLOCK_LEN`,
/// or if any of the trailing bytes it covers differs from it.
pub fn unpad(data: &[u8]) -> Result<&[u8], EtmError> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(EtmError::InvalidPadding);
    }

    let last_block = &data[data.len() - BLOCK_LEN..];
    let fill = last_block[BLOCK_LEN - 1];

    let mut valid: Choice = !fill.ct_eq(&0) & !fill.ct_gt(&(BLOCK_LEN as u8));
    for (i, byte) in last_block.iter().enumerate() {
        let distance_from_end = (BLOCK_LEN - i) as u8;
        let covered = !distance_from_end.ct_gt(&fill);
        valid &= !covered | byte.ct_eq(&fill);
    }

    if !bool::from(valid) {
        return Err(EtmError::InvalidPadding);
    }

    Ok(&data[..data.len() - fill as usize])
}
