//! The transition alphabet.

use crate::error::{Error, Result};

/// Returns whether `byte` may label a transition.
#[inline]
pub(crate) const fn is_label(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// Checks that every byte of `key` is an ASCII letter.
pub(crate) fn validate_key(key: &[u8]) -> Result<()> {
    match key.iter().position(|&byte| !is_label(byte)) {
        Some(position) => Err(Error::InvalidKeyByte {
            byte: key[position],
            position,
        }),
        None => Ok(()),
    }
}
