//! VNC password file obfuscation.
//!
//! This is the legacy VNC scheme: single-block DES under a fixed, publicly
//! known key. Anyone who can read the file can recover the password. It
//! exists only so viewers that want a `-passwd` file can be started
//! without a prompt.

use crate::{config::write_private_file, error::AppError};
use des::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use des::Des;
use std::path::{Path, PathBuf};

pub const BASE_KEY: [u8; 8] = [0x17, 0x52, 0x6b, 0x09, 0x33, 0x51, 0x6e, 0x4b];
pub const PASSWORD_FILE: &str = ".vncpasswd";

/// Bit 0 becomes bit 7, bit 1 becomes bit 6, and so on.
pub fn reverse_bits(b: u8) -> u8 {
    let mut b = b;
    let mut rev = 0u8;
    for _ in 0..8 {
        rev = (rev << 1) | (b & 1);
        b >>= 1;
    }
    rev
}

pub fn derive_key() -> [u8; 8] {
    BASE_KEY.map(reverse_bits)
}

/// Truncates to 8 bytes or zero-pads on the right.
pub fn pad_password(password: &str) -> [u8; 8] {
    let mut block = [0u8; 8];
    let bytes = password.as_bytes();
    let n = bytes.len().min(8);
    block[..n].copy_from_slice(&bytes[..n]);
    block
}

pub fn encrypt_password(password: &str) -> [u8; 8] {
    let key = derive_key();
    let cipher = Des::new(GenericArray::from_slice(&key));
    let mut block = GenericArray::clone_from_slice(&pad_password(password));
    cipher.encrypt_block(&mut block);
    let mut out = [0u8; 8];
    out.copy_from_slice(&block);
    out
}

/// Writes the obfuscated password to `<dir>/.vncpasswd` and returns the path.
pub fn write_password_file(dir: &Path, password: &str) -> Result<PathBuf, AppError> {
    let path = dir.join(PASSWORD_FILE);
    write_private_file(&path, &encrypt_password(password))?;
    tracing::debug!(path = %path.display(), "wrote vnc password file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use des::cipher::BlockDecrypt;

    #[test]
    fn key_is_bit_reversal_of_base_key() {
        assert_eq!(derive_key(), [0xe8, 0x4a, 0xd6, 0x90, 0xcc, 0x8a, 0x76, 0xd2]);
        for (derived, base) in derive_key().iter().zip(BASE_KEY) {
            assert_eq!(derived.reverse_bits(), base);
        }
    }

    #[test]
    fn reverse_bits_handles_edges() {
        assert_eq!(reverse_bits(0x01), 0x80);
        assert_eq!(reverse_bits(0x00), 0x00);
        assert_eq!(reverse_bits(0xff), 0xff);
    }

    #[test]
    fn long_passwords_use_only_first_eight_bytes() {
        assert_eq!(pad_password("password123"), *b"password");
        assert_eq!(encrypt_password("password123"), encrypt_password("password"));
    }

    #[test]
    fn short_passwords_are_zero_padded() {
        assert_eq!(pad_password("abc"), [b'a', b'b', b'c', 0, 0, 0, 0, 0]);
        assert_eq!(pad_password(""), [0u8; 8]);
    }

    #[test]
    fn ciphertext_decrypts_back_to_padded_plaintext() {
        let ct = encrypt_password("secret");
        assert_ne!(ct, pad_password("secret"));
        let cipher = Des::new(GenericArray::from_slice(&derive_key()));
        let mut block = GenericArray::clone_from_slice(&ct);
        cipher.decrypt_block(&mut block);
        assert_eq!(block.as_slice(), &pad_password("secret"));
    }

    #[test]
    fn password_file_holds_exactly_the_ciphertext() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_password_file(tmp.path(), "hunter2").unwrap();
        assert_eq!(path.file_name().unwrap(), PASSWORD_FILE);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes, encrypt_password("hunter2"));
    }
}
