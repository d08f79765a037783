//! Symmetric bulk encryption using AES-128-CBC
//!
//! One `SymmetricKey` is generated per session and carried to peers under
//! RSA. The IV travels inside the container, not prefixed to ciphertext.

use aes::Aes128;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{BLOCK_SIZE, SYMMETRIC_KEY_SIZE};
use crate::{Error, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// AES-128 key and IV for bulk session data
///
/// Immutable once constructed; both fields are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: [u8; SYMMETRIC_KEY_SIZE],
    iv: [u8; BLOCK_SIZE],
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey").finish_non_exhaustive()
    }
}

impl SymmetricKey {
    /// Generate a fresh random key and IV
    pub fn generate() -> Self {
        let mut key = [0u8; SYMMETRIC_KEY_SIZE];
        let mut iv = [0u8; BLOCK_SIZE];
        OsRng.fill_bytes(&mut key);
        OsRng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Reconstruct a key from raw bytes received from a peer
    ///
    /// Both slices must be exactly 16 bytes; anything else is rejected
    /// rather than truncated or padded.
    pub fn from_bytes(key: &[u8], iv: &[u8]) -> Result<Self> {
        let key: [u8; SYMMETRIC_KEY_SIZE] = key.try_into().map_err(|_| {
            Error::KeyLoad(format!(
                "symmetric key must be {} bytes, got {}",
                SYMMETRIC_KEY_SIZE,
                key.len()
            ))
        })?;
        let iv: [u8; BLOCK_SIZE] = iv.try_into().map_err(|_| {
            Error::KeyLoad(format!("IV must be {} bytes, got {}", BLOCK_SIZE, iv.len()))
        })?;
        Ok(Self { key, iv })
    }

    /// Raw key bytes, for RSA-encrypting toward a peer
    pub fn key(&self) -> &[u8; SYMMETRIC_KEY_SIZE] {
        &self.key
    }

    /// Raw IV bytes, for RSA-encrypting toward a peer
    pub fn iv(&self) -> &[u8; BLOCK_SIZE] {
        &self.iv
    }

    /// Encrypt with PKCS#7 padding; output length is a multiple of 16
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes128CbcEnc::new(&self.key.into(), &self.iv.into());
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    /// Decrypt a block-aligned ciphertext and strip the PKCS#7 padding
    ///
    /// Fails on empty or misaligned input, corrupted padding, or a wrong
    /// key/IV. A failure here is an expected outcome (e.g. the peers
    /// negotiated different keys), not a bug.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(Error::Cipher(format!(
                "ciphertext length {} is not a positive multiple of {}",
                ciphertext.len(),
                BLOCK_SIZE
            )));
        }

        let cipher = Aes128CbcDec::new(&self.key.into(), &self.iv.into());
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| Error::Cipher("invalid padding or corrupted ciphertext".to_string()))
    }
}

/// Raw-material introspection for development builds
///
/// Compiled out of release builds so the accessors never become part of
/// the production API surface.
#[cfg(any(test, debug_assertions))]
pub mod debug_access {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

    use super::SymmetricKey;

    /// Base64 dump of the raw key and IV
    pub fn describe(key: &SymmetricKey) -> String {
        format!(
            "key={} iv={}",
            BASE64.encode(key.key),
            BASE64.encode(key.iv)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = SymmetricKey::generate();
        let plaintext = b"clipboard contents from peer A";

        let ciphertext = key.encrypt(plaintext).unwrap();
        assert_eq!(ciphertext.len() % BLOCK_SIZE, 0);

        let decrypted = key.decrypt(&ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_roundtrip_at_block_boundary() {
        // exactly one block of plaintext pads out to two blocks
        let key = SymmetricKey::generate();
        let plaintext = [7u8; BLOCK_SIZE];

        let ciphertext = key.encrypt(&plaintext).unwrap();
        assert_eq!(ciphertext.len(), 2 * BLOCK_SIZE);
        assert_eq!(key.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let key = SymmetricKey::generate();
        let ciphertext = key.encrypt(b"").unwrap();
        assert_eq!(ciphertext.len(), BLOCK_SIZE);
        assert_eq!(key.decrypt(&ciphertext).unwrap(), b"");
    }

    #[test]
    fn test_misaligned_ciphertext_fails() {
        let key = SymmetricKey::generate();
        let mut ciphertext = key.encrypt(b"some payload").unwrap();
        ciphertext.pop();

        let err = key.decrypt(&ciphertext).unwrap_err();
        assert!(matches!(err, Error::Cipher(_)));
    }

    #[test]
    fn test_empty_ciphertext_fails() {
        let key = SymmetricKey::generate();
        assert!(key.decrypt(b"").is_err());
    }

    #[test]
    fn test_wrong_key_fails_or_mismatches() {
        let key = SymmetricKey::generate();
        let other = SymmetricKey::generate();
        let plaintext = b"session data";

        let ciphertext = key.encrypt(plaintext).unwrap();
        // wrong key either trips the padding check or yields garbage;
        // it must never return the original plaintext or panic
        match other.decrypt(&ciphertext) {
            Ok(decrypted) => assert_ne!(decrypted, plaintext),
            Err(e) => assert!(matches!(e, Error::Cipher(_))),
        }
    }

    #[test]
    fn test_from_bytes_rejects_bad_lengths() {
        assert!(SymmetricKey::from_bytes(&[0u8; 15], &[0u8; 16]).is_err());
        assert!(SymmetricKey::from_bytes(&[0u8; 17], &[0u8; 16]).is_err());
        assert!(SymmetricKey::from_bytes(&[0u8; 16], &[0u8; 15]).is_err());
        assert!(SymmetricKey::from_bytes(&[0u8; 16], &[0u8; 17]).is_err());
    }

    #[test]
    fn test_from_bytes_interoperates() {
        let original = SymmetricKey::generate();
        let rebuilt = SymmetricKey::from_bytes(original.key(), original.iv()).unwrap();

        let ciphertext = original.encrypt(b"shared secret payload").unwrap();
        assert_eq!(rebuilt.decrypt(&ciphertext).unwrap(), b"shared secret payload");
    }

    #[test]
    fn test_debug_redacts_material() {
        let key = SymmetricKey::generate();
        assert_eq!(format!("{:?}", key), "SymmetricKey { .. }");
    }

    #[test]
    fn test_debug_access_describes_material() {
        let key = SymmetricKey::generate();
        let described = debug_access::describe(&key);
        assert!(described.starts_with("key="));
        assert!(described.contains(" iv="));
    }
}
