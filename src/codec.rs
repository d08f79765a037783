//! Shared DER export/import for RSA key material
//!
//! Both key classes serialize to the PKCS#1 external representation, so
//! the encode/decode logic lives here once, parameterized by key class,
//! instead of being repeated across the key containers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rsa::pkcs1::{
    DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey,
};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::constants::RSA_MODULUS_BYTES;
use crate::{Error, Result};

/// Export a public key as PKCS#1 `RSAPublicKey` DER.
pub(crate) fn public_to_der(key: &RsaPublicKey) -> Result<Vec<u8>> {
    key.to_pkcs1_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| Error::KeyExport(format!("public key DER encoding failed: {}", e)))
}

/// Export a private key as PKCS#1 `RSAPrivateKey` DER.
pub(crate) fn private_to_der(key: &RsaPrivateKey) -> Result<Vec<u8>> {
    key.to_pkcs1_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| Error::KeyExport(format!("private key DER encoding failed: {}", e)))
}

/// Reconstruct a public key from PKCS#1 DER, rejecting non-2048-bit moduli.
pub(crate) fn public_from_der(der: &[u8]) -> Result<RsaPublicKey> {
    let key = RsaPublicKey::from_pkcs1_der(der)
        .map_err(|e| Error::KeyLoad(format!("malformed public key DER: {}", e)))?;
    check_modulus(key.size())?;
    tracing::debug!("loaded {}-byte RSA public key from DER", key.size());
    Ok(key)
}

/// Reconstruct a private key from PKCS#1 DER, rejecting non-2048-bit moduli.
pub(crate) fn private_from_der(der: &[u8]) -> Result<RsaPrivateKey> {
    let key = RsaPrivateKey::from_pkcs1_der(der)
        .map_err(|e| Error::KeyLoad(format!("malformed private key DER: {}", e)))?;
    check_modulus(key.size())?;
    tracing::debug!("loaded {}-byte RSA private key from DER", key.size());
    Ok(key)
}

/// Extract and decode the base64 body of a PEM block.
///
/// Tolerates surrounding whitespace, real newlines, and literal `\n`
/// escape sequences inside the body (keys that crossed a JSON boundary
/// often arrive with the latter). Missing delimiters and invalid base64
/// are load failures, never panics.
pub(crate) fn pem_body(text: &str, header: &str, footer: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix(header)
        .ok_or_else(|| Error::KeyLoad(format!("missing PEM header {:?}", header)))?;
    let body = body
        .strip_suffix(footer)
        .ok_or_else(|| Error::KeyLoad(format!("missing PEM footer {:?}", footer)))?;

    let cleaned: String = body
        .replace("\\n", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    BASE64
        .decode(&cleaned)
        .map_err(|e| Error::KeyLoad(format!("invalid base64 in PEM body: {}", e)))
}

fn check_modulus(size: usize) -> Result<()> {
    if size != RSA_MODULUS_BYTES {
        return Err(Error::KeyLoad(format!(
            "expected a {}-byte RSA modulus, got {}",
            RSA_MODULUS_BYTES, size
        )));
    }
    Ok(())
}
