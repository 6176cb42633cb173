// SPDX-License-Identifier: Apache-2.0

//! PEM import and export of key material.
//!
//! Private keys are written as PKCS#8 and public keys as SPKI. On import,
//! PKCS#1 RSA keys and SEC1 elliptic curve keys are accepted as well.

use super::{KeyPair, PublicKey, SecretKey};
use crate::error::Error;

use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding},
};
use std::{fs, io::Write, path::Path};

fn format_error(what: &str, e: impl std::fmt::Display) -> Error {
    Error::KeyFormat(format!("{what}: {e}"))
}

/// Parses a PEM encoded private key.
pub fn parse_private_key(pem: &str) -> Result<KeyPair, Error> {
    let secret = if let Ok(k) = rsa::RsaPrivateKey::from_pkcs8_pem(pem) {
        SecretKey::Rsa(k)
    } else if let Ok(k) = rsa::RsaPrivateKey::from_pkcs1_pem(pem) {
        SecretKey::Rsa(k)
    } else if let Ok(k) = p384::SecretKey::from_pkcs8_pem(pem) {
        SecretKey::P384(k)
    } else if let Ok(k) = p384::SecretKey::from_sec1_pem(pem) {
        SecretKey::P384(k)
    } else if let Ok(k) = p256::SecretKey::from_pkcs8_pem(pem) {
        SecretKey::P256(k)
    } else if let Ok(k) = p256::SecretKey::from_sec1_pem(pem) {
        SecretKey::P256(k)
    } else {
        return Err(Error::KeyFormat(
            "no supported private key found in PEM".to_string(),
        ));
    };

    Ok(KeyPair::from_secret(secret))
}

/// Reads and parses a PEM encoded private key file.
pub fn read_private_key(path: &Path) -> Result<KeyPair, Error> {
    let pem = fs::read_to_string(path)?;
    parse_private_key(&pem)
}

/// Encodes the private half of `key` as PKCS#8 PEM.
pub fn private_key_to_pem(key: &KeyPair) -> Result<String, Error> {
    let secret = key
        .secret()
        .ok_or_else(|| Error::KeyFormat("key pair has no private half".to_string()))?;

    let pem = match secret {
        SecretKey::Rsa(k) => k.to_pkcs8_pem(LineEnding::LF),
        SecretKey::P256(k) => k.to_pkcs8_pem(LineEnding::LF),
        SecretKey::P384(k) => k.to_pkcs8_pem(LineEnding::LF),
    }
    .map_err(|e| format_error("unable to encode private key", e))?;

    Ok(pem.to_string())
}

/// Encodes a public key as SPKI PEM.
pub fn public_key_to_pem(key: &PublicKey) -> Result<String, Error> {
    match key {
        PublicKey::Rsa(k) => k.to_public_key_pem(LineEnding::LF),
        PublicKey::P256(k) => k.to_public_key_pem(LineEnding::LF),
        PublicKey::P384(k) => k.to_public_key_pem(LineEnding::LF),
    }
    .map_err(|e| format_error("unable to encode public key", e))
}

/// Writes the private half of `key` to `path` as PKCS#8 PEM.
///
/// On Unix the file is created readable by its owner only.
pub fn write_private_key(path: &Path, key: &KeyPair) -> Result<(), Error> {
    let pem = private_key_to_pem(key)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(pem.as_bytes())?;
    Ok(())
}

/// Writes `key` to `path` as SPKI PEM.
pub fn write_public_key(path: &Path, key: &PublicKey) -> Result<(), Error> {
    fs::write(path, public_key_to_pem(key)?)?;
    Ok(())
}
