// SPDX-License-Identifier: Apache-2.0

//! The public key field of a certificate.

/// Elliptic curve key layout.
pub mod ecc;

/// RSA key layout.
pub mod rsa;

use super::*;

/// Algorithm-specific public key material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Material {
    /// Modulus and exponent of an RSA key.
    Rsa(rsa::PubKey),

    /// Curve and coordinates of an elliptic curve key.
    Ecc(ecc::PubKey),
}

/// The public key of a certificate together with its role and algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PubKey {
    usage: Usage,
    algo: Algorithm,
    key: Material,
}

impl PubKey {
    /// Pairs key material with its role and algorithm.
    ///
    /// The material must be of the kind `algo` operates on.
    pub fn new(usage: Usage, algo: Algorithm, key: Material) -> Result<Self, ValidationError> {
        match (algo.kind(), &key) {
            (KeyKind::Rsa, Material::Rsa(_)) => (),
            (KeyKind::Ecdsa | KeyKind::Ecdh, Material::Ecc(_)) => (),
            _ => return Err(ValidationError::KeyAlgorithmMismatch),
        }

        Ok(Self { usage, algo, key })
    }

    /// The role of the key.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// The algorithm of the key.
    pub fn algorithm(&self) -> Algorithm {
        self.algo
    }

    /// The key material.
    pub fn material(&self) -> &Material {
        &self.key
    }
}

impl Decoder<()> for PubKey {
    type Error = DecodeError;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        let usage: Usage = reader.read_bytes()?;
        let algo: Algorithm = reader.read_bytes()?;
        let key = match algo.kind() {
            KeyKind::Rsa => Material::Rsa(reader.read_bytes()?),
            KeyKind::Ecdsa | KeyKind::Ecdh => Material::Ecc(reader.read_bytes()?),
        };

        Ok(Self { usage, algo, key })
    }
}

impl Encoder<()> for PubKey {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer.write_bytes(&self.usage)?.write_bytes(&self.algo)?;
        match &self.key {
            Material::Rsa(k) => writer.write_bytes(k)?,
            Material::Ecc(k) => writer.write_bytes(k)?,
        };
        Ok(())
    }
}
