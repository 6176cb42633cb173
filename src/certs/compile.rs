// SPDX-License-Identifier: Apache-2.0

//! Conversion between a certificate's public key field and a [`KeyPair`].

use super::*;

use super::key::{ecc, rsa};
use crate::{crypto::Curve, util::be_to_le_padded};

use ::rsa::{traits::PublicKeyParts, BigUint, RsaPublicKey};
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};

/// Number of significant bits in a little-endian integer.
pub(crate) fn bit_len(le: &[u8]) -> usize {
    match le.iter().rposition(|b| *b != 0) {
        Some(i) => i * 8 + (8 - le[i].leading_zeros() as usize),
        None => 0,
    }
}

/// Big-endian form of the low `size` bytes of a little-endian coordinate.
fn coordinate(le: &[u8; 72], size: usize) -> Result<Vec<u8>, Error> {
    if le[size..].iter().any(|b| *b != 0) {
        return Err(Error::InvalidKeyMaterial("coordinate exceeds the curve size"));
    }

    Ok(le[..size].iter().rev().copied().collect())
}

fn rsa_public_key(key: &rsa::PubKey) -> Result<RsaPublicKey, Error> {
    let bits = key.modulus_size() as usize;
    if bits == 0 || bits % 8 != 0 || bits > key.modulus().len() * 8 {
        return Err(Error::InvalidKeyMaterial("unusable RSA modulus size"));
    }

    if bit_len(key.modulus()) != bits {
        return Err(Error::InvalidKeyMaterial(
            "RSA modulus does not match its declared size",
        ));
    }

    let n = BigUint::from_bytes_le(key.modulus());
    let e = BigUint::from_bytes_le(key.exponent());
    RsaPublicKey::new(n, e).map_err(|_| Error::InvalidKeyMaterial("RSA public key rejected"))
}

fn ec_public_key(key: &ecc::PubKey) -> Result<PublicKey, Error> {
    let curve = key
        .curve()
        .ok_or(Error::InvalidKeyMaterial("unsupported curve"))?;

    let x = coordinate(key.x(), curve.size())?;
    let y = coordinate(key.y(), curve.size())?;
    let invalid = || Error::InvalidKeyMaterial("point is not on the curve");

    let mut sec1 = Vec::with_capacity(1 + 2 * curve.size());
    sec1.push(0x04);
    sec1.extend_from_slice(&x);
    sec1.extend_from_slice(&y);

    match curve {
        Curve::P256 => {
            let point = p256::EncodedPoint::from_bytes(&sec1).map_err(|_| invalid())?;
            let key: Option<p256::PublicKey> = p256::PublicKey::from_encoded_point(&point).into();
            key.map(PublicKey::P256).ok_or_else(invalid)
        }
        Curve::P384 => {
            let point = p384::EncodedPoint::from_bytes(&sec1).map_err(|_| invalid())?;
            let key: Option<p384::PublicKey> = p384::PublicKey::from_encoded_point(&point).into();
            key.map(PublicKey::P384).ok_or_else(invalid)
        }
    }
}

impl TryFrom<&PubKey> for PublicKey {
    type Error = Error;

    fn try_from(value: &PubKey) -> Result<Self, Self::Error> {
        match value.material() {
            Material::Rsa(k) => Ok(PublicKey::Rsa(rsa_public_key(k)?)),
            Material::Ecc(k) => ec_public_key(k),
        }
    }
}

/// Builds a public-only [`KeyPair`] from the public key field of `cert`.
///
/// Nothing beyond the field itself is consulted. Sizes, curves and points
/// which cannot form a key are [`Error::InvalidKeyMaterial`].
pub fn decompile(cert: &Certificate) -> Result<KeyPair, Error> {
    let key = PublicKey::try_from(cert.public_key()).map_err(|e| {
        log::debug!("{} {} key cannot be decompiled: {e}", cert.usage(), cert.algorithm());
        e
    })?;

    match (cert.algorithm().kind(), &key) {
        (KeyKind::Rsa, PublicKey::Rsa(_)) => (),
        (KeyKind::Ecdsa | KeyKind::Ecdh, PublicKey::P256(_) | PublicKey::P384(_)) => (),
        _ => return Err(Error::UnsupportedAlgorithm(cert.algorithm())),
    }

    Ok(KeyPair::from_public(key))
}

/// Lays the public half of `key` out as a certificate public key field.
///
/// Integers and coordinates are stored little-endian and zero-padded.
pub fn compile(key: &KeyPair, usage: Usage, algo: Algorithm) -> Result<PubKey, Error> {
    let too_large = || Error::InvalidKeyMaterial("key does not fit the certificate");

    let material = match key.public() {
        PublicKey::Rsa(k) => {
            let modulus: [u8; 512] = be_to_le_padded(&k.n().to_bytes_be()).ok_or_else(too_large)?;
            Material::Rsa(rsa::PubKey {
                modulus_size: bit_len(&modulus) as u32,
                pubexp: be_to_le_padded(&k.e().to_bytes_be()).ok_or_else(too_large)?,
                modulus,
            })
        }

        PublicKey::P256(k) => {
            let point = k.to_encoded_point(false);
            let (x, y) = point.x().zip(point.y()).ok_or_else(too_large)?;
            Material::Ecc(ecc::PubKey::new(
                Curve::P256,
                be_to_le_padded(x).ok_or_else(too_large)?,
                be_to_le_padded(y).ok_or_else(too_large)?,
            ))
        }

        PublicKey::P384(k) => {
            let point = k.to_encoded_point(false);
            let (x, y) = point.x().zip(point.y()).ok_or_else(too_large)?;
            Material::Ecc(ecc::PubKey::new(
                Curve::P384,
                be_to_le_padded(x).ok_or_else(too_large)?,
                be_to_le_padded(y).ok_or_else(too_large)?,
            ))
        }
    };

    Ok(PubKey::new(usage, algo, material)?)
}
