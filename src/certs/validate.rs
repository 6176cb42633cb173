// SPDX-License-Identifier: Apache-2.0

//! Structural and cryptographic checks on a single certificate.
//!
//! The structural checks ([`validate_usage`], [`validate_body`] and
//! [`validate_public_key`]) never touch a signature and are cheap enough to
//! run before any cryptographic work.

use super::*;

use crate::crypto::Digest;

use ::rsa::{traits::PublicKeyParts, BigUint};

/// Checks that `usage` is one of the roles a public key may hold.
pub fn validate_usage(usage: Usage) -> Result<(), ValidationError> {
    if usage.is_known() {
        Ok(())
    } else {
        log::debug!("rejecting unknown usage {usage}");
        Err(ValidationError::InvalidUsage(usage.into()))
    }
}

/// Runs the structural checks of [`validate_body_with`] under the default
/// [`Policy`].
pub fn validate_body(cert: &Certificate) -> Result<(), ValidationError> {
    validate_body_with(&Policy::default(), cert)
}

/// Checks the version, usage, algorithm and key size of `cert`.
///
/// A PDH key must be an ECDH key; every other role must be able to sign.
/// Signatures are not examined.
pub fn validate_body_with(policy: &Policy, cert: &Certificate) -> Result<(), ValidationError> {
    let version = cert.version();
    if version == 0 || version > policy.max_version {
        log::debug!("rejecting certificate version {version}");
        return Err(ValidationError::UnsupportedVersion(version));
    }

    let usage = cert.usage();
    validate_usage(usage)?;

    let algo = cert.algorithm();
    let agreement = algo.kind() == KeyKind::Ecdh;
    if agreement != (usage == Usage::PDH) {
        log::debug!("a {usage} certificate cannot hold a {algo} key");
        return Err(ValidationError::KeyAlgorithmMismatch);
    }

    match cert.public_key().material() {
        Material::Rsa(k) if !policy.rsa_modulus_bits.contains(&k.modulus_size()) => {
            log::debug!("rejecting RSA-{} {usage} key", k.modulus_size());
            Err(ValidationError::InvalidKeySize(k.modulus_size()))
        }
        Material::Ecc(k) if !k.curve().is_some_and(|c| policy.curves.contains(&c)) => {
            log::debug!("rejecting {usage} key on curve {:#x}", k.curve_id());
            Err(ValidationError::UnsupportedCurve(k.curve_id()))
        }
        _ => Ok(()),
    }
}

/// Runs [`validate_public_key_with`] under the default [`Policy`].
pub fn validate_public_key(cert: &Certificate, key: &KeyPair) -> Result<(), ValidationError> {
    validate_public_key_with(&Policy::default(), cert, key)
}

/// Checks that `key` is an acceptable key matching the public key field of
/// `cert`.
pub fn validate_public_key_with(
    policy: &Policy,
    cert: &Certificate,
    key: &KeyPair,
) -> Result<(), ValidationError> {
    match (cert.public_key().material(), key.public()) {
        (Material::Rsa(declared), PublicKey::Rsa(k)) => {
            if !policy
                .rsa_exponents
                .iter()
                .any(|e| BigUint::from(*e) == *k.e())
            {
                log::debug!("rejecting RSA exponent {}", k.e());
                return Err(ValidationError::RejectedExponent);
            }

            let bits = compile::bit_len(&k.n().to_bytes_le()) as u32;
            if bits != declared.modulus_size() || !policy.rsa_modulus_bits.contains(&bits) {
                log::debug!(
                    "RSA-{bits} key does not match its declared size of {}",
                    declared.modulus_size()
                );
                return Err(ValidationError::InvalidKeySize(bits));
            }

            Ok(())
        }

        (Material::Ecc(declared), PublicKey::P256(_) | PublicKey::P384(_)) => {
            match key.public().curve() {
                Some(c) if declared.curve() == Some(c) && policy.curves.contains(&c) => Ok(()),
                _ => {
                    log::debug!("key curve does not match curve {:#x}", declared.curve_id());
                    Err(ValidationError::UnsupportedCurve(declared.curve_id()))
                }
            }
        }

        _ => Err(ValidationError::KeyAlgorithmMismatch),
    }
}

/// Hashes the signed region of `cert` with the digest `algo` signs over.
pub fn calc_hash_digest(
    provider: &impl Provider,
    cert: &Certificate,
    algo: Algorithm,
) -> Result<Digest, Error> {
    let digest = provider.digest(&cert.signed_region()?, algo.hash());
    log::trace!("{} certificate {digest:?}", cert.usage());
    Ok(digest)
}

/// Verifies the signature `parent` made over `child` using `parent_key`.
///
/// The signature is found by the usage of `parent` and must use its
/// algorithm. Every failure, including a missing signature, is reported as
/// [`Error::SignatureInvalid`] naming the parent's usage.
pub fn validate_signature(
    provider: &impl Provider,
    child: &Certificate,
    parent: &Certificate,
    parent_key: &KeyPair,
) -> Result<(), Error> {
    let signer = parent.usage();
    let invalid = |why: &str| {
        log::debug!("{} signature over {}: {why}", signer, child.usage());
        Error::SignatureInvalid { signer }
    };

    let sig = child
        .signatures()
        .iter()
        .flatten()
        .find(|sig| sig.usage() == signer)
        .ok_or_else(|| invalid("no signature made by this usage"))?;

    if sig.algorithm() != parent.algorithm() {
        return Err(invalid("algorithm differs from the signing key"));
    }

    let digest = calc_hash_digest(provider, child, sig.algorithm())?;
    if !provider.verify(parent_key, &digest, &sig.bytes(), sig.algorithm()) {
        return Err(invalid("verification failed"));
    }

    Ok(())
}
