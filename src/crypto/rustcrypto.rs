// SPDX-License-Identifier: Apache-2.0

use super::*;

use crate::{certs::KeyKind, error::ValidationError};

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;
use rsa::{traits::PublicKeyParts, Pss};
use sha2::Digest as _;

/// The default [`Provider`], built on the RustCrypto crates.
///
/// RSA signatures use RSASSA-PSS with a salt as long as the digest. ECDSA
/// signs the certificate digest directly. Randomness is drawn from the
/// operating system.
#[derive(Copy, Clone, Debug, Default)]
pub struct RustCrypto;

fn crypto_error(what: &str, e: impl std::fmt::Display) -> Error {
    Error::Crypto(format!("{what}: {e}"))
}

/// Left-pads (or strips leading zeros from) a big-endian integer so that
/// it is exactly `len` bytes long.
fn fit(value: &[u8], len: usize) -> Option<Vec<u8>> {
    let zeros = value.iter().take_while(|b| **b == 0).count();
    let value = &value[zeros..];
    if value.len() > len {
        return None;
    }

    let mut out = vec![0u8; len - value.len()];
    out.extend_from_slice(value);
    Some(out)
}

fn scalars(r: &[u8], s: &[u8], curve: Curve) -> Option<Vec<u8>> {
    let mut bytes = fit(r, curve.size())?;
    bytes.extend(fit(s, curve.size())?);
    Some(bytes)
}

impl Provider for RustCrypto {
    fn gen_rsa_key(&self, bits: usize) -> Result<KeyPair, Error> {
        let key = rsa::RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| crypto_error("RSA key generation failed", e))?;
        Ok(KeyPair::from_secret(SecretKey::Rsa(key)))
    }

    fn gen_ec_key(&self, curve: Curve) -> Result<KeyPair, Error> {
        Ok(KeyPair::from_secret(match curve {
            Curve::P256 => SecretKey::P256(p256::SecretKey::random(&mut OsRng)),
            Curve::P384 => SecretKey::P384(p384::SecretKey::random(&mut OsRng)),
        }))
    }

    fn digest(&self, bytes: &[u8], hash: HashAlgorithm) -> Digest {
        match hash {
            HashAlgorithm::Sha256 => {
                let mut out = [0u8; 32];
                out.copy_from_slice(&sha2::Sha256::digest(bytes));
                Digest::Sha256(out)
            }
            HashAlgorithm::Sha384 => {
                let mut out = [0u8; 48];
                out.copy_from_slice(&sha2::Sha384::digest(bytes));
                Digest::Sha384(out)
            }
        }
    }

    fn sign(
        &self,
        key: &KeyPair,
        digest: &Digest,
        algo: Algorithm,
    ) -> Result<SignatureBytes, Error> {
        if digest.algorithm() != algo.hash() {
            return Err(Error::Crypto(format!(
                "{:?} digest cannot be signed as {algo}",
                digest.algorithm()
            )));
        }

        let secret = key
            .secret()
            .ok_or_else(|| Error::Crypto("key pair has no private half".to_string()))?;

        match (algo.kind(), secret) {
            (KeyKind::Rsa, SecretKey::Rsa(k)) => {
                let sig = match algo.hash() {
                    HashAlgorithm::Sha256 => {
                        k.sign_with_rng(&mut OsRng, Pss::new::<sha2::Sha256>(), digest.as_bytes())
                    }
                    HashAlgorithm::Sha384 => {
                        k.sign_with_rng(&mut OsRng, Pss::new::<sha2::Sha384>(), digest.as_bytes())
                    }
                }
                .map_err(|e| crypto_error("RSA signing failed", e))?;
                Ok(SignatureBytes::Rsa(sig))
            }

            (KeyKind::Ecdsa, SecretKey::P256(k)) => {
                let signer = p256::ecdsa::SigningKey::from(k.clone());
                let sig: p256::ecdsa::Signature = signer
                    .sign_prehash(digest.as_bytes())
                    .map_err(|e| crypto_error("ECDSA signing failed", e))?;
                let (r, s) = sig.split_bytes();
                Ok(SignatureBytes::Ecdsa {
                    r: r.to_vec(),
                    s: s.to_vec(),
                })
            }

            (KeyKind::Ecdsa, SecretKey::P384(k)) => {
                let signer = p384::ecdsa::SigningKey::from(k.clone());
                let sig: p384::ecdsa::Signature = signer
                    .sign_prehash(digest.as_bytes())
                    .map_err(|e| crypto_error("ECDSA signing failed", e))?;
                let (r, s) = sig.split_bytes();
                Ok(SignatureBytes::Ecdsa {
                    r: r.to_vec(),
                    s: s.to_vec(),
                })
            }

            (KeyKind::Ecdh, _) => Err(Error::UnsupportedAlgorithm(algo)),

            _ => Err(ValidationError::KeyAlgorithmMismatch.into()),
        }
    }

    fn verify(
        &self,
        key: &KeyPair,
        digest: &Digest,
        sig: &SignatureBytes,
        algo: Algorithm,
    ) -> bool {
        if digest.algorithm() != algo.hash() {
            return false;
        }

        match (algo.kind(), key.public(), sig) {
            (KeyKind::Rsa, PublicKey::Rsa(k), SignatureBytes::Rsa(s)) => {
                let s = match fit(s, k.size()) {
                    Some(s) => s,
                    None => return false,
                };
                let ok = match algo.hash() {
                    HashAlgorithm::Sha256 => {
                        k.verify(Pss::new::<sha2::Sha256>(), digest.as_bytes(), &s)
                    }
                    HashAlgorithm::Sha384 => {
                        k.verify(Pss::new::<sha2::Sha384>(), digest.as_bytes(), &s)
                    }
                };
                ok.is_ok()
            }

            (KeyKind::Ecdsa, PublicKey::P256(k), SignatureBytes::Ecdsa { r, s }) => {
                let sig = match scalars(r, s, Curve::P256)
                    .and_then(|b| p256::ecdsa::Signature::from_slice(&b).ok())
                {
                    Some(sig) => sig,
                    None => return false,
                };
                match p256::ecdsa::VerifyingKey::from_affine(*k.as_affine()) {
                    Ok(v) => v.verify_prehash(digest.as_bytes(), &sig).is_ok(),
                    Err(_) => false,
                }
            }

            (KeyKind::Ecdsa, PublicKey::P384(k), SignatureBytes::Ecdsa { r, s }) => {
                let sig = match scalars(r, s, Curve::P384)
                    .and_then(|b| p384::ecdsa::Signature::from_slice(&b).ok())
                {
                    Some(sig) => sig,
                    None => return false,
                };
                match p384::ecdsa::VerifyingKey::from_affine(*k.as_affine()) {
                    Ok(v) => v.verify_prehash(digest.as_bytes(), &sig).is_ok(),
                    Err(_) => false,
                }
            }

            _ => false,
        }
    }

    fn derive(&self, key: &KeyPair, peer: &KeyPair) -> Result<Vec<u8>, Error> {
        let secret = key
            .secret()
            .ok_or_else(|| Error::Crypto("key pair has no private half".to_string()))?;

        match (secret, peer.public()) {
            (SecretKey::P256(s), PublicKey::P256(p)) => {
                let shared = p256::ecdh::diffie_hellman(s.to_nonzero_scalar(), p.as_affine());
                Ok(shared.raw_secret_bytes().to_vec())
            }
            (SecretKey::P384(s), PublicKey::P384(p)) => {
                let shared = p384::ecdh::diffie_hellman(s.to_nonzero_scalar(), p.as_affine());
                Ok(shared.raw_secret_bytes().to_vec())
            }
            _ => Err(ValidationError::KeyAlgorithmMismatch.into()),
        }
    }
}
