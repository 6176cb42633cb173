// SPDX-License-Identifier: Apache-2.0

//! The cryptographic primitive provider consumed by the certificate core.
//!
//! Everything in [`crate::certs`] reaches key generation, hashing, signing
//! and verification through the [`Provider`] trait. [`RustCrypto`] is the
//! stock implementation built on the pure-Rust `rsa`, `p256`, `p384` and
//! `sha2` crates.

pub mod pem;
mod rustcrypto;

pub use rustcrypto::RustCrypto;

use crate::{certs::Algorithm, error::Error};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Elliptic curves understood by SEV certificates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// NIST P-256 (secp256r1).
    P256,

    /// NIST P-384 (secp384r1).
    P384,
}

impl Curve {
    /// The curve identifier used in the certificate's public key field.
    pub fn id(self) -> u32 {
        match self {
            Curve::P256 => 1,
            Curve::P384 => 2,
        }
    }

    /// Looks a curve up by its certificate identifier.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Curve::P256),
            2 => Some(Curve::P384),
            _ => None,
        }
    }

    /// Size in bytes of a coordinate or scalar.
    pub fn size(self) -> usize {
        match self {
            Curve::P256 => 32,
            Curve::P384 => 48,
        }
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Curve::P256 => write!(f, "P-256"),
            Curve::P384 => write!(f, "P-384"),
        }
    }
}

/// Digest algorithms used over a certificate's signed region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,

    /// SHA-384.
    Sha384,
}

impl HashAlgorithm {
    /// Size of the digest in bytes.
    pub fn size(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
        }
    }
}

/// A fixed-size digest.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Digest {
    /// A SHA-256 digest.
    Sha256([u8; 32]),

    /// A SHA-384 digest.
    Sha384([u8; 48]),
}

impl Digest {
    /// The algorithm which produced this digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Digest::Sha256(_) => HashAlgorithm::Sha256,
            Digest::Sha384(_) => HashAlgorithm::Sha384,
        }
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Digest::Sha256(d) => &d[..],
            Digest::Sha384(d) => &d[..],
        }
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Digest {{ {:?}: {} }}",
            self.algorithm(),
            hex::encode(self.as_bytes())
        )
    }
}

/// Raw signature values exchanged with a [`Provider`].
///
/// All integers are big-endian, as produced by the primitives. The
/// certificate layer converts them into its little-endian fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureBytes {
    /// An RSASSA-PSS signature.
    Rsa(Vec<u8>),

    /// The `r` and `s` scalars of an ECDSA signature.
    Ecdsa {
        /// The `r` scalar.
        r: Vec<u8>,
        /// The `s` scalar.
        s: Vec<u8>,
    },
}

/// A public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// An RSA public key.
    Rsa(rsa::RsaPublicKey),

    /// A P-256 public key.
    P256(p256::PublicKey),

    /// A P-384 public key.
    P384(p384::PublicKey),
}

impl PublicKey {
    /// The curve of an elliptic curve key.
    pub fn curve(&self) -> Option<Curve> {
        match self {
            PublicKey::Rsa(_) => None,
            PublicKey::P256(_) => Some(Curve::P256),
            PublicKey::P384(_) => Some(Curve::P384),
        }
    }
}

pub(crate) enum SecretKey {
    Rsa(rsa::RsaPrivateKey),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
}

impl SecretKey {
    fn public_key(&self) -> PublicKey {
        match self {
            SecretKey::Rsa(k) => PublicKey::Rsa(k.to_public_key()),
            SecretKey::P256(k) => PublicKey::P256(k.public_key()),
            SecretKey::P384(k) => PublicKey::P384(k.public_key()),
        }
    }
}

/// An opaque key-pair handle.
///
/// Handles produced by key generation or PEM import carry a private half;
/// handles decompiled from a certificate carry only the public half. A
/// handle is deliberately not `Clone`: it is moved into whatever consumes
/// it.
pub struct KeyPair {
    public: PublicKey,
    secret: Option<SecretKey>,
}

impl KeyPair {
    /// Wraps a public key with no private half.
    pub fn from_public(public: PublicKey) -> Self {
        Self {
            public,
            secret: None,
        }
    }

    pub(crate) fn from_secret(secret: SecretKey) -> Self {
        Self {
            public: secret.public_key(),
            secret: Some(secret),
        }
    }

    /// The public half of the key pair.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// Whether the handle can sign or derive.
    pub fn has_private(&self) -> bool {
        self.secret.is_some()
    }

    pub(crate) fn secret(&self) -> Option<&SecretKey> {
        self.secret.as_ref()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &self.has_private())
            .finish()
    }
}

/// The capability interface to the cryptographic primitives.
pub trait Provider {
    /// Generates an RSA key pair with a modulus of `bits` bits.
    fn gen_rsa_key(&self, bits: usize) -> Result<KeyPair, Error>;

    /// Generates an ECDSA key pair on `curve`.
    fn gen_ec_key(&self, curve: Curve) -> Result<KeyPair, Error>;

    /// Generates an ECDH key pair on `curve`.
    fn gen_ecdh_key(&self, curve: Curve) -> Result<KeyPair, Error> {
        self.gen_ec_key(curve)
    }

    /// Hashes `bytes`.
    fn digest(&self, bytes: &[u8], hash: HashAlgorithm) -> Digest;

    /// Signs `digest` with the private half of `key` as `algo` prescribes.
    fn sign(&self, key: &KeyPair, digest: &Digest, algo: Algorithm)
        -> Result<SignatureBytes, Error>;

    /// Checks `sig` over `digest` against the public half of `key`.
    fn verify(&self, key: &KeyPair, digest: &Digest, sig: &SignatureBytes, algo: Algorithm)
        -> bool;

    /// Computes the ECDH shared secret between `key` and `peer`.
    fn derive(&self, key: &KeyPair, peer: &KeyPair) -> Result<Vec<u8>, Error>;

    /// Loads a private key from a PEM file.
    fn read_private_key_pem(&self, path: &Path) -> Result<KeyPair, Error> {
        pem::read_private_key(path)
    }

    /// Stores the private half of `key` as a PKCS#8 PEM file.
    fn write_private_key_pem(&self, path: &Path, key: &KeyPair) -> Result<(), Error> {
        pem::write_private_key(path, key)
    }

    /// Stores the public half of `key` as an SPKI PEM file.
    fn write_public_key_pem(&self, path: &Path, key: &KeyPair) -> Result<(), Error> {
        pem::write_public_key(path, key.public())
    }
}
