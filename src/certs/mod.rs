// SPDX-License-Identifier: Apache-2.0

//! Everything needed for working with AMD SEV certificates.
//!
//! A certificate is decoded from (or encoded to) its fixed binary layout
//! with [`Certificate::from_bytes`] and [`Certificate::to_bytes`]. The
//! [`verify`] module decides whether a certificate is trusted given its
//! parent(s), and [`generate`] produces new certificates.

mod algo;
mod cert;
mod chain;
pub mod compile;
pub mod generate;
mod policy;
pub mod validate;
pub mod verify;

pub use algo::{Algorithm, KeyKind};
pub use cert::{
    body::{key, Body, Version},
    sig::Signature,
    Certificate, SignedRegion,
};
pub use key::{Material, PubKey};
pub use chain::Chain;
pub use generate::{create_cert, create_godh_cert, create_oca_cert, generate_ecdh_key_pair};
pub use policy::{Policy, Signers};
pub use verify::{verify_sev_cert, verify_sev_cert_with};

use crate::{
    crypto::{HashAlgorithm, KeyPair, Provider, PublicKey},
    error::*,
    parser::{Decoder, Encoder},
    util::parser_helper::{ReadExt, WriteExt},
};

use std::{
    convert::TryFrom,
    io::{Read, Write},
};

/// An interface for types that may contain entities such as
/// signatures that must be verified.
pub trait Verifiable {
    /// An output type for successful verification.
    type Output;

    /// Self-verifies signatures.
    fn verify(self) -> Result<Self::Output, Error>;
}

/// An interface for types that can sign another type (i.e., a certificate).
pub trait Signer<T> {
    /// The now-signed type.
    type Output;

    /// Signs the target.
    fn sign(&self, target: &mut T) -> Result<Self::Output, Error>;
}

/// Denotes a certificate's usage.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Usage(u32);

impl Usage {
    /// AMD Root Key.
    pub const ARK: Usage = Usage(0x0000);

    /// AMD Signing Key.
    pub const ASK: Usage = Usage(0x0013);

    /// Invalid usage; marks an unused signature slot.
    pub const INV: Usage = Usage(0x1000);

    /// Owner Certificate Authority.
    pub const OCA: Usage = Usage(0x1001);

    /// Platform Endorsement Key.
    pub const PEK: Usage = Usage(0x1002);

    /// Platform Diffie-Hellman.
    pub const PDH: Usage = Usage(0x1003);

    /// Chip Endorsement Key.
    pub const CEK: Usage = Usage(0x1004);

    /// Guest Owner Diffie-Hellman. Carried on the wire as a PDH.
    pub const GODH: Usage = Usage::PDH;

    /// Whether this is one of the roles a public key may hold.
    pub fn is_known(self) -> bool {
        matches!(
            self,
            Usage::ARK | Usage::ASK | Usage::OCA | Usage::PEK | Usage::PDH | Usage::CEK
        )
    }
}

impl From<u32> for Usage {
    fn from(value: u32) -> Self {
        Usage(value)
    }
}

impl From<Usage> for u32 {
    fn from(value: Usage) -> Self {
        value.0
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match *self {
            Usage::OCA => "OCA",
            Usage::PEK => "PEK",
            Usage::PDH => "PDH",
            Usage::CEK => "CEK",
            Usage::ARK => "ARK",
            Usage::ASK => "ASK",
            Usage::INV => "INV",
            Usage(other) => return write!(f, "{other:#x}"),
        };
        write!(f, "{name}")
    }
}

impl Decoder<()> for Usage {
    type Error = std::io::Error;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        Ok(Usage(reader.read_bytes()?))
    }
}

impl Encoder<()> for Usage {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer.write_bytes(&self.0)?;
        Ok(())
    }
}

/// A private key bound to the certificate role it was created for.
///
/// The binding stops a key from signing under a role other than its own.
pub struct PrivateKey {
    usage: Usage,
    algo: Algorithm,
    key: KeyPair,
}

impl PrivateKey {
    /// Binds `key` to `usage` and `algo`.
    ///
    /// The key must carry a private half of the kind `algo` requires.
    pub fn new(usage: Usage, algo: Algorithm, key: KeyPair) -> Result<Self, Error> {
        if !key.has_private() {
            return Err(Error::InvalidKeyMaterial("key pair has no private half"));
        }

        let rsa = matches!(key.public(), PublicKey::Rsa(_));
        if rsa != (algo.kind() == KeyKind::Rsa) {
            return Err(ValidationError::KeyAlgorithmMismatch.into());
        }

        Ok(Self { usage, algo, key })
    }

    /// The role this key signs for.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// The algorithm of the key.
    pub fn algorithm(&self) -> Algorithm {
        self.algo
    }

    /// The underlying key pair.
    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    /// Derives the ECDH shared secret with the key of `peer`.
    pub fn derive(&self, provider: &impl Provider, peer: &Certificate) -> Result<Vec<u8>, Error> {
        if self.algo.kind() != KeyKind::Ecdh {
            return Err(Error::UnsupportedAlgorithm(self.algo));
        }
        if peer.algorithm().kind() != KeyKind::Ecdh {
            return Err(Error::UnsupportedAlgorithm(peer.algorithm()));
        }

        let theirs = compile::decompile(peer)?;
        provider.derive(&self.key, &theirs)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("usage", &self.usage)
            .field("algo", &self.algo)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Curve, RustCrypto};

    #[test]
    fn usage_names() {
        assert_eq!(Usage::GODH, Usage::PDH);
        assert_eq!(Usage::CEK.to_string(), "CEK");
        assert_eq!(Usage::from(0x1234).to_string(), "0x1234");
        assert!(!Usage::INV.is_known());
        assert!(Usage::ASK.is_known());
    }

    #[test]
    fn private_key_binding() {
        let key = RustCrypto.gen_ec_key(Curve::P384).unwrap();
        assert!(matches!(
            PrivateKey::new(Usage::OCA, Algorithm::RsaSha256, key),
            Err(Error::Validation(ValidationError::KeyAlgorithmMismatch))
        ));

        let key = RustCrypto.gen_ec_key(Curve::P384).unwrap();
        let public = KeyPair::from_public(key.public().clone());
        assert!(matches!(
            PrivateKey::new(Usage::OCA, Algorithm::EcdsaSha256, public),
            Err(Error::InvalidKeyMaterial(_))
        ));

        let private = PrivateKey::new(Usage::OCA, Algorithm::EcdsaSha256, key).unwrap();
        assert_eq!(private.usage(), Usage::OCA);
        assert_eq!(private.algorithm(), Algorithm::EcdsaSha256);
    }
}
