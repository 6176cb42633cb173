// SPDX-License-Identifier: Apache-2.0

use super::*;

/// The kind of key an [`Algorithm`] operates on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// RSA keys; used for signing only.
    Rsa,

    /// Elliptic curve keys used for signing.
    Ecdsa,

    /// Elliptic curve keys used for key agreement.
    Ecdh,
}

/// The public key (and signature) algorithms of a SEV certificate.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSASSA-PSS over SHA-256.
    RsaSha256 = 0x1,

    /// ECDSA over SHA-256.
    EcdsaSha256 = 0x2,

    /// ECDH, SHA-256 when signed.
    EcdhSha256 = 0x3,

    /// RSASSA-PSS over SHA-384.
    RsaSha384 = 0x101,

    /// ECDSA over SHA-384.
    EcdsaSha384 = 0x102,

    /// ECDH, SHA-384 when signed.
    EcdhSha384 = 0x103,
}

impl Algorithm {
    /// Size of the version, firmware and key header fields.
    pub(crate) const HEADER_LEN: usize = 0x10;

    /// Size of the union holding the public key material.
    const PUB_KEY_LEN: usize = 0x404;

    /// Size of one signature slot, including its usage and algorithm.
    pub(crate) const SIG_SLOT_LEN: usize = 4 + 4 + 512;

    /// The kind of key this algorithm operates on.
    pub fn kind(self) -> KeyKind {
        match self {
            Algorithm::RsaSha256 | Algorithm::RsaSha384 => KeyKind::Rsa,
            Algorithm::EcdsaSha256 | Algorithm::EcdsaSha384 => KeyKind::Ecdsa,
            Algorithm::EcdhSha256 | Algorithm::EcdhSha384 => KeyKind::Ecdh,
        }
    }

    /// The digest used when a signature is made with this algorithm.
    pub fn hash(self) -> HashAlgorithm {
        match self {
            Algorithm::RsaSha256 | Algorithm::EcdsaSha256 | Algorithm::EcdhSha256 => {
                HashAlgorithm::Sha256
            }
            Algorithm::RsaSha384 | Algorithm::EcdsaSha384 | Algorithm::EcdhSha384 => {
                HashAlgorithm::Sha384
            }
        }
    }

    /// Whether keys of this algorithm can produce signatures.
    pub fn is_signing(self) -> bool {
        self.kind() != KeyKind::Ecdh
    }

    /// Size in bytes of the public key field.
    pub fn pub_key_len(self) -> usize {
        Self::PUB_KEY_LEN
    }

    /// Size in bytes of a whole certificate carrying a key of this algorithm.
    pub fn cert_len(self) -> usize {
        Self::HEADER_LEN + self.pub_key_len() + 2 * Self::SIG_SLOT_LEN
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Algorithm::RsaSha256 => "RSA SHA256",
            Algorithm::EcdsaSha256 => "ECDSA SHA256",
            Algorithm::EcdhSha256 => "ECDH SHA256",
            Algorithm::RsaSha384 => "RSA SHA384",
            Algorithm::EcdsaSha384 => "ECDSA SHA384",
            Algorithm::EcdhSha384 => "ECDH SHA384",
        };
        write!(f, "{name}")
    }
}

impl From<Algorithm> for u32 {
    fn from(value: Algorithm) -> Self {
        value as u32
    }
}

impl TryFrom<u32> for Algorithm {
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0x1 => Algorithm::RsaSha256,
            0x2 => Algorithm::EcdsaSha256,
            0x3 => Algorithm::EcdhSha256,
            0x101 => Algorithm::RsaSha384,
            0x102 => Algorithm::EcdsaSha384,
            0x103 => Algorithm::EcdhSha384,
            _ => return Err(DecodeError::UnknownAlgorithm(value)),
        })
    }
}

impl Decoder<()> for Algorithm {
    type Error = DecodeError;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        let raw: u32 = reader.read_bytes()?;
        Algorithm::try_from(raw)
    }
}

impl Encoder<()> for Algorithm {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer.write_bytes(&u32::from(*self))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        for algo in [
            Algorithm::RsaSha256,
            Algorithm::EcdsaSha384,
            Algorithm::EcdhSha256,
        ] {
            assert_eq!(algo.cert_len(), 0x824);
            assert_eq!(algo.pub_key_len(), 0x404);
        }
    }

    #[test]
    fn tags() {
        assert_eq!(Algorithm::try_from(0x102).unwrap(), Algorithm::EcdsaSha384);
        assert_eq!(u32::from(Algorithm::EcdhSha384), 0x103);
        assert!(matches!(
            Algorithm::try_from(0x4),
            Err(DecodeError::UnknownAlgorithm(0x4))
        ));
        assert!(matches!(
            Algorithm::try_from(0),
            Err(DecodeError::UnknownAlgorithm(0))
        ));
    }

    #[test]
    fn kinds() {
        assert_eq!(Algorithm::RsaSha384.hash(), HashAlgorithm::Sha384);
        assert!(Algorithm::EcdsaSha256.is_signing());
        assert!(!Algorithm::EcdhSha384.is_signing());
        assert_eq!(Algorithm::EcdhSha256.kind(), KeyKind::Ecdh);
    }
}
