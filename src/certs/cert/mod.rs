// SPDX-License-Identifier: Apache-2.0

//! Operations that can be done on an SEV certificate.

pub mod body;
pub mod sig;

use super::*;

use crate::{
    crypto::Curve,
    util::{be_to_le_padded, hexline::HexLine, le_to_be_trimmed},
};

use body::Body;
use sig::Signature;

use serde::{de, ser};
use serde_bytes::{ByteBuf, Bytes};

/// Selects the signed region of a certificate when encoding.
pub struct SignedRegion;

/// An SEV certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Certificate {
    body: Body,
    sigs: [Option<Signature>; 2],
}

impl Certificate {
    /// Creates an unsigned certificate.
    pub(crate) fn new(body: Body) -> Self {
        Self {
            body,
            sigs: [None, None],
        }
    }

    /// Decodes a certificate which must span the whole of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let algo = peek_algorithm(bytes)?;

        let expected = algo.cert_len();
        match bytes.len().cmp(&expected) {
            std::cmp::Ordering::Less => Err(DecodeError::TruncatedBuffer {
                expected,
                actual: bytes.len(),
            }),
            std::cmp::Ordering::Greater => Err(DecodeError::OversizedBuffer {
                expected,
                actual: bytes.len(),
            }),
            std::cmp::Ordering::Equal => Self::parse(bytes),
        }
    }

    /// Encodes the certificate.
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.algorithm().cert_len());
        self.encode(&mut bytes, ())?;
        Ok(bytes)
    }

    /// Encodes the bytes covered by the certificate's signatures.
    pub fn signed_region(&self) -> std::io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(Body::SIZE);
        self.encode(&mut bytes, SignedRegion)?;
        Ok(bytes)
    }

    /// Renders the encoded certificate as rows of hex octets.
    pub fn hexdump(&self) -> std::io::Result<String> {
        Ok(crate::util::hexdump(&self.to_bytes()?))
    }

    /// The certificate format version.
    pub fn version(&self) -> u32 {
        self.body.version()
    }

    /// The firmware API version the certificate was issued under.
    pub fn firmware(&self) -> Version {
        self.body.firmware()
    }

    /// The role of the certificate's public key.
    pub fn usage(&self) -> Usage {
        self.body.key().usage()
    }

    /// The algorithm of the certificate's public key.
    pub fn algorithm(&self) -> Algorithm {
        self.body.key().algorithm()
    }

    /// The signed region of the certificate.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The certificate's public key field.
    pub fn public_key(&self) -> &PubKey {
        self.body.key()
    }

    /// Both signature slots; `None` marks an unused slot.
    pub fn signatures(&self) -> &[Option<Signature>; 2] {
        &self.sigs
    }

    /// The first unused signature slot.
    pub(crate) fn free_slot(&self) -> Option<usize> {
        self.sigs.iter().position(Option::is_none)
    }

    /// Replaces the body and fills `slot` in one step.
    pub(crate) fn commit(&mut self, body: Body, slot: usize, sig: Signature) {
        self.body = body;
        self.sigs[slot] = Some(sig);
    }

    fn parse(mut bytes: &[u8]) -> Result<Self, DecodeError> {
        let body = Body::decode(&mut bytes, ())?;
        let first = Option::<Signature>::decode(&mut bytes, ())?;
        let second = Option::<Signature>::decode(&mut bytes, ())?;

        Ok(Self {
            body,
            sigs: [first, second],
        })
    }
}

/// Reads the public key algorithm out of a certificate header.
fn peek_algorithm(bytes: &[u8]) -> Result<Algorithm, DecodeError> {
    const OFFSET: usize = 0xC;

    let header = bytes
        .get(..Algorithm::HEADER_LEN)
        .ok_or(DecodeError::TruncatedBuffer {
            expected: Algorithm::HEADER_LEN,
            actual: bytes.len(),
        })?;

    let mut raw = [0u8; 4];
    raw.copy_from_slice(&header[OFFSET..OFFSET + 4]);
    Algorithm::try_from(u32::from_le_bytes(raw))
}

/// Reads until `buf` is full or the reader is exhausted.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize, DecodeError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }
    Ok(filled)
}

impl Decoder<()> for Certificate {
    type Error = DecodeError;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        let mut bytes = vec![0u8; Algorithm::HEADER_LEN];
        let read = fill(reader, &mut bytes)?;
        if read < bytes.len() {
            return Err(DecodeError::TruncatedBuffer {
                expected: bytes.len(),
                actual: read,
            });
        }

        let expected = peek_algorithm(&bytes)?.cert_len();
        bytes.resize(expected, 0);
        let read = Algorithm::HEADER_LEN + fill(reader, &mut bytes[Algorithm::HEADER_LEN..])?;
        if read < expected {
            return Err(DecodeError::TruncatedBuffer {
                expected,
                actual: read,
            });
        }

        Self::parse(&bytes)
    }
}

impl Encoder<()> for Certificate {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer
            .write_bytes(&self.body)?
            .write_bytes(&self.sigs[0])?
            .write_bytes(&self.sigs[1])?;
        Ok(())
    }
}

impl Encoder<SignedRegion> for Certificate {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: SignedRegion) -> Result<(), Self::Error> {
        writer.write_bytes(&self.body)?;
        Ok(())
    }
}

impl<'de> de::Deserialize<'de> for Certificate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let bytes = ByteBuf::deserialize(deserializer)?;
        Self::from_bytes(bytes.as_slice()).map_err(de::Error::custom)
    }
}

impl ser::Serialize for Certificate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let bytes = self.to_bytes().map_err(ser::Error::custom)?;
        Bytes::new(&bytes).serialize(serializer)
    }
}

impl std::fmt::Display for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "Certificate v{} (API {}): {} {}",
            self.version(),
            self.firmware(),
            self.usage(),
            self.algorithm()
        )?;

        match self.public_key().material() {
            Material::Rsa(k) => writeln!(f, "{k}")?,
            Material::Ecc(k) => writeln!(f, "{k}")?,
        }

        for (i, sig) in self.sigs.iter().enumerate() {
            match sig {
                Some(sig) => writeln!(f, "Signature {}: {sig}", i + 1)?,
                None => writeln!(f, "Signature {}: unused", i + 1)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ecdh_cert() -> Certificate {
        let key = key::ecc::PubKey::new(Curve::P384, [0x11; 72], [0x22; 72]);
        let key = PubKey::new(Usage::PDH, Algorithm::EcdhSha256, Material::Ecc(key)).unwrap();
        Certificate::new(Body::new(1, Version::new(1, 51), key))
    }

    #[test]
    fn layout() {
        let bytes = ecdh_cert().to_bytes().unwrap();
        assert_eq!(bytes.len(), 0x824);
        assert_eq!(&bytes[0x0..0x4], &1u32.to_le_bytes());
        assert_eq!(&bytes[0x4..0x6], &[1, 51]);
        assert_eq!(&bytes[0x8..0xC], &0x1003u32.to_le_bytes());
        assert_eq!(&bytes[0xC..0x10], &3u32.to_le_bytes());
        assert_eq!(&bytes[0x10..0x14], &2u32.to_le_bytes());
        assert_eq!(bytes[0x14], 0x11);
        assert_eq!(bytes[0x14 + 72], 0x22);
        assert_eq!(&bytes[0x414..0x418], &0x1000u32.to_le_bytes());
        assert_eq!(&bytes[0x61C..0x620], &0x1000u32.to_le_bytes());
    }

    #[test]
    fn signed_region_is_the_body() {
        let cert = ecdh_cert();
        let region = cert.signed_region().unwrap();
        assert_eq!(region.len(), Body::SIZE);
        assert_eq!(region[..], cert.to_bytes().unwrap()[..Body::SIZE]);
    }

    #[test]
    fn exact_length() {
        let mut bytes = ecdh_cert().to_bytes().unwrap();
        assert_eq!(Certificate::from_bytes(&bytes).unwrap(), ecdh_cert());

        bytes.push(0);
        assert!(matches!(
            Certificate::from_bytes(&bytes),
            Err(DecodeError::OversizedBuffer {
                expected: 0x824,
                actual: 0x825
            })
        ));

        assert!(matches!(
            Certificate::from_bytes(&bytes[..8]),
            Err(DecodeError::TruncatedBuffer {
                expected: 16,
                actual: 8
            })
        ));
    }

    #[test]
    fn stream_decode_reports_length() {
        let bytes = ecdh_cert().to_bytes().unwrap();

        let mut reader = &bytes[..0x800];
        assert!(matches!(
            Certificate::decode(&mut reader, ()),
            Err(DecodeError::TruncatedBuffer {
                expected: 0x824,
                actual: 0x800
            })
        ));

        let mut twice = bytes.clone();
        twice.extend_from_slice(&bytes);
        let mut reader = &twice[..];
        assert_eq!(Certificate::decode(&mut reader, ()).unwrap(), ecdh_cert());
        assert_eq!(Certificate::decode(&mut reader, ()).unwrap(), ecdh_cert());
        assert!(reader.is_empty());
    }

    #[test]
    fn unknown_algorithm() {
        let mut bytes = ecdh_cert().to_bytes().unwrap();
        bytes[0xC] = 0x7;
        assert!(matches!(
            Certificate::from_bytes(&bytes),
            Err(DecodeError::UnknownAlgorithm(7))
        ));
    }

    #[test]
    fn display() {
        let text = ecdh_cert().to_string();
        assert!(text.starts_with("Certificate v1 (API 1.51): PDH ECDH SHA256\n"));
        assert!(text.contains("EC P-384"));
        assert!(text.contains("Signature 2: unused"));
    }
}
