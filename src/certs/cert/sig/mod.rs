// SPDX-License-Identifier: Apache-2.0

//! The signature slots of a certificate.

mod ecdsa;
mod rsa;

use super::*;

use crate::crypto::SignatureBytes;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Signatures {
    Rsa(rsa::Signature),
    Ecdsa(ecdsa::Signature),
}

/// A populated signature slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    usage: Usage,
    algo: Algorithm,
    sig: Signatures,
}

impl Signature {
    /// Wraps the output of a [`Provider`] for storage in a slot.
    pub(crate) fn new(usage: Usage, algo: Algorithm, sig: SignatureBytes) -> Result<Self, Error> {
        let sig = match (algo.kind(), sig) {
            (KeyKind::Rsa, SignatureBytes::Rsa(s)) => rsa::Signature::from_be(&s).map(Signatures::Rsa),
            (KeyKind::Ecdsa, SignatureBytes::Ecdsa { r, s }) => {
                ecdsa::Signature::from_be(&r, &s).map(Signatures::Ecdsa)
            }
            (KeyKind::Ecdh, _) => return Err(Error::UnsupportedAlgorithm(algo)),
            _ => return Err(ValidationError::KeyAlgorithmMismatch.into()),
        };

        let sig = sig.ok_or_else(|| Error::Crypto("signature does not fit its slot".to_string()))?;
        Ok(Self { usage, algo, sig })
    }

    /// The role of the key which made the signature.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// The algorithm the signature was made with.
    pub fn algorithm(&self) -> Algorithm {
        self.algo
    }

    /// The signature in the form a [`Provider`] verifies.
    pub(crate) fn bytes(&self) -> SignatureBytes {
        match &self.sig {
            Signatures::Rsa(s) => SignatureBytes::Rsa(s.to_be()),
            Signatures::Ecdsa(s) => SignatureBytes::Ecdsa {
                r: le_to_be_trimmed(&s.r),
                s: le_to_be_trimmed(&s.s),
            },
        }
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.usage, self.algo)?;
        match &self.sig {
            Signatures::Rsa(s) => write!(f, "{}", HexLine(&s.0)),
            Signatures::Ecdsa(s) => {
                write!(f, "\nR:{}", HexLine(&s.r))?;
                write!(f, "\nS:{}", HexLine(&s.s))
            }
        }
    }
}

impl Decoder<()> for Option<Signature> {
    type Error = DecodeError;

    /// A slot is empty unless a key role made it with a signing algorithm.
    /// Anything else leaves the payload as reserved space.
    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        let usage: Usage = reader.read_bytes()?;
        let raw: u32 = reader.read_bytes()?;

        let algo = match raw {
            0 => None,
            _ => Some(
                Algorithm::try_from(raw)
                    .map_err(|_| DecodeError::InvalidSignatureAlgorithm(raw))?,
            ),
        };

        let algo = match algo {
            Some(algo) if algo.is_signing() && usage.is_known() => algo,
            _ => {
                reader.read_reserved_bytes::<512>()?;
                return Ok(None);
            }
        };

        let sig = match algo.kind() {
            KeyKind::Rsa => Signatures::Rsa(reader.read_bytes()?),
            _ => Signatures::Ecdsa(reader.read_bytes()?),
        };

        Ok(Some(Signature { usage, algo, sig }))
    }
}

impl Encoder<()> for Option<Signature> {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        let sig = match self {
            None => {
                writer
                    .write_bytes(&Usage::INV)?
                    .write_bytes(&0u32)?
                    .skip_bytes::<512>()?;
                return Ok(());
            }
            Some(sig) => sig,
        };

        writer.write_bytes(&sig.usage)?.write_bytes(&sig.algo)?;
        match &sig.sig {
            Signatures::Rsa(s) => writer.write_bytes(s)?,
            Signatures::Ecdsa(s) => writer.write_bytes(s)?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_layout() {
        let mut out = Vec::new();
        None::<Signature>.encode(&mut out, ()).unwrap();
        assert_eq!(out.len(), Algorithm::SIG_SLOT_LEN);
        assert_eq!(&out[..8], &[0x00, 0x10, 0, 0, 0, 0, 0, 0]);
        assert!(out[8..].iter().all(|b| *b == 0));

        let decoded = Option::<Signature>::decode(&mut &out[..], ()).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn any_usage_with_no_algorithm_is_empty() {
        let mut slot = vec![0u8; Algorithm::SIG_SLOT_LEN];
        slot[..4].copy_from_slice(&0x1001u32.to_le_bytes());
        assert!(Option::<Signature>::decode(&mut &slot[..], ())
            .unwrap()
            .is_none());
    }

    #[cfg(not(feature = "lax-parser"))]
    #[test]
    fn empty_slot_must_be_zeroed() {
        let mut slot = vec![0u8; Algorithm::SIG_SLOT_LEN];
        slot[100] = 1;
        assert!(matches!(
            Option::<Signature>::decode(&mut &slot[..], ()),
            Err(DecodeError::NonZeroReserved)
        ));
    }

    #[test]
    fn non_signing_slots_are_empty() {
        let mut slot = vec![0u8; Algorithm::SIG_SLOT_LEN];
        slot[4..8].copy_from_slice(&0x3u32.to_le_bytes());
        assert!(Option::<Signature>::decode(&mut &slot[..], ())
            .unwrap()
            .is_none());

        slot[..4].copy_from_slice(&0x1000u32.to_le_bytes());
        slot[4..8].copy_from_slice(&0x2u32.to_le_bytes());
        assert!(Option::<Signature>::decode(&mut &slot[..], ())
            .unwrap()
            .is_none());

        slot[..4].copy_from_slice(&0x7777u32.to_le_bytes());
        slot[4..8].copy_from_slice(&0x101u32.to_le_bytes());
        assert!(Option::<Signature>::decode(&mut &slot[..], ())
            .unwrap()
            .is_none());
    }

    #[test]
    fn unknown_slot_algorithm() {
        let mut slot = vec![0u8; Algorithm::SIG_SLOT_LEN];
        slot[4..8].copy_from_slice(&0x7u32.to_le_bytes());
        assert!(matches!(
            Option::<Signature>::decode(&mut &slot[..], ()),
            Err(DecodeError::InvalidSignatureAlgorithm(7))
        ));
    }

    #[test]
    fn ecdsa_slot_round_trip() {
        let sig = Signature::new(
            Usage::OCA,
            Algorithm::EcdsaSha256,
            SignatureBytes::Ecdsa {
                r: vec![0x01, 0x02],
                s: vec![0x03],
            },
        )
        .unwrap();

        let mut out = Vec::new();
        Some(sig.clone()).encode(&mut out, ()).unwrap();
        assert_eq!(out.len(), Algorithm::SIG_SLOT_LEN);
        assert_eq!(&out[8..10], &[0x02, 0x01]);
        assert_eq!(out[80], 0x03);

        let back = Option::<Signature>::decode(&mut &out[..], ()).unwrap();
        assert_eq!(back, Some(sig.clone()));
        assert_eq!(
            sig.bytes(),
            SignatureBytes::Ecdsa {
                r: vec![0x01, 0x02],
                s: vec![0x03],
            }
        );
    }

    #[test]
    fn oversized_signature_is_refused() {
        let res = Signature::new(
            Usage::OCA,
            Algorithm::RsaSha256,
            SignatureBytes::Rsa(vec![0xff; 513]),
        );
        assert!(matches!(res, Err(Error::Crypto(_))));
    }
}
