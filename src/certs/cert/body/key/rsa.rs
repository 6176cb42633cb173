// SPDX-License-Identifier: Apache-2.0

use super::*;

/// An RSA public key as laid out in a certificate.
///
/// Both integers are little-endian and zero-padded to 4096 bits.
#[derive(Clone, PartialEq, Eq)]
pub struct PubKey {
    pub(crate) modulus_size: u32,
    pub(crate) pubexp: [u8; 512],
    pub(crate) modulus: [u8; 512],
}

impl PubKey {
    /// Declared size of the modulus in bits.
    pub fn modulus_size(&self) -> u32 {
        self.modulus_size
    }

    /// The public exponent, little-endian.
    pub fn exponent(&self) -> &[u8; 512] {
        &self.pubexp
    }

    /// The modulus, little-endian.
    pub fn modulus(&self) -> &[u8; 512] {
        &self.modulus
    }
}

impl std::fmt::Debug for PubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PubKey")
            .field("modulus_size", &self.modulus_size)
            .field("pubexp", &hex::encode(le_to_be_trimmed(&self.pubexp)))
            .field("modulus", &hex::encode(le_to_be_trimmed(&self.modulus)))
            .finish()
    }
}

impl std::fmt::Display for PubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let bytes = self.modulus_size as usize / 8;
        writeln!(f, "RSA-{}", self.modulus_size)?;
        write!(f, "Exponent:{}", HexLine(&le_to_be_trimmed(&self.pubexp)))?;
        write!(
            f,
            "\nModulus:{}",
            HexLine(&self.modulus[..bytes.min(self.modulus.len())])
        )
    }
}

impl Decoder<()> for PubKey {
    type Error = std::io::Error;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        Ok(Self {
            modulus_size: reader.read_bytes()?,
            pubexp: reader.read_bytes()?,
            modulus: reader.read_bytes()?,
        })
    }
}

impl Encoder<()> for PubKey {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer
            .write_bytes(&self.modulus_size)?
            .write_bytes(&self.pubexp)?
            .write_bytes(&self.modulus)?;
        Ok(())
    }
}
