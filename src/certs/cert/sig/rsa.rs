// SPDX-License-Identifier: Apache-2.0

use super::*;

/// An RSA signature, little-endian and zero-padded to 4096 bits.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(pub(crate) [u8; 512]);

impl Signature {
    pub(crate) fn from_be(value: &[u8]) -> Option<Self> {
        be_to_le_padded(value).map(Self)
    }

    pub(crate) fn to_be(&self) -> Vec<u8> {
        le_to_be_trimmed(&self.0)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Signature({})", hex::encode(self.to_be()))
    }
}

impl Decoder<()> for Signature {
    type Error = std::io::Error;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        Ok(Self(reader.read_bytes()?))
    }
}

impl Encoder<()> for Signature {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer.write_bytes(&self.0)?;
        Ok(())
    }
}
