// SPDX-License-Identifier: Apache-2.0

use super::*;

/// An ECDSA signature.
///
/// `r` and `s` are little-endian and zero-padded to 72 bytes. The 368
/// bytes which follow them in the slot are reserved.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    pub(crate) r: [u8; 72],
    pub(crate) s: [u8; 72],
}

impl Signature {
    pub(crate) fn from_be(r: &[u8], s: &[u8]) -> Option<Self> {
        Some(Self {
            r: be_to_le_padded(r)?,
            s: be_to_le_padded(s)?,
        })
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Signature")
            .field("r", &hex::encode(le_to_be_trimmed(&self.r)))
            .field("s", &hex::encode(le_to_be_trimmed(&self.s)))
            .finish()
    }
}

impl Decoder<()> for Signature {
    type Error = std::io::Error;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        let r = reader.read_bytes()?;
        let s = reader.read_bytes()?;
        reader.read_reserved_bytes::<368>()?;
        Ok(Self { r, s })
    }
}

impl Encoder<()> for Signature {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer
            .write_bytes(&self.r)?
            .write_bytes(&self.s)?
            .skip_bytes::<368>()?;
        Ok(())
    }
}
