// SPDX-License-Identifier: Apache-2.0

use super::*;

/// An elliptic curve public key as laid out in a certificate.
///
/// The coordinates are little-endian and zero-padded to 72 bytes. The
/// trailing reserved bytes are kept as read, since they are covered by the
/// certificate's signatures.
#[derive(Clone, PartialEq, Eq)]
pub struct PubKey {
    pub(crate) curve: u32,
    pub(crate) x: [u8; 72],
    pub(crate) y: [u8; 72],
    pub(crate) reserved: [u8; 880],
}

impl PubKey {
    pub(crate) fn new(curve: Curve, x: [u8; 72], y: [u8; 72]) -> Self {
        Self {
            curve: curve.id(),
            x,
            y,
            reserved: [0; 880],
        }
    }

    /// The raw curve identifier.
    pub fn curve_id(&self) -> u32 {
        self.curve
    }

    /// The curve, if the identifier names a supported one.
    pub fn curve(&self) -> Option<Curve> {
        Curve::from_id(self.curve)
    }

    /// The X coordinate, little-endian.
    pub fn x(&self) -> &[u8; 72] {
        &self.x
    }

    /// The Y coordinate, little-endian.
    pub fn y(&self) -> &[u8; 72] {
        &self.y
    }
}

impl std::fmt::Debug for PubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PubKey")
            .field("curve", &self.curve)
            .field("x", &hex::encode(le_to_be_trimmed(&self.x)))
            .field("y", &hex::encode(le_to_be_trimmed(&self.y)))
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for PubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let size = self.curve().map(Curve::size).unwrap_or(self.x.len());
        match self.curve() {
            Some(curve) => writeln!(f, "EC {curve}")?,
            None => writeln!(f, "EC curve {:#x}", self.curve)?,
        }
        write!(f, "Qx:{}", HexLine(&self.x[..size]))?;
        write!(f, "\nQy:{}", HexLine(&self.y[..size]))
    }
}

impl Decoder<()> for PubKey {
    type Error = std::io::Error;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        Ok(Self {
            curve: reader.read_bytes()?,
            x: reader.read_bytes()?,
            y: reader.read_bytes()?,
            reserved: reader.read_bytes()?,
        })
    }
}

impl Encoder<()> for PubKey {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer
            .write_bytes(&self.curve)?
            .write_bytes(&self.x)?
            .write_bytes(&self.y)?
            .write_bytes(&self.reserved)?;
        Ok(())
    }
}
