// SPDX-License-Identifier: Apache-2.0

//! The signed region of a certificate.

pub mod key;

use super::*;

use serde::{Deserialize, Serialize};

/// The firmware API version a certificate was issued under.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// The major API version.
    pub major: u8,

    /// The minor API version.
    pub minor: u8,
}

impl Version {
    /// Creates a version from its parts.
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Decoder<()> for Version {
    type Error = std::io::Error;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        Ok(Self {
            major: reader.read_bytes()?,
            minor: reader.read_bytes()?,
        })
    }
}

impl Encoder<()> for Version {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer.write_bytes(&self.major)?.write_bytes(&self.minor)?;
        Ok(())
    }
}

/// Everything in a certificate that its signatures cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    version: u32,
    firmware: Version,
    reserved: u16,
    key: key::PubKey,
}

impl Body {
    /// Size of the body on the wire.
    pub const SIZE: usize = 0x414;

    pub(crate) fn new(version: u32, firmware: Version, key: key::PubKey) -> Self {
        Self {
            version,
            firmware,
            reserved: 0,
            key,
        }
    }

    /// The certificate format version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The firmware API version.
    pub fn firmware(&self) -> Version {
        self.firmware
    }

    /// The public key field.
    pub fn key(&self) -> &key::PubKey {
        &self.key
    }

    /// A copy of this body with the header fields replaced.
    pub(crate) fn with_header(
        &self,
        version: u32,
        usage: Usage,
        algo: Algorithm,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            version,
            firmware: self.firmware,
            reserved: self.reserved,
            key: key::PubKey::new(usage, algo, self.key.material().clone())?,
        })
    }
}

impl Decoder<()> for Body {
    type Error = DecodeError;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        Ok(Self {
            version: reader.read_bytes()?,
            firmware: reader.read_bytes()?,
            reserved: reader.read_bytes()?,
            key: reader.read_bytes()?,
        })
    }
}

impl Encoder<()> for Body {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer
            .write_bytes(&self.version)?
            .write_bytes(&self.firmware)?
            .write_bytes(&self.reserved)?
            .write_bytes(&self.key)?;
        Ok(())
    }
}
