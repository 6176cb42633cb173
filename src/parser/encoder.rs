// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

/// Trait used to express encoding relationships.
pub trait Encoder<T> {
    /// The error produced when the value cannot be written.
    type Error;

    /// Encodes the object to raw bytes.
    fn encode(&self, writer: &mut impl Write, params: T) -> Result<(), Self::Error>;
}

impl<const N: usize> Encoder<()> for [u8; N] {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _params: ()) -> Result<(), std::io::Error> {
        writer.write_all(self)
    }
}

macro_rules! impl_encoder {
    ($($t:ty), *) => {
        $(
            impl Encoder<()> for $t {
                type Error = std::io::Error;

                fn encode(&self, writer: &mut impl Write, _params: ()) -> Result<(), std::io::Error> {
                    writer.write_all(&self.to_le_bytes())
                }
            }
        )*
    };
}

impl_encoder!(u8, u16, u32, u64);
