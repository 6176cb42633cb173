// SPDX-License-Identifier: Apache-2.0

use std::io::Read;

/// Trait used to express decoding relationships.
pub trait Decoder<T>: Sized {
    /// The error produced when the input cannot be decoded.
    type Error;

    /// Decodes from the reader with the given parameters.
    fn decode(reader: &mut impl Read, params: T) -> Result<Self, Self::Error>;
}

impl<const N: usize> Decoder<()> for [u8; N] {
    type Error = std::io::Error;

    fn decode(reader: &mut impl Read, _params: ()) -> Result<Self, std::io::Error> {
        let mut buf = [0u8; N];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

macro_rules! impl_decoder
{
    ($($t:ty), *) => {
        $(
            impl Decoder<()> for $t {
                type Error = std::io::Error;

                #[inline(always)]
                fn decode(reader: &mut impl Read, _params: ()) -> Result<Self, std::io::Error> {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    reader.read_exact(&mut buf)?;
                    Ok(<$t>::from_le_bytes(buf))
                }
            }
        )*
    };
}

impl_decoder!(u8, u16, u32, u64);
