// SPDX-License-Identifier: Apache-2.0

use crate::parser::Decoder;
use std::io::Read;

pub trait ReadExt: Read {
    /// Convenience: read a value with unit params.
    fn read_bytes<T>(&mut self) -> Result<T, T::Error>
    where
        Self: Sized,
        T: Decoder<()>,
    {
        T::decode(self, ())
    }

    /// Read SKIP bytes and verify they are zero; returns a mutable reference to the same reader.
    fn skip_bytes<const SKIP: usize>(&mut self) -> Result<&mut Self, std::io::Error> {
        if SKIP != 0 {
            // Read in chunks to avoid huge stack allocations for large SKIP.
            const CHUNK: usize = 256;
            let mut buf = [0u8; CHUNK];
            let mut remaining = SKIP;

            while remaining > 0 {
                let n = remaining.min(CHUNK);
                self.read_exact(&mut buf[..n])?;
                if buf[..n].iter().any(|&b| b != 0) {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "Skipped bytes were expected to be zeroed.",
                    ));
                }
                remaining -= n;
            }
        }
        Ok(self)
    }

    #[cfg(not(feature = "lax-parser"))]
    /// Read N bytes and verify they are zero.
    fn read_reserved_bytes<const N: usize>(&mut self) -> Result<(), std::io::Error>
    where
        Self: Sized,
    {
        self.skip_bytes::<N>()?;
        Ok(())
    }

    #[cfg(feature = "lax-parser")]
    /// Read N bytes.
    fn read_reserved_bytes<const N: usize>(&mut self) -> Result<(), std::io::Error>
    where
        Self: Sized,
    {
        <[u8; N]>::decode(self, ())?;
        Ok(())
    }
}

impl<R> ReadExt for R where R: Read {}
