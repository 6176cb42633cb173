// SPDX-License-Identifier: Apache-2.0

use crate::parser::Encoder;
use std::io::Write;

pub trait WriteExt: Write {
    fn write_bytes<T>(&mut self, value: &T) -> Result<&mut Self, std::io::Error>
    where
        Self: Sized,
        T: Encoder<(), Error = std::io::Error>,
    {
        value.encode(self, ())?;
        Ok(self)
    }

    fn skip_bytes<const SKIP: usize>(&mut self) -> Result<&mut Self, std::io::Error>
    where
        Self: Sized,
    {
        if SKIP != 0 {
            self.write_all(&[0; SKIP])?;
        }
        Ok(self)
    }
}

impl<W> WriteExt for W where W: Write {}
