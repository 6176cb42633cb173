// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display, Formatter};

/// Uppercase hex rows of sixteen octets, each row indented by two spaces.
pub(crate) struct HexLine<'a>(pub &'a [u8]);

impl Display for HexLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i % 16 == 0 {
                write!(f, "\n  ")?;
            } else {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
