// SPDX-License-Identifier: Apache-2.0

//! Helpful primitives for developing the crate.

pub(crate) mod hexline;
pub(crate) mod parser_helper;

/// Renders bytes as rows of sixteen lowercase hex octets.
pub fn hexdump(bytes: &[u8]) -> String {
    let mut retval: String = String::new();
    for (i, byte) in bytes.iter().enumerate() {
        if (i % 16) == 0 {
            retval.push('\n');
        }
        retval.push_str(&format!("{byte:02x} "));
    }
    retval.push('\n');
    retval
}

/// Converts a little-endian integer to big-endian, dropping leading zeros.
pub(crate) fn le_to_be_trimmed(value: &[u8]) -> Vec<u8> {
    let mut be: Vec<u8> = value.iter().rev().copied().collect();
    let zeros = be.iter().take_while(|b| **b == 0).count();
    be.drain(..zeros);
    be
}

/// Writes a big-endian integer into a fixed little-endian field.
///
/// Returns `None` if the value does not fit.
pub(crate) fn be_to_le_padded<const N: usize>(value: &[u8]) -> Option<[u8; N]> {
    let zeros = value.iter().take_while(|b| **b == 0).count();
    let value = &value[zeros..];
    if value.len() > N {
        return None;
    }

    let mut buf = [0u8; N];
    for (i, b) in value.iter().rev().enumerate() {
        buf[i] = *b;
    }

    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexdump_rows() {
        let dump = hexdump(&[0xab; 17]);
        assert_eq!(dump.lines().filter(|l| !l.is_empty()).count(), 2);
        assert!(dump.starts_with("\nab ab"));
    }

    #[test]
    fn little_endian_helpers() {
        let le: [u8; 8] = be_to_le_padded(&[0x00, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(le, [0x03, 0x02, 0x01, 0, 0, 0, 0, 0]);
        assert_eq!(le_to_be_trimmed(&le), vec![0x01, 0x02, 0x03]);

        assert!(be_to_le_padded::<2>(&[1, 2, 3]).is_none());
        assert!(le_to_be_trimmed(&[0u8; 4]).is_empty());
    }
}
