// SPDX-License-Identifier: Apache-2.0

use super::*;

use crate::crypto::Curve;

use serde::{Deserialize, Serialize};

/// The key parameters a verifier accepts.
///
/// The defaults follow the AMD SEV API: RSA keys with the exponent 65537
/// and 2048 or 4096 bit moduli, P-256 and P-384 curves and version 1
/// certificates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Accepted RSA public exponents.
    pub rsa_exponents: Vec<u64>,

    /// Accepted RSA modulus sizes, in bits.
    pub rsa_modulus_bits: Vec<u32>,

    /// Accepted elliptic curves.
    pub curves: Vec<Curve>,

    /// The newest accepted certificate version.
    pub max_version: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            rsa_exponents: vec![65537],
            rsa_modulus_bits: vec![2048, 4096],
            curves: vec![Curve::P256, Curve::P384],
            max_version: 1,
        }
    }
}

/// Which certificates may sign a certificate of a given usage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Signers {
    /// The certificate signs itself.
    SelfSigned,

    /// A single parent holding any of the listed usages.
    AnyOf(&'static [Usage]),

    /// Two parents: the first holding the first usage, the second the second.
    Both(Usage, Usage),
}

impl Signers {
    /// The signing rule for `usage`, if it may appear in a certificate.
    pub fn for_usage(usage: Usage) -> Option<Self> {
        Some(match usage {
            Usage::ARK | Usage::OCA => Signers::SelfSigned,
            Usage::ASK => Signers::AnyOf(&[Usage::ARK]),
            Usage::CEK => Signers::AnyOf(&[Usage::ASK]),
            Usage::PEK => Signers::Both(Usage::OCA, Usage::CEK),
            Usage::PDH => Signers::AnyOf(&[Usage::PEK, Usage::OCA]),
            _ => return None,
        })
    }

    /// The number of parents the rule requires.
    pub fn parents(&self) -> usize {
        match self {
            Signers::SelfSigned | Signers::AnyOf(_) => 1,
            Signers::Both(..) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_usage_has_a_rule() {
        for usage in [
            Usage::ARK,
            Usage::ASK,
            Usage::OCA,
            Usage::PEK,
            Usage::PDH,
            Usage::CEK,
        ] {
            assert!(Signers::for_usage(usage).is_some(), "{usage}");
        }
        assert_eq!(Signers::for_usage(Usage::INV), None);
        assert_eq!(Signers::for_usage(Usage::GODH), Signers::for_usage(Usage::PDH));
        assert_eq!(Signers::for_usage(Usage::PEK).unwrap().parents(), 2);
    }

    #[test]
    fn policy_serde_round_trip() {
        let bytes = bincode::serialize(&Policy::default()).unwrap();
        let policy: Policy = bincode::deserialize(&bytes).unwrap();
        assert_eq!(policy, Policy::default());
        assert!(policy.curves.contains(&Curve::P384));
    }
}
