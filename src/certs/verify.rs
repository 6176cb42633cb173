// SPDX-License-Identifier: Apache-2.0

//! Acceptance of a certificate given the certificate(s) which signed it.

use super::*;

use crate::crypto::RustCrypto;
use validate::*;

/// Checks that the parents of `cert` are the ones its usage calls for.
fn check_signers(
    cert: &Certificate,
    parent1: &Certificate,
    parent2: Option<&Certificate>,
) -> Result<(), ValidationError> {
    let usage = cert.usage();
    let rule = Signers::for_usage(usage).ok_or(ValidationError::InvalidUsage(usage.into()))?;

    let actual = 1 + usize::from(parent2.is_some());
    if actual != rule.parents() {
        return Err(ValidationError::ParentCount {
            usage,
            expected: rule.parents(),
            actual,
        });
    }

    let unexpected = |signer: &Certificate| ValidationError::UnexpectedSigner {
        usage,
        signer: signer.usage(),
    };

    match rule {
        Signers::SelfSigned => {
            if parent1.usage() != usage {
                return Err(unexpected(parent1));
            }
            if parent1.public_key() != cert.public_key() {
                return Err(ValidationError::NotSelfSigned(usage));
            }
        }

        Signers::AnyOf(allowed) => {
            if !allowed.contains(&parent1.usage()) {
                return Err(unexpected(parent1));
            }
        }

        Signers::Both(first, second) => {
            if parent1.usage() != first {
                return Err(unexpected(parent1));
            }
            if let Some(parent2) = parent2.filter(|p| p.usage() != second) {
                return Err(unexpected(parent2));
            }
        }
    }

    Ok(())
}

/// Verifies `cert` under the default [`Policy`].
///
/// See [`verify_sev_cert_with`].
pub fn verify_sev_cert(
    provider: &impl Provider,
    cert: &Certificate,
    parent1: &Certificate,
    parent2: Option<&Certificate>,
) -> Result<(), Error> {
    verify_sev_cert_with(provider, &Policy::default(), cert, parent1, parent2)
}

/// Verifies `cert` against the parent(s) which signed it.
///
/// Root certificates (ARK and OCA) are passed as their own parent. A PEK
/// takes its OCA as `parent1` and its CEK as `parent2`; every other usage
/// has a single parent. The structural checks on all certificates and
/// parent keys run before any signature is verified, and the first failure
/// is returned.
pub fn verify_sev_cert_with(
    provider: &impl Provider,
    policy: &Policy,
    cert: &Certificate,
    parent1: &Certificate,
    parent2: Option<&Certificate>,
) -> Result<(), Error> {
    let parents: Vec<&Certificate> = std::iter::once(parent1).chain(parent2).collect();

    validate_body_with(policy, cert)?;
    for parent in &parents {
        validate_body_with(policy, parent)?;
    }

    check_signers(cert, parent1, parent2).map_err(|e| {
        log::debug!("rejecting {} certificate: {e}", cert.usage());
        e
    })?;

    let mut keys = Vec::with_capacity(parents.len());
    for parent in &parents {
        let key = compile::decompile(parent)?;
        validate_public_key_with(policy, parent, &key)?;
        keys.push(key);
    }

    for (parent, key) in parents.iter().zip(&keys) {
        validate_signature(provider, cert, parent, key)?;
    }

    log::debug!("{} certificate verified", cert.usage());
    Ok(())
}

impl Verifiable for (&Certificate, &Certificate) {
    type Output = ();

    fn verify(self) -> Result<(), Error> {
        let (parent, cert) = self;
        verify_sev_cert(&RustCrypto, cert, parent, None)
    }
}

impl Verifiable for (&Certificate, &Certificate, &Certificate) {
    type Output = ();

    fn verify(self) -> Result<(), Error> {
        let (parent1, parent2, cert) = self;
        verify_sev_cert(&RustCrypto, cert, parent1, Some(parent2))
    }
}
