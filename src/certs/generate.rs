// SPDX-License-Identifier: Apache-2.0

//! Creation and signing of certificates.

use super::*;

use crate::crypto::Curve;

/// Generates an ECDH key pair on P-384, the curve SEV firmware uses.
pub fn generate_ecdh_key_pair(provider: &impl Provider) -> Result<KeyPair, Error> {
    provider.gen_ecdh_key(Curve::P384)
}

/// Builds an unsigned version 1 certificate around `key`.
///
/// The key pair is consumed and handed back bound to `usage` and `algo`.
pub fn create_cert(
    key: KeyPair,
    usage: Usage,
    algo: Algorithm,
    firmware: Version,
) -> Result<(Certificate, PrivateKey), Error> {
    let field = compile::compile(&key, usage, algo)?;
    let private = PrivateKey::new(usage, algo, key)?;

    log::debug!("created {usage} {algo} certificate for API {firmware}");
    Ok((Certificate::new(Body::new(1, firmware, field)), private))
}

/// Builds a self-signed OCA certificate.
///
/// The key signs with ECDSA over SHA-256 and the signature is placed in the
/// first slot.
pub fn create_oca_cert(
    provider: &impl Provider,
    key: KeyPair,
    api_major: u8,
    api_minor: u8,
) -> Result<(Certificate, PrivateKey), Error> {
    const ALGO: Algorithm = Algorithm::EcdsaSha256;

    let (mut cert, private) =
        create_cert(key, Usage::OCA, ALGO, Version::new(api_major, api_minor))?;
    cert.sign_with_key(provider, 1, Usage::OCA, ALGO, &private, Usage::OCA, ALGO)?;
    Ok((cert, private))
}

/// Builds a guest owner Diffie-Hellman certificate.
///
/// The certificate is left unsigned; whichever authority vouches for it
/// signs it afterwards.
pub fn create_godh_cert(
    key: KeyPair,
    api_major: u8,
    api_minor: u8,
) -> Result<(Certificate, PrivateKey), Error> {
    create_cert(
        key,
        Usage::GODH,
        Algorithm::EcdhSha256,
        Version::new(api_major, api_minor),
    )
}

impl Certificate {
    /// Signs the certificate with `signer` into the first unused slot.
    ///
    /// `version`, `usage` and `algo` are written to the header before the
    /// signature is made; they may only change while no slot is in use.
    /// `sig_usage` and `sig_algo` must be the role and algorithm `signer` is
    /// bound to. On error the certificate is left untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn sign_with_key(
        &mut self,
        provider: &impl Provider,
        version: u32,
        usage: Usage,
        algo: Algorithm,
        signer: &PrivateKey,
        sig_usage: Usage,
        sig_algo: Algorithm,
    ) -> Result<(), Error> {
        let slot = self.free_slot().ok_or_else(|| {
            log::debug!("{} certificate has no free signature slot", self.usage());
            Error::NoFreeSignatureSlot
        })?;

        if signer.usage() != sig_usage {
            return Err(Error::KeyRole {
                bound: signer.usage(),
                requested: sig_usage,
            });
        }
        if signer.algorithm() != sig_algo {
            return Err(ValidationError::KeyAlgorithmMismatch.into());
        }
        if !sig_algo.is_signing() {
            return Err(Error::UnsupportedAlgorithm(sig_algo));
        }

        let body = self.body().with_header(version, usage, algo)?;
        let signed = self.signatures().iter().any(Option::is_some);
        if signed && body != *self.body() {
            return Err(ValidationError::SignedBodyChanged.into());
        }

        let mut region = Vec::with_capacity(Body::SIZE);
        body.encode(&mut region, ())?;
        let digest = provider.digest(&region, sig_algo.hash());
        log::trace!("signing {usage} certificate {digest:?}");

        let sig = provider.sign(signer.key(), &digest, sig_algo)?;
        let sig = Signature::new(sig_usage, sig_algo, sig)?;

        self.commit(body, slot, sig);
        log::debug!("{sig_usage} signed {usage} certificate into slot {}", slot + 1);
        Ok(())
    }
}

impl Signer<Certificate> for PrivateKey {
    type Output = ();

    fn sign(&self, target: &mut Certificate) -> Result<(), Error> {
        target.sign_with_key(
            &crate::crypto::RustCrypto,
            target.version(),
            target.usage(),
            target.algorithm(),
            self,
            self.usage(),
            self.algorithm(),
        )
    }
}
