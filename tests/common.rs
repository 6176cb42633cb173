// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use sevcert::{certs::*, crypto::*, error::Error};

use std::cell::Cell;

/// A provider which counts the operations it performs.
#[derive(Default)]
pub struct CountingProvider {
    pub digests: Cell<usize>,
    pub signs: Cell<usize>,
    pub verifies: Cell<usize>,
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl Provider for CountingProvider {
    fn gen_rsa_key(&self, bits: usize) -> Result<KeyPair, Error> {
        RustCrypto.gen_rsa_key(bits)
    }

    fn gen_ec_key(&self, curve: Curve) -> Result<KeyPair, Error> {
        RustCrypto.gen_ec_key(curve)
    }

    fn digest(&self, bytes: &[u8], hash: HashAlgorithm) -> Digest {
        bump(&self.digests);
        RustCrypto.digest(bytes, hash)
    }

    fn sign(
        &self,
        key: &KeyPair,
        digest: &Digest,
        algo: Algorithm,
    ) -> Result<SignatureBytes, Error> {
        bump(&self.signs);
        RustCrypto.sign(key, digest, algo)
    }

    fn verify(
        &self,
        key: &KeyPair,
        digest: &Digest,
        sig: &SignatureBytes,
        algo: Algorithm,
    ) -> bool {
        bump(&self.verifies);
        RustCrypto.verify(key, digest, sig, algo)
    }

    fn derive(&self, key: &KeyPair, peer: &KeyPair) -> Result<Vec<u8>, Error> {
        RustCrypto.derive(key, peer)
    }
}

pub fn ec_key() -> KeyPair {
    RustCrypto.gen_ec_key(Curve::P384).unwrap()
}

pub fn oca() -> (Certificate, PrivateKey) {
    create_oca_cert(&RustCrypto, ec_key(), 1, 51).unwrap()
}

/// An ECDSA certificate for `usage`, signed by each of `signers` in turn.
pub fn signed(usage: Usage, signers: &[&PrivateKey]) -> (Certificate, PrivateKey) {
    let (mut cert, key) =
        create_cert(ec_key(), usage, Algorithm::EcdsaSha256, Version::new(1, 51)).unwrap();
    for signer in signers {
        signer.sign(&mut cert).unwrap();
    }
    (cert, key)
}

/// A PDH certificate signed by `signer`.
pub fn pdh(signer: &PrivateKey) -> (Certificate, PrivateKey) {
    let key = generate_ecdh_key_pair(&RustCrypto).unwrap();
    let (mut cert, key) =
        create_cert(key, Usage::PDH, Algorithm::EcdhSha256, Version::new(1, 51)).unwrap();
    signer.sign(&mut cert).unwrap();
    (cert, key)
}

pub struct Platform {
    pub chain: Chain,
    pub oca: PrivateKey,
    pub cek: PrivateKey,
    pub pek: PrivateKey,
    pub pdh: PrivateKey,
}

/// A freshly generated PDH, PEK, OCA and CEK chain.
pub fn platform() -> Platform {
    let (oca_cert, oca) = oca();
    let (cek_cert, cek) = signed(Usage::CEK, &[]);
    let (pek_cert, pek) = signed(Usage::PEK, &[&oca, &cek]);
    let (pdh_cert, pdh) = pdh(&pek);

    Platform {
        chain: Chain {
            pdh: pdh_cert,
            pek: pek_cert,
            oca: oca_cert,
            cek: cek_cert,
        },
        oca,
        cek,
        pek,
        pdh,
    }
}

/// Overwrites the little-endian `u32` at `offset`.
pub fn patch_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
