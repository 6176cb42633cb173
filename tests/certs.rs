// SPDX-License-Identifier: Apache-2.0

mod common;

use common::*;

use sevcert::{
    certs::{compile::decompile, validate::*, *},
    crypto::{Curve, Provider, RustCrypto},
    error::{DecodeError, Error, ValidationError},
    parser::Decoder,
};

#[test]
fn round_trip_every_algorithm() {
    let (_, oca_key) = oca();
    let algos = [
        Algorithm::RsaSha256,
        Algorithm::EcdsaSha256,
        Algorithm::EcdhSha256,
        Algorithm::RsaSha384,
        Algorithm::EcdsaSha384,
        Algorithm::EcdhSha384,
    ];

    for algo in algos {
        let firmware = Version::new(1, 51);
        let cert = match algo.kind() {
            KeyKind::Rsa => {
                let key = RustCrypto.gen_rsa_key(2048).unwrap();
                let (mut cert, key) = create_cert(key, Usage::ARK, algo, firmware).unwrap();
                key.sign(&mut cert).unwrap();
                cert
            }
            KeyKind::Ecdsa => {
                let (mut cert, key) = create_cert(ec_key(), Usage::OCA, algo, firmware).unwrap();
                key.sign(&mut cert).unwrap();
                cert
            }
            KeyKind::Ecdh => {
                let key = generate_ecdh_key_pair(&RustCrypto).unwrap();
                let (mut cert, _) = create_cert(key, Usage::PDH, algo, firmware).unwrap();
                oca_key.sign(&mut cert).unwrap();
                cert
            }
        };

        let bytes = cert.to_bytes().unwrap();
        assert_eq!(bytes.len(), algo.cert_len(), "{algo}");

        let decoded = Certificate::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.algorithm(), algo);
        assert_eq!(decoded, cert, "{algo}");
        assert_eq!(decoded.to_bytes().unwrap(), bytes, "{algo}");
    }
}

#[test]
fn round_trip_p256() {
    let key = RustCrypto.gen_ec_key(Curve::P256).unwrap();
    let (mut cert, private) =
        create_cert(key, Usage::CEK, Algorithm::EcdsaSha384, Version::new(0, 24)).unwrap();
    let (ask, ask_key) = signed(Usage::ASK, &[]);
    ask_key.sign(&mut cert).unwrap();

    let bytes = cert.to_bytes().unwrap();
    let decoded = Certificate::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, cert);
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
    assert_eq!(decompile(&decoded).unwrap().public(), private.key().public());

    verify_sev_cert(&RustCrypto, &decoded, &ask, None).unwrap();
}

#[test]
fn rsa_root_and_child() {
    let key = RustCrypto.gen_rsa_key(2048).unwrap();
    let (mut ark, ark_key) =
        create_cert(key, Usage::ARK, Algorithm::RsaSha256, Version::default()).unwrap();
    ark_key.sign(&mut ark).unwrap();

    let bytes = ark.to_bytes().unwrap();
    assert_eq!(bytes.len(), 0x824);
    let ark = Certificate::from_bytes(&bytes).unwrap();
    assert_eq!(ark.to_bytes().unwrap(), bytes);
    verify_sev_cert(&RustCrypto, &ark, &ark, None).unwrap();

    let (mut ask, _) =
        create_cert(ec_key(), Usage::ASK, Algorithm::EcdsaSha384, Version::default()).unwrap();
    ark_key.sign(&mut ask).unwrap();
    let ask = Certificate::from_bytes(&ask.to_bytes().unwrap()).unwrap();
    verify_sev_cert(&RustCrypto, &ask, &ark, None).unwrap();
    (&ark, &ask).verify().unwrap();
}

#[test]
fn tamper_sensitivity() {
    let key = RustCrypto.gen_ec_key(Curve::P256).unwrap();
    let (oca, _) = create_oca_cert(&RustCrypto, key, 1, 51).unwrap();
    let key = decompile(&oca).unwrap();
    validate_signature(&RustCrypto, &oca, &oca, &key).unwrap();

    let bytes = oca.to_bytes().unwrap();
    let mut checked = 0;
    for offset in 0..Body::SIZE {
        for bit in 0..8 {
            let mut tampered = bytes.clone();
            tampered[offset] ^= 1 << bit;

            let cert = match Certificate::from_bytes(&tampered) {
                Ok(cert) => cert,
                Err(_) => continue,
            };

            checked += 1;
            assert!(
                validate_signature(&RustCrypto, &cert, &oca, &key).is_err(),
                "flipping bit {bit} of byte {offset:#x} went unnoticed"
            );
        }
    }

    assert!(checked > 8000);
}

#[test]
fn usage_gating() {
    let (oca, oca_key) = oca();
    let (pdh, _) = pdh(&oca_key);

    let mut bytes = pdh.to_bytes().unwrap();
    patch_u32(&mut bytes, 0x8, 0x1234);
    let cert = Certificate::from_bytes(&bytes).unwrap();
    assert_eq!(cert.usage(), Usage::from(0x1234));

    assert_eq!(
        validate_body(&cert),
        Err(ValidationError::InvalidUsage(0x1234))
    );

    let provider = CountingProvider::default();
    let res = verify_sev_cert(&provider, &cert, &oca, None);
    assert!(matches!(
        res,
        Err(Error::Validation(ValidationError::InvalidUsage(0x1234)))
    ));
    assert_eq!(provider.verifies.get(), 0);
    assert_eq!(provider.digests.get(), 0);

    verify_sev_cert(&provider, &pdh, &oca, None).unwrap();
    assert_eq!(provider.verifies.get(), 1);
}

#[test]
fn truncated_by_one_byte() {
    let (oca, _) = oca();
    let bytes = oca.to_bytes().unwrap();

    let res = Certificate::from_bytes(&bytes[..bytes.len() - 1]);
    assert!(matches!(
        res,
        Err(DecodeError::TruncatedBuffer {
            expected: 0x824,
            actual: 0x823
        })
    ));

    let mut reader = &bytes[..bytes.len() - 1];
    assert!(matches!(
        Certificate::decode(&mut reader, ()),
        Err(DecodeError::TruncatedBuffer {
            expected: 0x824,
            actual: 0x823
        })
    ));
}

#[test]
fn unknown_algorithm_is_a_decode_error() {
    let (oca, _) = oca();
    let mut bytes = oca.to_bytes().unwrap();
    patch_u32(&mut bytes, 0xC, 0x104);

    assert!(matches!(
        Certificate::from_bytes(&bytes),
        Err(DecodeError::UnknownAlgorithm(0x104))
    ));
}

#[test]
fn signature_slot_algorithm() {
    let (oca, _) = oca();
    let mut bytes = oca.to_bytes().unwrap();
    patch_u32(&mut bytes, 0x414 + 4, 0x7);

    assert!(matches!(
        Certificate::from_bytes(&bytes),
        Err(DecodeError::InvalidSignatureAlgorithm(0x7))
    ));
}

#[test]
fn signature_in_wrong_slot_is_found_by_usage() {
    let (oca, _) = oca();
    let bytes = oca.to_bytes().unwrap();

    let mut swapped = bytes[..0x414].to_vec();
    swapped.extend_from_slice(&bytes[0x61C..]);
    swapped.extend_from_slice(&bytes[0x414..0x61C]);
    let moved = Certificate::from_bytes(&swapped).unwrap();

    assert!(moved.signatures()[0].is_none());
    verify_sev_cert(&RustCrypto, &moved, &oca, None).unwrap();
}

#[test]
fn policy_is_applied() {
    let (oca, oca_key) = oca();
    let (pdh, _) = pdh(&oca_key);

    let policy = Policy {
        curves: vec![Curve::P256],
        ..Default::default()
    };
    assert!(matches!(
        verify_sev_cert_with(&RustCrypto, &policy, &pdh, &oca, None),
        Err(Error::Validation(ValidationError::UnsupportedCurve(2)))
    ));
    verify_sev_cert_with(&RustCrypto, &Policy::default(), &pdh, &oca, None).unwrap();
}

#[test]
fn serde_round_trip() {
    let (oca, _) = oca();

    let encoded = bincode::serialize(&oca).unwrap();
    let decoded: Certificate = bincode::deserialize(&encoded).unwrap();
    assert_eq!(decoded, oca);

    let mut short = oca.to_bytes().unwrap();
    short.pop();
    let encoded = bincode::serialize(&serde_bytes::ByteBuf::from(short)).unwrap();
    assert!(bincode::deserialize::<Certificate>(&encoded).is_err());
}

#[test]
fn rendering() {
    let (oca, _) = oca();

    let text = oca.to_string();
    assert!(text.starts_with("Certificate v1 (API 1.51): OCA ECDSA SHA256"));
    assert!(text.contains("Signature 1: OCA ECDSA SHA256"));
    assert!(text.contains("Signature 2: unused"));

    let dump = oca.hexdump().unwrap();
    assert_eq!(dump.lines().filter(|l| !l.is_empty()).count(), 0x824 / 16 + 1);
    assert!(dump.starts_with("\n01 00 00 00 01 33 00 00 01 10 00 00 02 00 00 00"));
}
