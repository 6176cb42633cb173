// SPDX-License-Identifier: Apache-2.0

//! The `sevcert` crate implements the certificate object of the [AMD Secure
//! Encrypted Virtualization (SEV)][SEV] trust hierarchy.
//!
//! [SEV]: https://www.amd.com/content/dam/amd/en/documents/epyc-technical-docs/programmer-references/55766_SEV-KM_API_Specification.pdf
//!
//! ## Certificates
//!
//! Every SEV platform holds a chain of certificates: the AMD Root Key (ARK)
//! signs the AMD Signing Key (ASK), which signs the Chip Endorsement Key
//! (CEK). The Platform Endorsement Key (PEK) is signed by both the CEK and
//! the Owner Certificate Authority (OCA), and the PEK signs the Platform
//! Diffie-Hellman key (PDH). A guest owner presents its own Diffie-Hellman
//! certificate (GODH) when launching a guest.
//!
//! The [certs] module decodes and encodes these certificates, checks them
//! against the rules of the hierarchy and creates new ones.
//!
//! ## Cryptographic Primitives
//!
//! Key generation, hashing, signing and verification are reached through
//! the [crypto::Provider] trait. [crypto::RustCrypto] implements it with
//! pure-Rust libraries (`rsa`, `p256`, `p384` and `sha2`).
//!
//! ```
//! use sevcert::certs::{create_oca_cert, verify_sev_cert, Certificate};
//! use sevcert::crypto::{Curve, Provider, RustCrypto};
//!
//! let key = RustCrypto.gen_ec_key(Curve::P384)?;
//! let (oca, _private) = create_oca_cert(&RustCrypto, key, 1, 51)?;
//!
//! let bytes = oca.to_bytes()?;
//! let decoded = Certificate::from_bytes(&bytes)?;
//! verify_sev_cert(&RustCrypto, &decoded, &decoded, None)?;
//! # Ok::<(), sevcert::error::Error>(())
//! ```
//!
//! ## Logging
//!
//! Rejections and signing operations are reported through the [`log`]
//! facade. No logger is installed by this crate.

#![deny(clippy::all)]
#![warn(missing_docs)]
#![allow(unknown_lints)]
#![allow(clippy::identity_op)]
#![allow(clippy::unreadable_literal)]

/// SEV certificates interface.
pub mod certs;

/// Cryptographic primitive providers.
pub mod crypto;

/// Error module.
pub mod error;

/// Module for Encoding and Decoding types.
pub mod parser;

mod util;

pub use util::hexdump;
