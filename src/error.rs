// SPDX-License-Identifier: Apache-2.0

//! Error types for decoding, validating, signing and verifying certificates.

use crate::certs::{Algorithm, Usage};

use std::{
    error,
    fmt::Display,
    io,
};

/// The certificate bytes could not be laid out as a SEV certificate.
#[derive(Debug)]
pub enum DecodeError {
    /// Fewer bytes than the algorithm-implied length were supplied.
    TruncatedBuffer {
        /// Number of bytes required.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },

    /// More bytes than the algorithm-implied length were supplied.
    OversizedBuffer {
        /// Number of bytes required.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },

    /// The public key algorithm is outside of the enumerated set.
    UnknownAlgorithm(u32),

    /// A signature slot names an algorithm outside of the enumerated set.
    InvalidSignatureAlgorithm(u32),

    /// Bytes which must be zero were not.
    NonZeroReserved,

    /// The underlying reader failed.
    Io(io::Error),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::TruncatedBuffer { expected, actual } => write!(
                f,
                "Truncated certificate: expected {expected} bytes, got {actual}"
            ),
            DecodeError::OversizedBuffer { expected, actual } => write!(
                f,
                "Oversized certificate: expected {expected} bytes, got {actual}"
            ),
            DecodeError::UnknownAlgorithm(algo) => {
                write!(f, "Unknown public key algorithm: {algo:#x}")
            }
            DecodeError::InvalidSignatureAlgorithm(algo) => {
                write!(f, "Signature slot algorithm {algo:#x} is unknown")
            }
            DecodeError::NonZeroReserved => write!(f, "Reserved bytes were expected to be zeroed"),
            DecodeError::Io(e) => write!(f, "I/O error while decoding certificate: {e}"),
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    #[inline]
    fn from(error: io::Error) -> DecodeError {
        match error.kind() {
            io::ErrorKind::InvalidData => DecodeError::NonZeroReserved,
            _ => DecodeError::Io(error),
        }
    }
}

/// A structural or usage rule of the SEV certificate hierarchy was broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The public key usage is not one of the enumerated roles.
    InvalidUsage(u32),

    /// The certificate version is not supported.
    UnsupportedVersion(u32),

    /// The RSA modulus size is not supported or does not match the key.
    InvalidKeySize(u32),

    /// The elliptic curve is not supported or does not match the key.
    UnsupportedCurve(u32),

    /// The RSA public exponent is not accepted.
    RejectedExponent,

    /// The key does not match the kind required by the algorithm.
    KeyAlgorithmMismatch,

    /// A parent certificate does not hold the role required to sign.
    UnexpectedSigner {
        /// The usage of the certificate being verified.
        usage: Usage,
        /// The usage of the offending parent.
        signer: Usage,
    },

    /// The number of parents does not match the signing rule of the usage.
    ParentCount {
        /// The usage of the certificate being verified.
        usage: Usage,
        /// Number of parents required.
        expected: usize,
        /// Number of parents supplied.
        actual: usize,
    },

    /// A root-of-trust certificate was checked against a different parent.
    NotSelfSigned(Usage),

    /// The header of an already signed certificate would change.
    SignedBodyChanged,

    /// A chain entry does not hold the usage of its position.
    WrongPosition {
        /// The usage the position requires.
        expected: Usage,
        /// The usage found at that position.
        found: Usage,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidUsage(u) => write!(f, "Invalid public key usage: {u:#x}"),
            ValidationError::UnsupportedVersion(v) => {
                write!(f, "Unsupported certificate version: {v}")
            }
            ValidationError::InvalidKeySize(s) => write!(f, "Invalid RSA modulus size: {s}"),
            ValidationError::UnsupportedCurve(c) => write!(f, "Unsupported curve: {c:#x}"),
            ValidationError::RejectedExponent => write!(f, "RSA public exponent is not accepted"),
            ValidationError::KeyAlgorithmMismatch => {
                write!(f, "Key does not match the declared algorithm")
            }
            ValidationError::UnexpectedSigner { usage, signer } => {
                write!(f, "A {signer} certificate may not sign a {usage} certificate")
            }
            ValidationError::ParentCount {
                usage,
                expected,
                actual,
            } => write!(
                f,
                "A {usage} certificate requires {expected} parent(s), {actual} supplied"
            ),
            ValidationError::NotSelfSigned(usage) => {
                write!(f, "A {usage} certificate must be self-signed")
            }
            ValidationError::SignedBodyChanged => {
                write!(f, "The body of a signed certificate may not change")
            }
            ValidationError::WrongPosition { expected, found } => {
                write!(f, "Expected a {expected} certificate, found {found}")
            }
        }
    }
}

impl error::Error for ValidationError {}

/// Errors which may be encountered while handling SEV certificates.
#[derive(Debug)]
pub enum Error {
    /// The certificate bytes are malformed.
    Decode(DecodeError),

    /// A structural or usage rule was broken.
    Validation(ValidationError),

    /// The signature made by the named signer did not verify.
    SignatureInvalid {
        /// Usage of the parent whose signature failed.
        signer: Usage,
    },

    /// Both signature slots are already populated.
    NoFreeSignatureSlot,

    /// The algorithm cannot be used for the requested operation.
    UnsupportedAlgorithm(Algorithm),

    /// The key material in a certificate cannot form a key.
    InvalidKeyMaterial(&'static str),

    /// The key is not bound to the role it is being used for.
    KeyRole {
        /// The role the key is bound to.
        bound: Usage,
        /// The role requested.
        requested: Usage,
    },

    /// A key could not be parsed or serialized.
    KeyFormat(String),

    /// The primitive provider failed.
    Crypto(String),

    /// Something went wrong when reading or writing a key file.
    Io(io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "Decode Error Encountered: {e}"),
            Error::Validation(e) => write!(f, "Validation Error Encountered: {e}"),
            Error::SignatureInvalid { signer } => {
                write!(f, "The {signer} signature could not be verified")
            }
            Error::NoFreeSignatureSlot => write!(f, "Both signature slots are already in use"),
            Error::UnsupportedAlgorithm(algo) => write!(f, "Unsupported algorithm: {algo}"),
            Error::InvalidKeyMaterial(why) => write!(f, "Invalid key material: {why}"),
            Error::KeyRole { bound, requested } => write!(
                f,
                "Key bound to the {bound} role cannot be used as {requested}"
            ),
            Error::KeyFormat(why) => write!(f, "Key format error: {why}"),
            Error::Crypto(why) => write!(f, "Cryptographic provider error: {why}"),
            Error::Io(e) => write!(f, "I/O Error: {e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for Error {
    #[inline]
    fn from(error: DecodeError) -> Error {
        Error::Decode(error)
    }
}

impl From<ValidationError> for Error {
    #[inline]
    fn from(error: ValidationError) -> Error {
        Error::Validation(error)
    }
}

impl From<io::Error> for Error {
    #[inline]
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}

impl From<Error> for io::Error {
    #[inline]
    fn from(error: Error) -> io::Error {
        match error {
            Error::Io(e) => e,
            Error::Decode(DecodeError::Io(e)) => e,
            e => io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
        }
    }
}
