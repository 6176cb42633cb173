// SPDX-License-Identifier: Apache-2.0

//! All certificate structures are read and written little-endian through
//! these traits; the type parameter carries any context a structure needs.

mod encoder;

mod decoder;

pub use decoder::Decoder;

pub use encoder::Encoder;
