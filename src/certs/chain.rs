// SPDX-License-Identifier: Apache-2.0

//! For operating on the SEV platform certificate chain.

use super::*;

use serde::{Deserialize, Serialize};

/// The SEV certificate chain, in the order the platform exports it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chain {
    /// The Platform Diffie-Hellman certificate.
    pub pdh: Certificate,

    /// The certificate for the PEK.
    pub pek: Certificate,

    /// The certificate for the OCA.
    pub oca: Certificate,

    /// The certificate for the CEK.
    pub cek: Certificate,
}

impl Chain {
    fn sections(&self) -> [(&'static str, &Certificate); 4] {
        [
            ("PDH", &self.pdh),
            ("PEK", &self.pek),
            ("OCA", &self.oca),
            ("CEK", &self.cek),
        ]
    }

    /// Renders each encoded certificate as rows of hex octets, in export order.
    pub fn hexdump(&self) -> std::io::Result<String> {
        let mut out = String::new();
        for (name, cert) in self.sections().iter() {
            out.push_str(&format!("{name}:{}", cert.hexdump()?));
        }
        Ok(out)
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (name, cert) in self.sections().iter() {
            writeln!(f, "{name}")?;
            write!(f, "{cert}")?;
        }
        Ok(())
    }
}

fn expect(cert: Certificate, usage: Usage) -> Result<Certificate, Error> {
    if cert.usage() != usage {
        return Err(ValidationError::WrongPosition {
            expected: usage,
            found: cert.usage(),
        }
        .into());
    }

    Ok(cert)
}

impl Decoder<()> for Chain {
    type Error = Error;

    fn decode(reader: &mut impl Read, _: ()) -> Result<Self, Self::Error> {
        let pdh = expect(Certificate::decode(reader, ())?, Usage::PDH)?;
        let pek = expect(Certificate::decode(reader, ())?, Usage::PEK)?;
        let oca = expect(Certificate::decode(reader, ())?, Usage::OCA)?;
        let cek = expect(Certificate::decode(reader, ())?, Usage::CEK)?;

        Ok(Self { pdh, pek, oca, cek })
    }
}

impl Encoder<()> for Chain {
    type Error = std::io::Error;

    fn encode(&self, writer: &mut impl Write, _: ()) -> Result<(), Self::Error> {
        writer
            .write_bytes(&self.pdh)?
            .write_bytes(&self.pek)?
            .write_bytes(&self.oca)?
            .write_bytes(&self.cek)?;
        Ok(())
    }
}

impl<'a> Verifiable for &'a Chain {
    type Output = &'a Certificate;

    fn verify(self) -> Result<Self::Output, Error> {
        (&self.oca, &self.oca).verify()?;
        (&self.oca, &self.cek, &self.pek).verify()?;
        (&self.pek, &self.pdh).verify()?;
        Ok(&self.pdh)
    }
}
