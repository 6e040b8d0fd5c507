// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::attr::{AttributeKind, PathAttribute};
use crate::codec::{self, Envelope};
use crate::error::Error;
use crate::family::{AddressFamily, Family};
use crate::nlri;
use crate::prefix::Prefix;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A path as it travels to and from the RIB service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMessage {
    pub nlri: Envelope,
    pub pattrs: Vec<Envelope>,
    pub family: Family,
    #[serde(default)]
    pub source_asn: u32,
    #[serde(default)]
    pub best: bool,
    #[serde(default)]
    pub neighbor_ip: Option<IpAddr>,
}

/// A destination as streamed by the RIB service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationMessage {
    pub prefix: String,
    pub paths: Vec<PathMessage>,
}

/// One advertised or received route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nlri: Prefix,
    pub attributes: Vec<PathAttribute>,
    pub family: AddressFamily,

    /// Origin AS of the path; only meaningful in the global table.
    pub source_asn: u32,

    /// Whether the server selected this path as best.
    pub best: bool,

    /// Peer the path was learned from, if any.
    pub neighbor_ip: Option<IpAddr>,
}

impl Path {
    pub fn new(
        nlri: Prefix,
        family: AddressFamily,
        attributes: Vec<PathAttribute>,
    ) -> Self {
        Self {
            nlri,
            attributes,
            family,
            source_asn: 0,
            best: false,
            neighbor_ip: None,
        }
    }

    pub fn with_source_asn(self, source_asn: u32) -> Self {
        Self { source_asn, ..self }
    }

    /// First attribute of the given kind.
    pub fn attribute(&self, kind: AttributeKind) -> Option<&PathAttribute> {
        self.attributes.iter().find(|a| a.kind() == Some(kind))
    }

    pub fn to_message(&self) -> Result<PathMessage, Error> {
        Ok(PathMessage {
            nlri: nlri::encode_nlri(&self.nlri)?,
            pattrs: self
                .attributes
                .iter()
                .map(codec::encode)
                .collect::<Result<Vec<_>, _>>()?,
            family: self.family.to_wire(),
            source_asn: self.source_asn,
            best: self.best,
            neighbor_ip: self.neighbor_ip,
        })
    }

    /// Decode a path. Any attribute that fails to decode fails the whole
    /// path.
    pub fn from_message(msg: &PathMessage) -> Result<Path, Error> {
        let (nlri, family) = Self::decode_head(msg)?;
        let attributes = msg
            .pattrs
            .iter()
            .map(codec::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::assemble(msg, nlri, family, attributes))
    }

    /// Decode a path for display. Attributes that fail to decode are kept
    /// as [`PathAttribute::Unknown`] and the failures are handed back.
    pub fn from_message_lossy(
        msg: &PathMessage,
    ) -> Result<(Path, Vec<Error>), Error> {
        let (nlri, family) = Self::decode_head(msg)?;
        let mut errors = Vec::new();
        let mut attributes = Vec::with_capacity(msg.pattrs.len());
        for env in &msg.pattrs {
            let (attr, err) = codec::decode_lossy(env);
            attributes.push(attr);
            errors.extend(err);
        }
        Ok((Self::assemble(msg, nlri, family, attributes), errors))
    }

    fn decode_head(
        msg: &PathMessage,
    ) -> Result<(Prefix, AddressFamily), Error> {
        let family = AddressFamily::from_wire(msg.family)?;
        let nlri = nlri::decode_nlri(&msg.nlri)?;
        if nlri.family() != family {
            return Err(Error::FamilyMismatch {
                family,
                value: nlri.to_string(),
            });
        }
        Ok((nlri, family))
    }

    fn assemble(
        msg: &PathMessage,
        nlri: Prefix,
        family: AddressFamily,
        attributes: Vec<PathAttribute>,
    ) -> Path {
        Path {
            nlri,
            attributes,
            family,
            source_asn: msg.source_asn,
            best: msg.best,
            neighbor_ip: msg.neighbor_ip,
        }
    }
}

/// A prefix and every path the RIB holds for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub prefix: Prefix,
    pub paths: Vec<Path>,
}

impl Destination {
    /// Decode a streamed destination of `family` for display. Attribute
    /// decode failures are returned alongside rather than failing the
    /// destination.
    pub fn from_message_lossy(
        msg: &DestinationMessage,
        family: AddressFamily,
    ) -> Result<(Destination, Vec<Error>), Error> {
        let prefix = Prefix::parse(family, &msg.prefix)?;
        let mut errors = Vec::new();
        let mut paths = Vec::with_capacity(msg.paths.len());
        for p in &msg.paths {
            let (path, errs) = Path::from_message_lossy(p)?;
            paths.push(path);
            errors.extend(errs);
        }
        Ok((Destination { prefix, paths }, errors))
    }

    pub fn to_message(&self) -> Result<DestinationMessage, Error> {
        Ok(DestinationMessage {
            prefix: self.prefix.to_string(),
            paths: self
                .paths
                .iter()
                .map(Path::to_message)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}
