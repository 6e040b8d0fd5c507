// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::codec::Envelope;
use crate::community::Community;
use crate::error::Error;
use crate::family::{AddressFamily, Family};
use crate::prefix::Prefix;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy, TryFromPrimitive)]
#[repr(u8)]
pub enum PathOrigin {
    Igp = 0,
    Egp = 1,
    Incomplete = 2,
}

impl PathOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Igp => "igp",
            Self::Egp => "egp",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for PathOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathOrigin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "igp" => Ok(Self::Igp),
            "egp" => Ok(Self::Egp),
            "incomplete" => Ok(Self::Incomplete),
            _ => Err(Error::InvalidOrigin(s.to_owned())),
        }
    }
}

/// Multiprotocol reachable NLRI.
///
/// Ref: RFC 4760 §3
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MpReachNlri {
    pub family: AddressFamily,
    pub nlris: Vec<Prefix>,
    pub next_hops: Vec<IpAddr>,
}

/// A path attribute as exchanged with the RIB service.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PathAttribute {
    Origin(PathOrigin),
    NextHop(IpAddr),
    MultiExitDisc(u32),
    LocalPref(u32),
    Communities(Vec<Community>),
    MpReachNlri(MpReachNlri),

    /// An attribute kind this client does not know, or one whose payload
    /// could not be decoded. Kept verbatim.
    Unknown(Envelope),
}

/// The attribute kinds the registry knows how to decode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AttributeKind {
    Origin,
    NextHop,
    MultiExitDisc,
    LocalPref,
    Communities,
    MpReachNlri,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 6] = [
        Self::Origin,
        Self::NextHop,
        Self::MultiExitDisc,
        Self::LocalPref,
        Self::Communities,
        Self::MpReachNlri,
    ];

    /// The type name carried in an envelope's type URL.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Origin => "OriginAttribute",
            Self::NextHop => "NextHopAttribute",
            Self::MultiExitDisc => "MultiExitDiscAttribute",
            Self::LocalPref => "LocalPrefAttribute",
            Self::Communities => "CommunitiesAttribute",
            Self::MpReachNlri => "MpReachNLRIAttribute",
        }
    }
}

impl PathAttribute {
    /// `None` for [`PathAttribute::Unknown`].
    pub fn kind(&self) -> Option<AttributeKind> {
        match self {
            Self::Origin(_) => Some(AttributeKind::Origin),
            Self::NextHop(_) => Some(AttributeKind::NextHop),
            Self::MultiExitDisc(_) => Some(AttributeKind::MultiExitDisc),
            Self::LocalPref(_) => Some(AttributeKind::LocalPref),
            Self::Communities(_) => Some(AttributeKind::Communities),
            Self::MpReachNlri(_) => Some(AttributeKind::MpReachNlri),
            Self::Unknown(_) => None,
        }
    }

    /// Display fields of this attribute in a fixed order.
    pub fn fields(&self) -> Vec<(&str, String)> {
        match self {
            Self::Origin(o) => vec![("origin", o.to_string())],
            Self::NextHop(addr) => vec![("next_hop", natural(addr))],
            Self::MultiExitDisc(med) => vec![("med", natural(med))],
            Self::LocalPref(pref) => vec![("local_pref", natural(pref))],
            Self::Communities(cs) => vec![("communities", join(cs))],
            Self::MpReachNlri(mp) => vec![
                ("family", natural(mp.family)),
                ("next_hops", join(&mp.next_hops)),
                ("nlris", join(&mp.nlris)),
            ],
            Self::Unknown(env) => {
                let raw = pretty_hex::simple_hex(&env.value);
                vec![(env.type_name(), natural(raw))]
            }
        }
    }
}

fn natural<T: fmt::Display>(v: T) -> String {
    v.to_string().trim().replace('\n', ", ")
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(natural).collect::<Vec<_>>().join(", ")
}

// Payload records for each attribute kind. These are what travels inside an
// envelope's value.

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OriginAttribute {
    pub origin: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NextHopAttribute {
    pub next_hop: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MultiExitDiscAttribute {
    pub med: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LocalPrefAttribute {
    pub local_pref: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CommunitiesAttribute {
    pub communities: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MpReachNlriAttribute {
    pub family: Family,
    pub nlris: Vec<Envelope>,
    pub next_hops: Vec<String>,
}
