// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address family identifiers.
///
/// Ref: IANA Address Family Numbers
pub mod afi {
    pub const IP: u32 = 1;
    pub const IP6: u32 = 2;
}

/// Subsequent address family identifiers.
///
/// Ref: RFC 4760 §6
pub mod safi {
    pub const UNICAST: u32 = 1;
}

/// The address families a RIB can be queried or modified in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum AddressFamily {
    #[default]
    Ipv4Unicast,
    Ipv6Unicast,
}

impl AddressFamily {
    pub fn to_wire(self) -> Family {
        match self {
            Self::Ipv4Unicast => Family {
                afi: afi::IP,
                safi: safi::UNICAST,
            },
            Self::Ipv6Unicast => Family {
                afi: afi::IP6,
                safi: safi::UNICAST,
            },
        }
    }

    pub fn from_wire(f: Family) -> Result<Self, Error> {
        match (f.afi, f.safi) {
            (afi::IP, safi::UNICAST) => Ok(Self::Ipv4Unicast),
            (afi::IP6, safi::UNICAST) => Ok(Self::Ipv6Unicast),
            (afi, safi) => Err(Error::UnknownFamily { afi, safi }),
        }
    }

    /// Width of an address in this family, in bits.
    pub fn address_bits(self) -> u8 {
        match self {
            Self::Ipv4Unicast => 32,
            Self::Ipv6Unicast => 128,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ipv4Unicast => "ipv4-unicast",
            Self::Ipv6Unicast => "ipv6-unicast",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-the-wire family identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub afi: u32,
    pub safi: u32,
}
