// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use crate::family::AddressFamily;
use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct Prefix4 {
    pub value: Ipv4Addr,
    pub length: u8,
}

impl Prefix4 {
    const HOST_MASK: u8 = 32;

    pub fn netmask(&self) -> u32 {
        match self.length {
            0 => 0,
            l if l >= Self::HOST_MASK => !0u32,
            l => (!0u32) << (Self::HOST_MASK - l),
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.value.to_bits() & self.netmask())
    }

    pub fn host_bits_are_unset(&self) -> bool {
        self.value.to_bits() & self.netmask() == self.value.to_bits()
    }
}

impl fmt::Display for Prefix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.length)
    }
}

/// Parses `<addr>/<length>` keeping host bits as given.
impl FromStr for Prefix4 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, length) = split_prefix(s, Self::HOST_MASK)?;
        match value {
            IpAddr::V4(value) => Ok(Self { value, length }),
            IpAddr::V6(_) => Err(Error::FamilyMismatch {
                family: AddressFamily::Ipv4Unicast,
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct Prefix6 {
    pub value: Ipv6Addr,
    pub length: u8,
}

impl Prefix6 {
    const HOST_MASK: u8 = 128;

    pub fn netmask(&self) -> u128 {
        match self.length {
            0 => 0,
            l if l >= Self::HOST_MASK => !0u128,
            l => (!0u128) << (Self::HOST_MASK - l),
        }
    }

    pub fn network(&self) -> Ipv6Addr {
        Ipv6Addr::from_bits(self.value.to_bits() & self.netmask())
    }

    pub fn host_bits_are_unset(&self) -> bool {
        self.value.to_bits() & self.netmask() == self.value.to_bits()
    }
}

impl fmt::Display for Prefix6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.length)
    }
}

/// Parses `<addr>/<length>` keeping host bits as given.
impl FromStr for Prefix6 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, length) = split_prefix(s, Self::HOST_MASK)?;
        match value {
            IpAddr::V6(value) => Ok(Self { value, length }),
            IpAddr::V4(_) => Err(Error::FamilyMismatch {
                family: AddressFamily::Ipv6Unicast,
                value: s.to_owned(),
            }),
        }
    }
}

fn split_prefix(s: &str, max_len: u8) -> Result<(IpAddr, u8), Error> {
    let (value, length) = s
        .split_once('/')
        .ok_or_else(|| Error::InvalidPrefix(s.to_owned()))?;
    let value: IpAddr = value
        .parse()
        .map_err(|_| Error::InvalidAddress(value.to_owned()))?;
    let length: u8 = length
        .parse()
        .map_err(|_| Error::InvalidPrefix(s.to_owned()))?;
    if length > max_len {
        return Err(Error::InvalidPrefix(s.to_owned()));
    }
    Ok((value, length))
}

/// A network prefix in one of the supported address families.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum Prefix {
    V4(Prefix4),
    V6(Prefix6),
}

impl Prefix {
    /// Build a prefix from an address and length, keeping host bits.
    pub fn from_parts(addr: IpAddr, length: u8) -> Result<Self, Error> {
        match addr {
            IpAddr::V4(value) if length <= Prefix4::HOST_MASK => {
                Ok(Self::V4(Prefix4 { value, length }))
            }
            IpAddr::V6(value) if length <= Prefix6::HOST_MASK => {
                Ok(Self::V6(Prefix6 { value, length }))
            }
            _ => Err(Error::InvalidPrefix(format!("{addr}/{length}"))),
        }
    }

    /// Parse `s` as a prefix of `family`. Host bits are kept as given.
    pub fn parse(family: AddressFamily, s: &str) -> Result<Self, Error> {
        match family {
            AddressFamily::Ipv4Unicast => Ok(Self::V4(s.parse()?)),
            AddressFamily::Ipv6Unicast => Ok(Self::V6(s.parse()?)),
        }
    }

    /// Parse `s` as a network of `family`: in addition to [`Prefix::parse`]
    /// no host bits may be set past the prefix length.
    pub fn parse_strict(family: AddressFamily, s: &str) -> Result<Self, Error> {
        let p = Self::parse(family, s)?;
        if !p.host_bits_are_unset() {
            return Err(Error::InvalidPrefix(s.to_owned()));
        }
        Ok(p)
    }

    pub fn family(&self) -> AddressFamily {
        match self {
            Self::V4(_) => AddressFamily::Ipv4Unicast,
            Self::V6(_) => AddressFamily::Ipv6Unicast,
        }
    }

    pub fn addr(&self) -> IpAddr {
        match self {
            Self::V4(p) => p.value.into(),
            Self::V6(p) => p.value.into(),
        }
    }

    pub fn length(&self) -> u8 {
        match self {
            Self::V4(p) => p.length,
            Self::V6(p) => p.length,
        }
    }

    pub fn host_bits_are_unset(&self) -> bool {
        match self {
            Self::V4(p) => p.host_bits_are_unset(),
            Self::V6(p) => p.host_bits_are_unset(),
        }
    }

    /// Key the RIB is displayed in: family, then network address as an
    /// unsigned integer, then netmask as an unsigned integer.
    pub fn sort_key(&self) -> (u8, u128, u128) {
        match self {
            Self::V4(p) => (
                0,
                u128::from(p.network().to_bits()),
                u128::from(p.netmask()),
            ),
            Self::V6(p) => (1, p.network().to_bits(), p.netmask()),
        }
    }
}

impl PartialOrd for Prefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Prefixes equal under the sort key differ only in host bits; the raw
// address breaks that tie so the order agrees with Eq.
impl Ord for Prefix {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.addr().cmp(&other.addr()))
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(p) => p.fmt(f),
            Self::V6(p) => p.fmt(f),
        }
    }
}

impl From<Prefix4> for Prefix {
    fn from(value: Prefix4) -> Self {
        Self::V4(value)
    }
}

impl From<Prefix6> for Prefix {
    fn from(value: Prefix6) -> Self {
        Self::V6(value)
    }
}

/// Parses either family, IPv4 first.
impl FromStr for Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, length) = s
            .split_once('/')
            .ok_or_else(|| Error::InvalidPrefix(s.to_owned()))?;
        let value: IpAddr = value
            .parse()
            .map_err(|_| Error::InvalidAddress(value.to_owned()))?;
        let length: u8 = length
            .parse()
            .map_err(|_| Error::InvalidPrefix(s.to_owned()))?;
        Self::from_parts(value, length)
    }
}
