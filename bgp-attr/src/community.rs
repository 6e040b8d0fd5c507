// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    sequence::separated_pair,
    IResult,
};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::str::FromStr;

/// Communities with a registered meaning.
///
/// Ref: IANA BGP Well-known Communities
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u32)]
pub enum WellKnownCommunity {
    Internet = 0x0000_0000,

    /// RFC 8326
    PlannedShut = 0xFFFF_0000,

    /// RFC 7611
    AcceptOwn = 0xFFFF_0001,

    /// RFC 7999
    RouteFilterTranslatedV4 = 0xFFFF_0002,
    RouteFilterV4 = 0xFFFF_0003,
    RouteFilterTranslatedV6 = 0xFFFF_0004,
    RouteFilterV6 = 0xFFFF_0005,

    /// RFC 9494
    LlgrStale = 0xFFFF_0006,
    NoLlgr = 0xFFFF_0007,

    /// RFC 7999
    Blackhole = 0xFFFF_029A,

    /// RFC 1997
    NoExport = 0xFFFF_FF01,
    NoAdvertise = 0xFFFF_FF02,
    NoExportSubconfed = 0xFFFF_FF03,

    /// RFC 3765
    NoPeer = 0xFFFF_FF04,
}

impl WellKnownCommunity {
    pub const ALL: [WellKnownCommunity; 14] = [
        Self::Internet,
        Self::PlannedShut,
        Self::AcceptOwn,
        Self::RouteFilterTranslatedV4,
        Self::RouteFilterV4,
        Self::RouteFilterTranslatedV6,
        Self::RouteFilterV6,
        Self::LlgrStale,
        Self::NoLlgr,
        Self::Blackhole,
        Self::NoExport,
        Self::NoAdvertise,
        Self::NoExportSubconfed,
        Self::NoPeer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Internet => "internet",
            Self::PlannedShut => "planned-shut",
            Self::AcceptOwn => "accept-own",
            Self::RouteFilterTranslatedV4 => "route-filter-translated-v4",
            Self::RouteFilterV4 => "route-filter-v4",
            Self::RouteFilterTranslatedV6 => "route-filter-translated-v6",
            Self::RouteFilterV6 => "route-filter-v6",
            Self::LlgrStale => "llgr-stale",
            Self::NoLlgr => "no-llgr",
            Self::Blackhole => "blackhole",
            Self::NoExport => "no-export",
            Self::NoAdvertise => "no-advertise",
            Self::NoExportSubconfed => "no-export-subconfed",
            Self::NoPeer => "no-peer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// A single 32-bit community value, conventionally `<asn>:<value>`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Community(pub u32);

impl Community {
    pub fn new(high: u16, low: u16) -> Self {
        Self(u32::from(high) << 16 | u32::from(low))
    }

    pub fn high(self) -> u16 {
        ((self.0 >> 16) & 0xffff) as u16
    }

    pub fn low(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    /// `<high>:<low>`, regardless of any registered name.
    pub fn colon_notation(self) -> String {
        format!("{}:{}", self.high(), self.low())
    }

    pub fn well_known(self) -> Option<WellKnownCommunity> {
        WellKnownCommunity::try_from(self.0).ok()
    }

    /// Parse a list of community tokens. Each token may itself hold several
    /// comma separated communities.
    pub fn parse_list<S: AsRef<str>>(
        tokens: &[S],
    ) -> Result<Vec<Community>, Error> {
        let mut result = Vec::new();
        for token in tokens {
            for s in token.as_ref().split(',') {
                result.push(s.parse()?);
            }
        }
        Ok(result)
    }
}

impl From<WellKnownCommunity> for Community {
    fn from(c: WellKnownCommunity) -> Self {
        Self(c.into())
    }
}

/// Registered names take precedence over the `<high>:<low>` form.
impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.well_known() {
            Some(c) => f.write_str(c.name()),
            None => f.write_str(&self.colon_notation()),
        }
    }
}

fn community_pair(input: &str) -> IResult<&str, (u16, u16)> {
    separated_pair(
        map_res(digit1, str::parse::<u16>),
        char(':'),
        map_res(digit1, str::parse::<u16>),
    )(input)
}

impl FromStr for Community {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(c) = WellKnownCommunity::from_name(s) {
            return Ok(c.into());
        }
        let (_, (high, low)) = all_consuming(community_pair)(s)
            .map_err(|_| Error::InvalidCommunity(s.to_owned()))?;
        Ok(Self::new(high, low))
    }
}
