// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based tests for prefixes, NLRI and communities.

use crate::codec;
use crate::community::{Community, WellKnownCommunity};
use crate::family::AddressFamily;
use crate::nlri::{decode_nlri, encode_nlri};
use crate::prefix::Prefix;
use crate::PathAttribute;
use proptest::prelude::*;
use std::cmp::Ordering;
use std::net::{Ipv4Addr, Ipv6Addr};

// Raw IPv4 address and length pairs, host bits left as generated
fn ipv4_raw_strategy() -> impl Strategy<Value = (Ipv4Addr, u8)> {
    (any::<u32>(), 0u8..=32u8)
        .prop_map(|(bits, length)| (Ipv4Addr::from(bits), length))
}

// Raw IPv6 address and length pairs, host bits left as generated
fn ipv6_raw_strategy() -> impl Strategy<Value = (Ipv6Addr, u8)> {
    (any::<u128>(), 0u8..=128u8)
        .prop_map(|(bits, length)| (Ipv6Addr::from(bits), length))
}

fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        ipv4_raw_strategy().prop_map(|(a, l)| {
            Prefix::from_parts(a.into(), l).expect("valid v4 prefix")
        }),
        ipv6_raw_strategy().prop_map(|(a, l)| {
            Prefix::from_parts(a.into(), l).expect("valid v6 prefix")
        }),
    ]
}

proptest! {
    /// Property: textual IPv4 prefixes survive parse and NLRI encoding
    #[test]
    fn prop_ipv4_nlri_round_trip((addr, length) in ipv4_raw_strategy()) {
        let text = format!("{addr}/{length}");
        let p = Prefix::parse(AddressFamily::Ipv4Unicast, &text).unwrap();
        let back = decode_nlri(&encode_nlri(&p).unwrap()).unwrap();
        prop_assert_eq!(back.addr(), std::net::IpAddr::from(addr));
        prop_assert_eq!(back.length(), length);
    }

    /// Property: textual IPv6 prefixes survive parse and NLRI encoding
    #[test]
    fn prop_ipv6_nlri_round_trip((addr, length) in ipv6_raw_strategy()) {
        let text = format!("{addr}/{length}");
        let p = Prefix::parse(AddressFamily::Ipv6Unicast, &text).unwrap();
        let back = decode_nlri(&encode_nlri(&p).unwrap()).unwrap();
        prop_assert_eq!(back.addr(), std::net::IpAddr::from(addr));
        prop_assert_eq!(back.length(), length);
    }

    /// Property: `high:low` parses to the packed value and prints back
    #[test]
    fn prop_community_colon_round_trip(
        high in any::<u16>(),
        low in any::<u16>(),
    ) {
        let text = format!("{high}:{low}");
        let c: Community = text.parse().unwrap();
        prop_assert_eq!(c.0, (u32::from(high) << 16) | u32::from(low));
        prop_assert_eq!(c.colon_notation(), text.clone());

        // registered values print by name, everything else in colon form
        let shown = c.to_string();
        match c.well_known() {
            Some(wk) => prop_assert_eq!(shown, wk.name()),
            None => prop_assert_eq!(shown, text),
        }
    }

    /// Property: communities survive the attribute codec untouched
    #[test]
    fn prop_communities_codec(
        values in proptest::collection::vec(any::<u32>(), 0..16),
    ) {
        let a = PathAttribute::Communities(
            values.iter().copied().map(Community).collect(),
        );
        let back = codec::decode(&codec::encode(&a).unwrap()).unwrap();
        prop_assert_eq!(back, a);
    }

    /// Property: the RIB order is antisymmetric
    #[test]
    fn prop_order_antisymmetric(
        a in prefix_strategy(),
        b in prefix_strategy(),
    ) {
        let ab = a.cmp(&b);
        let ba = b.cmp(&a);
        prop_assert_eq!(ab, ba.reverse());
        prop_assert!(!(a < b && b < a));
        prop_assert_eq!(ab == Ordering::Equal, a == b);
    }

    /// Property: the RIB order is transitive
    #[test]
    fn prop_order_transitive(
        a in prefix_strategy(),
        b in prefix_strategy(),
        c in prefix_strategy(),
    ) {
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }
}

#[test]
fn well_known_names_round_trip() {
    for wk in WellKnownCommunity::ALL {
        let c: Community = wk.name().parse().unwrap();
        assert_eq!(c, Community::from(wk));
        assert_eq!(c.to_string(), wk.name());
    }
}

#[test]
fn colon_edges() {
    let c: Community = "0:0".parse().unwrap();
    assert_eq!(c.colon_notation(), "0:0");
    let c: Community = "65535:65535".parse().unwrap();
    assert_eq!(c.0, u32::MAX);
    assert_eq!(c.to_string(), "65535:65535");
}
