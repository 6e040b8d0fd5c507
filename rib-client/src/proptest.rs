// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based tests for route building and RIB ordering.

use crate::builder::{build, RouteRequest};
use crate::query::sort_destinations;
use bgp_attr::nlri::decode_nlri;
use bgp_attr::{
    AddressFamily, AttributeKind, Destination, PathAttribute, Prefix,
};
use proptest::prelude::*;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

fn origin_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop_oneof![
        Just("igp".to_string()),
        Just("egp".to_string()),
        Just("incomplete".to_string()),
    ])
}

fn community_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(
        (any::<u16>(), any::<u16>()).prop_map(|(h, l)| format!("{h}:{l}")),
        0..4,
    )
}

fn v4_request_strategy() -> impl Strategy<Value = RouteRequest> {
    (
        any::<u32>(),
        0u8..=32u8,
        proptest::option::of(any::<u32>()),
        origin_strategy(),
        proptest::option::of(any::<u32>()),
        proptest::option::of(any::<u32>()),
        community_strategy(),
        any::<bool>(),
    )
        .prop_map(
            |(addr, len, nh, origin, med, pref, communities, withdraw)| {
                RouteRequest {
                    network: format!("{}/{len}", Ipv4Addr::from(addr)),
                    family: AddressFamily::Ipv4Unicast,
                    nexthop: nh.map(|n| Ipv4Addr::from(n).to_string()),
                    origin,
                    med: med.map(|m| m.to_string()),
                    local_pref: pref.map(|p| p.to_string()),
                    communities,
                    withdraw,
                }
            },
        )
}

fn v6_request_strategy() -> impl Strategy<Value = RouteRequest> {
    (
        any::<u128>(),
        0u8..=128u8,
        proptest::option::of(any::<u128>()),
        origin_strategy(),
        proptest::option::of(any::<u32>()),
        community_strategy(),
        any::<bool>(),
    )
        .prop_map(|(addr, len, nh, origin, med, communities, withdraw)| {
            RouteRequest {
                network: format!("{}/{len}", Ipv6Addr::from(addr)),
                family: AddressFamily::Ipv6Unicast,
                nexthop: nh.map(|n| Ipv6Addr::from(n).to_string()),
                origin,
                med: med.map(|m| m.to_string()),
                local_pref: None,
                communities,
                withdraw,
            }
        })
}

fn request_strategy() -> impl Strategy<Value = RouteRequest> {
    prop_oneof![v4_request_strategy(), v6_request_strategy()]
}

fn destination_strategy() -> impl Strategy<Value = Destination> {
    (any::<u32>(), 0u8..=32u8).prop_map(|(addr, len)| Destination {
        prefix: Prefix::from_parts(Ipv4Addr::from(addr).into(), len)
            .expect("valid v4 prefix"),
        paths: vec![],
    })
}

proptest! {
    /// Property: the NLRI of a built path decodes to the network given
    #[test]
    fn prop_build_nlri_round_trip(req in request_strategy()) {
        let path = build(&req).unwrap();
        let msg = path.to_message().unwrap();
        let back = decode_nlri(&msg.nlri).unwrap();
        let (addr, len) = req.network.split_once('/').unwrap();
        prop_assert_eq!(back.addr(), addr.parse::<IpAddr>().unwrap());
        prop_assert_eq!(back.length(), len.parse::<u8>().unwrap());
    }

    /// Property: IPv6 paths carry exactly one MP reach and no next hop
    #[test]
    fn prop_ipv6_single_mp_reach(req in v6_request_strategy()) {
        let path = build(&req).unwrap();
        let mp = path
            .attributes
            .iter()
            .filter(|a| matches!(a, PathAttribute::MpReachNlri(_)))
            .count();
        prop_assert_eq!(mp, 1);
        prop_assert!(path.attribute(AttributeKind::NextHop).is_none());
    }

    /// Property: withdrawals never carry policy attributes
    #[test]
    fn prop_withdraw_has_no_policy(req in request_strategy()) {
        let req = RouteRequest { withdraw: true, ..req };
        let path = build(&req).unwrap();
        for kind in [
            AttributeKind::Origin,
            AttributeKind::MultiExitDisc,
            AttributeKind::LocalPref,
            AttributeKind::Communities,
        ] {
            prop_assert!(path.attribute(kind).is_none());
        }
    }

    /// Property: sorting does not depend on arrival order
    #[test]
    fn prop_sort_is_order_independent(
        mut dsts in proptest::collection::vec(destination_strategy(), 0..32),
    ) {
        let mut reversed: Vec<Destination> =
            dsts.iter().rev().cloned().collect();
        sort_destinations(&mut dsts);
        sort_destinations(&mut reversed);
        let keys = |v: &[Destination]| {
            v.iter().map(|d| d.prefix.sort_key()).collect::<Vec<_>>()
        };
        prop_assert_eq!(keys(&dsts), keys(&reversed));
        for w in dsts.windows(2) {
            prop_assert!(w[0].prefix.sort_key() <= w[1].prefix.sort_key());
        }
    }
}
