// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turn command line route parameters into a path and hand it to the RIB.

use crate::error::Error;
use crate::log::rib_log;
use crate::session::{AddPathRequest, DeletePathRequest, Session, TableKind};
use crate::MOD_BUILDER;
use bgp_attr::{
    AddressFamily, Community, MpReachNlri, Path, PathAttribute, PathOrigin,
    Prefix,
};
use slog::Logger;
use std::net::IpAddr;
use std::time::Duration;
use uuid::Uuid;

/// Route parameters as the user typed them. Nothing here has been
/// validated; [`build`] does that.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub network: String,
    pub family: AddressFamily,
    pub nexthop: Option<String>,
    pub origin: Option<String>,
    pub med: Option<String>,
    pub local_pref: Option<String>,

    /// Community tokens; each may hold several comma separated values.
    pub communities: Vec<String>,

    /// Build a withdrawal. Policy attributes are left out.
    pub withdraw: bool,
}

/// Build the path described by `req`. Either every part is valid and a
/// path is returned, or the first invalid part is reported.
pub fn build(req: &RouteRequest) -> Result<Path, Error> {
    let nlri = Prefix::parse(req.family, &req.network)
        .map_err(|_| Error::invalid("prefix", &req.network))?;

    let nexthop = given(&req.nexthop)
        .map(|s| parse_nexthop(req.family, s))
        .transpose()?;

    let mut attributes = Vec::new();
    match req.family {
        AddressFamily::Ipv4Unicast => {
            if let Some(nh) = nexthop {
                attributes.push(PathAttribute::NextHop(nh));
            }
        }
        family => {
            attributes.push(PathAttribute::MpReachNlri(MpReachNlri {
                family,
                nlris: vec![nlri],
                next_hops: nexthop.into_iter().collect(),
            }));
        }
    }

    if !req.withdraw {
        if let Some(s) = given(&req.origin) {
            let origin: PathOrigin =
                s.parse().map_err(|_| Error::invalid("origin", s))?;
            attributes.push(PathAttribute::Origin(origin));
        }
        if let Some(s) = given(&req.med) {
            let med = parse_u32(s).ok_or_else(|| Error::invalid("med", s))?;
            attributes.push(PathAttribute::MultiExitDisc(med));
        }
        if let Some(s) = given(&req.local_pref) {
            let pref = parse_u32(s)
                .ok_or_else(|| Error::invalid("local preference", s))?;
            attributes.push(PathAttribute::LocalPref(pref));
        }
        let tokens: Vec<&str> = req
            .communities
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect();
        if !tokens.is_empty() {
            let communities = Community::parse_list(&tokens)
                .map_err(|_| Error::invalid("community", tokens.join(",")))?;
            attributes.push(PathAttribute::Communities(communities));
        }
    }

    Ok(Path::new(nlri, req.family, attributes))
}

/// Announce the route in `req` through the global table. The source AS is
/// taken from the server's global config when it can be fetched and is 0
/// otherwise.
pub async fn advertise<S: Session + ?Sized>(
    session: &S,
    log: &Logger,
    req: &RouteRequest,
    timeout: Duration,
) -> Result<Uuid, Error> {
    let path = build(&RouteRequest {
        withdraw: false,
        ..req.clone()
    })?;

    let source_asn = match session.get_global_config(timeout).await {
        Ok(config) => config.asn,
        Err(e) => {
            rib_log!(log, error, MOD_BUILDER,
                "failed to get source asn from global config: {}", e;
                "network" => req.network.clone()
            );
            0
        }
    };
    let path = path.with_source_asn(source_asn);

    let req = AddPathRequest {
        table_type: TableKind::Global,
        path: path.to_message()?,
    };
    let id = session.add_path(&req, timeout).await?;
    rib_log!(log, debug, MOD_BUILDER, "added path {}", path.nlri;
        "uuid" => id.to_string(),
        "source_asn" => source_asn
    );
    Ok(id)
}

/// Withdraw the route in `req` from the global table.
pub async fn withdraw<S: Session + ?Sized>(
    session: &S,
    log: &Logger,
    req: &RouteRequest,
    timeout: Duration,
) -> Result<(), Error> {
    let path = build(&RouteRequest {
        withdraw: true,
        ..req.clone()
    })?;

    let req = DeletePathRequest {
        table_type: TableKind::Global,
        path: path.to_message()?,
    };
    session.delete_path(&req, timeout).await?;
    rib_log!(log, debug, MOD_BUILDER, "deleted path {}", path.nlri);
    Ok(())
}

// Empty values count as not given.
fn given(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn parse_nexthop(family: AddressFamily, s: &str) -> Result<IpAddr, Error> {
    let addr: IpAddr = s.parse().map_err(|_| Error::invalid("next-hop", s))?;
    match (family, addr) {
        (AddressFamily::Ipv4Unicast, IpAddr::V4(_))
        | (AddressFamily::Ipv6Unicast, IpAddr::V6(_)) => Ok(addr),
        _ => Err(Error::invalid("next-hop", s)),
    }
}

// Decimal only; signs and overflow are rejected.
fn parse_u32(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
