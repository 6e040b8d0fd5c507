// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::attr::{
    AttributeKind, CommunitiesAttribute, LocalPrefAttribute,
    MpReachNlriAttribute, MultiExitDiscAttribute, NextHopAttribute,
    OriginAttribute, PathAttribute, PathOrigin,
};
use crate::codec::Envelope;
use crate::community::Community;
use crate::error::Error;
use crate::family::AddressFamily;
use crate::nlri;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::net::IpAddr;

pub type DecodeFn = fn(&Envelope) -> Result<PathAttribute, Error>;
pub type EncodeFn = fn(&PathAttribute) -> Result<Envelope, Error>;

/// How to move one attribute kind in and out of an envelope.
#[derive(Debug)]
pub struct Registration {
    pub kind: AttributeKind,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

/// Envelope type name to attribute codec. Built once, read only afterwards.
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<&'static str, Registration>,
}

impl Registry {
    fn new() -> Self {
        let mut entries = HashMap::new();
        for kind in AttributeKind::ALL {
            let (decode, encode): (DecodeFn, EncodeFn) = match kind {
                AttributeKind::Origin => (decode_origin, encode_origin),
                AttributeKind::NextHop => (decode_next_hop, encode_next_hop),
                AttributeKind::MultiExitDisc => (decode_med, encode_med),
                AttributeKind::LocalPref => {
                    (decode_local_pref, encode_local_pref)
                }
                AttributeKind::Communities => {
                    (decode_communities, encode_communities)
                }
                AttributeKind::MpReachNlri => {
                    (decode_mp_reach, encode_mp_reach)
                }
            };
            entries.insert(
                kind.type_name(),
                Registration {
                    kind,
                    decode,
                    encode,
                },
            );
        }
        Self { entries }
    }

    pub fn get(&self, type_name: &str) -> Option<&Registration> {
        self.entries.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

lazy_static! {
    static ref REGISTRY: Registry = Registry::new();
}

/// Look up the codec for an envelope type name, e.g. `OriginAttribute`.
pub fn resolve(type_name: &str) -> Option<&'static Registration> {
    REGISTRY.get(type_name)
}

/// Look up the codec for a full type URL.
pub fn resolve_type_url(type_url: &str) -> Option<&'static Registration> {
    let name = type_url.rsplit('.').next().unwrap_or(type_url);
    resolve(name)
}

pub fn registry() -> &'static Registry {
    &REGISTRY
}

fn mismatch(kind: AttributeKind) -> Error {
    Error::Encode {
        type_name: kind.type_name(),
        reason: "attribute does not match registered kind".into(),
    }
}

fn decode_origin(env: &Envelope) -> Result<PathAttribute, Error> {
    let p: OriginAttribute = env.unpack(AttributeKind::Origin.type_name())?;
    let origin = u8::try_from(p.origin)
        .ok()
        .and_then(|o| PathOrigin::try_from(o).ok())
        .ok_or_else(|| {
            Error::decode(&env.type_url, format!("bad origin {}", p.origin))
        })?;
    Ok(PathAttribute::Origin(origin))
}

fn encode_origin(attr: &PathAttribute) -> Result<Envelope, Error> {
    let PathAttribute::Origin(o) = attr else {
        return Err(mismatch(AttributeKind::Origin));
    };
    Envelope::pack(
        AttributeKind::Origin.type_name(),
        &OriginAttribute {
            origin: *o as u32,
        },
    )
}

fn decode_next_hop(env: &Envelope) -> Result<PathAttribute, Error> {
    let p: NextHopAttribute = env.unpack(AttributeKind::NextHop.type_name())?;
    let addr = p
        .next_hop
        .parse()
        .map_err(|e| Error::decode(&env.type_url, e))?;
    Ok(PathAttribute::NextHop(addr))
}

fn encode_next_hop(attr: &PathAttribute) -> Result<Envelope, Error> {
    let PathAttribute::NextHop(addr) = attr else {
        return Err(mismatch(AttributeKind::NextHop));
    };
    Envelope::pack(
        AttributeKind::NextHop.type_name(),
        &NextHopAttribute {
            next_hop: addr.to_string(),
        },
    )
}

fn decode_med(env: &Envelope) -> Result<PathAttribute, Error> {
    let p: MultiExitDiscAttribute =
        env.unpack(AttributeKind::MultiExitDisc.type_name())?;
    Ok(PathAttribute::MultiExitDisc(p.med))
}

fn encode_med(attr: &PathAttribute) -> Result<Envelope, Error> {
    let PathAttribute::MultiExitDisc(med) = attr else {
        return Err(mismatch(AttributeKind::MultiExitDisc));
    };
    Envelope::pack(
        AttributeKind::MultiExitDisc.type_name(),
        &MultiExitDiscAttribute { med: *med },
    )
}

fn decode_local_pref(env: &Envelope) -> Result<PathAttribute, Error> {
    let p: LocalPrefAttribute =
        env.unpack(AttributeKind::LocalPref.type_name())?;
    Ok(PathAttribute::LocalPref(p.local_pref))
}

fn encode_local_pref(attr: &PathAttribute) -> Result<Envelope, Error> {
    let PathAttribute::LocalPref(local_pref) = attr else {
        return Err(mismatch(AttributeKind::LocalPref));
    };
    Envelope::pack(
        AttributeKind::LocalPref.type_name(),
        &LocalPrefAttribute {
            local_pref: *local_pref,
        },
    )
}

fn decode_communities(env: &Envelope) -> Result<PathAttribute, Error> {
    let p: CommunitiesAttribute =
        env.unpack(AttributeKind::Communities.type_name())?;
    Ok(PathAttribute::Communities(
        p.communities.into_iter().map(Community).collect(),
    ))
}

fn encode_communities(attr: &PathAttribute) -> Result<Envelope, Error> {
    let PathAttribute::Communities(cs) = attr else {
        return Err(mismatch(AttributeKind::Communities));
    };
    Envelope::pack(
        AttributeKind::Communities.type_name(),
        &CommunitiesAttribute {
            communities: cs.iter().map(|c| c.0).collect(),
        },
    )
}

fn decode_mp_reach(env: &Envelope) -> Result<PathAttribute, Error> {
    let p: MpReachNlriAttribute =
        env.unpack(AttributeKind::MpReachNlri.type_name())?;
    let family = AddressFamily::from_wire(p.family)
        .map_err(|e| Error::decode(&env.type_url, e))?;

    let mut nlris = Vec::with_capacity(p.nlris.len());
    for n in &p.nlris {
        let prefix = nlri::decode_nlri(n)?;
        if prefix.family() != family {
            return Err(Error::decode(
                &env.type_url,
                format!("nlri {prefix} outside of {family}"),
            ));
        }
        nlris.push(prefix);
    }

    let mut next_hops = Vec::with_capacity(p.next_hops.len());
    for nh in &p.next_hops {
        let addr: IpAddr =
            nh.parse().map_err(|e| Error::decode(&env.type_url, e))?;
        next_hops.push(addr);
    }

    Ok(PathAttribute::MpReachNlri(crate::attr::MpReachNlri {
        family,
        nlris,
        next_hops,
    }))
}

fn encode_mp_reach(attr: &PathAttribute) -> Result<Envelope, Error> {
    let PathAttribute::MpReachNlri(mp) = attr else {
        return Err(mismatch(AttributeKind::MpReachNlri));
    };
    let nlris = mp
        .nlris
        .iter()
        .map(nlri::encode_nlri)
        .collect::<Result<Vec<_>, _>>()?;
    Envelope::pack(
        AttributeKind::MpReachNlri.type_name(),
        &MpReachNlriAttribute {
            family: mp.family.to_wire(),
            nlris,
            next_hops: mp.next_hops.iter().map(|a| a.to_string()).collect(),
        },
    )
}
