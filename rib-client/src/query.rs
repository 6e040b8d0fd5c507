// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read a RIB table and present it ordered by network.

use crate::error::Error;
use crate::log::rib_log;
use crate::session::{ListPathRequest, Session, TableLookupPrefix, TableType};
use crate::MOD_QUERY;
use bgp_attr::{AddressFamily, Destination, Path, Prefix};
use slog::Logger;
use std::cmp::Ordering;
use std::io::{self, Write};
use std::time::Duration;

/// A validated table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub family: AddressFamily,
    pub table: TableType,
    pub prefixes: Vec<Prefix>,
}

impl QueryRequest {
    /// Every filter must be a network of `family` with no host bits set.
    /// Nothing is sent if any filter is rejected.
    pub fn new<S: AsRef<str>>(
        family: AddressFamily,
        table: TableType,
        filters: &[S],
    ) -> Result<Self, Error> {
        if let Some(peer) = table.peer() {
            if peer.trim().is_empty() {
                return Err(Error::invalid("peer", peer));
            }
        }
        let prefixes = filters
            .iter()
            .map(|f| {
                let f = f.as_ref();
                Prefix::parse_strict(family, f)
                    .map_err(|_| Error::invalid("prefix", f))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            family,
            table,
            prefixes,
        })
    }

    pub fn to_wire(&self) -> ListPathRequest {
        ListPathRequest {
            table_type: self.table.kind(),
            name: self.table.peer().map(str::to_owned),
            family: self.family.to_wire(),
            prefixes: self
                .prefixes
                .iter()
                .map(|p| TableLookupPrefix {
                    prefix: p.to_string(),
                })
                .collect(),
        }
    }
}

/// Run `req` against `session` and return every destination sorted by
/// network address, then netmask.
///
/// The stream is read to completion before sorting. Attributes that fail
/// to decode are logged and kept as unknown attributes so the rest of the
/// table is still shown.
pub async fn query<S: Session + ?Sized>(
    session: &S,
    log: &Logger,
    req: &QueryRequest,
    timeout: Duration,
) -> Result<Vec<Destination>, Error> {
    let mut stream = session.list_paths(&req.to_wire(), timeout).await?;

    let mut result = Vec::new();
    while let Some(msg) = stream.recv().await {
        let msg = msg?;
        let (dst, errors) = Destination::from_message_lossy(&msg, req.family)?;
        for e in errors {
            rib_log!(log, warn, MOD_QUERY,
                "undecodable attribute on {}: {}", msg.prefix, e;
                "family" => req.family.as_str()
            );
        }
        result.push(dst);
    }

    rib_log!(log, debug, MOD_QUERY, "received {} destinations", result.len());
    sort_destinations(&mut result);
    Ok(result)
}

/// Network address first, netmask second, both as unsigned integers.
pub fn compare_destinations(a: &Destination, b: &Destination) -> Ordering {
    a.prefix.sort_key().cmp(&b.prefix.sort_key())
}

/// Stable, so destinations the server repeats keep their arrival order.
pub fn sort_destinations(dsts: &mut [Destination]) {
    dsts.sort_by(compare_destinations);
}

/// Write every path of every destination in order.
pub fn render<W: Write>(out: &mut W, dsts: &[Destination]) -> io::Result<()> {
    for d in dsts {
        for p in &d.paths {
            render_path(out, p)?;
        }
    }
    Ok(())
}

pub fn render_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", path.nlri)?;
    writeln!(out, "  best: {}", path.best)?;
    writeln!(out, "  family: {}", path.family)?;
    let neighbor = path.neighbor_ip.map(|a| a.to_string()).unwrap_or_default();
    writeln!(out, "  neighbor_ip: {neighbor}")?;
    for a in &path.attributes {
        for (k, v) in a.fields() {
            writeln!(out, "  {k}: {v}")?;
        }
    }
    writeln!(out, "  source_asn: {}", path.source_asn)?;
    Ok(())
}
