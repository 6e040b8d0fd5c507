// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::Ctx;
use anyhow::Result;
use bgp_attr::AddressFamily;
use clap::{Args, Subcommand};
use rib_client::{advertise, withdraw, RouteRequest};
use std::net::Ipv4Addr;

#[derive(Debug, Args)]
pub struct PathCommand {
    /// Network to add or delete, e.g. 10.0.0.0/24
    network: String,

    /// Next hop for the network [default for IPv4: 0.0.0.0]
    #[arg(short, long)]
    nexthop: Option<String>,

    #[command(subcommand)]
    command: PathCmd,
}

#[derive(Subcommand, Debug)]
pub enum PathCmd {
    /// Add a path to the global table and print its uuid.
    Add {
        /// Origin: igp, egp or incomplete
        #[arg(short, long, default_value = "igp")]
        origin: String,

        /// Multi-exit discriminator
        #[arg(short, long)]
        med: Option<String>,

        /// Local preference
        #[arg(short = 'p', long)]
        local_pref: Option<String>,

        /// Communities, by name or as <asn>:<value>, comma separated or
        /// repeated
        #[arg(short, long = "community", num_args = 1..)]
        communities: Vec<String>,
    },

    /// Delete a path from the global table.
    Delete,
}

impl PathCommand {
    fn route(self, family: AddressFamily) -> RouteRequest {
        let base = RouteRequest {
            network: self.network,
            family,
            nexthop: self.nexthop.or_else(|| default_nexthop(family)),
            ..Default::default()
        };
        match self.command {
            PathCmd::Add {
                origin,
                med,
                local_pref,
                communities,
            } => RouteRequest {
                origin: Some(origin),
                med,
                local_pref,
                communities,
                ..base
            },
            PathCmd::Delete => RouteRequest {
                withdraw: true,
                ..base
            },
        }
    }
}

// IPv6 has no unspecified next hop the server accepts, so none is sent.
fn default_nexthop(family: AddressFamily) -> Option<String> {
    match family {
        AddressFamily::Ipv4Unicast => Some(Ipv4Addr::UNSPECIFIED.to_string()),
        AddressFamily::Ipv6Unicast => None,
    }
}

pub async fn commands(command: PathCommand, ctx: &Ctx) -> Result<()> {
    let req = command.route(ctx.family);
    if req.withdraw {
        withdraw(&ctx.session, &ctx.log, &req, ctx.timeout).await?;
    } else {
        let id = advertise(&ctx.session, &ctx.log, &req, ctx.timeout).await?;
        println!("{id}");
    }
    Ok(())
}
