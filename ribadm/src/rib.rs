// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::Ctx;
use anyhow::Result;
use clap::Args;
use rib_client::{query, render, QueryRequest, TableType};
use std::io::{stdout, Write};

#[derive(Debug, Args)]
pub struct RibCommand {
    /// Show the global table (default)
    #[arg(short = 'l', long, group = "table")]
    global: bool,

    /// Show paths received from this peer
    #[arg(short = 'i', long = "in", value_name = "PEER", group = "table")]
    adj_in: Option<String>,

    /// Show paths advertised to this peer
    #[arg(short = 'o', long = "out", value_name = "PEER", group = "table")]
    adj_out: Option<String>,

    /// Only show these networks, e.g. 10.0.0.0/24
    networks: Vec<String>,
}

impl RibCommand {
    fn table(&self) -> TableType {
        match (&self.adj_in, &self.adj_out) {
            (Some(peer), _) => TableType::AdjIn(peer.clone()),
            (_, Some(peer)) => TableType::AdjOut(peer.clone()),
            _ => TableType::Global,
        }
    }
}

pub async fn commands(command: RibCommand, ctx: &Ctx) -> Result<()> {
    let req =
        QueryRequest::new(ctx.family, command.table(), &command.networks)?;
    check_peer(&req.table).await?;
    let dsts = query(&ctx.session, &ctx.log, &req, ctx.timeout).await?;

    let mut out = stdout().lock();
    render(&mut out, &dsts)?;
    out.flush()?;
    Ok(())
}

// The peer must name a host, the same way the service address does.
async fn check_peer(table: &TableType) -> Result<()> {
    if let Some(peer) = table.peer() {
        crate::resolve(peer, 0).await?;
    }
    Ok(())
}
