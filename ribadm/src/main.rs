// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{anyhow, Result};
use bgp_attr::AddressFamily;
use clap::{Parser, Subcommand};
use rib_client::HttpSession;
use rib_common::cli::rib_cli_style;
use rib_common::log::{init_file_logger, init_logger};
use slog::Logger;
use std::net::SocketAddr;
use std::time::Duration;

mod path;
mod rib;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    styles = rib_cli_style(),
    infer_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Host name or address of the RIB service
    #[arg(short, long, env = "RIBADM_ADDRESS", default_value = "localhost")]
    address: String,

    /// TCP port of the RIB service
    #[arg(short, long, default_value_t = 50051)]
    port: u16,

    /// Deadline for each request, e.g. 500ms or 2s
    #[arg(
        short,
        long,
        default_value = "1s",
        value_parser = humantime::parse_duration
    )]
    timeout: Duration,

    /// Address family ipv4-unicast (default)
    #[arg(short = '4', conflicts_with = "ipv6")]
    ipv4: bool,

    /// Address family ipv6-unicast
    #[arg(short = '6')]
    ipv6: bool,

    /// Write bunyan formatted logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<String>,
}

impl Cli {
    fn family(&self) -> AddressFamily {
        if self.ipv6 {
            AddressFamily::Ipv6Unicast
        } else {
            AddressFamily::Ipv4Unicast
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a RIB table.
    Rib(rib::RibCommand),

    /// Add or delete a path in the global table.
    Path(path::PathCommand),
}

/// Everything a subcommand needs to talk to the service.
pub struct Ctx {
    pub session: HttpSession,
    pub log: Logger,
    pub family: AddressFamily,
    pub timeout: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = match &cli.log_file {
        Some(path) => init_file_logger(path)?,
        None => init_logger(),
    };

    let addr = resolve(&cli.address, cli.port).await?;
    let endpoint = format!("http://{addr}");
    slog::debug!(log, "using rib service at {}", endpoint);

    let ctx = Ctx {
        session: HttpSession::new(&endpoint, log.clone())?,
        log,
        family: cli.family(),
        timeout: cli.timeout,
    };

    match cli.command {
        Commands::Rib(command) => rib::commands(command, &ctx).await?,
        Commands::Path(command) => path::commands(command, &ctx).await?,
    }
    Ok(())
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| anyhow!("invalid host: {host}"))
}
