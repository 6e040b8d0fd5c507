// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use async_trait::async_trait;
use bgp_attr::family::Family;
use bgp_attr::{DestinationMessage, PathMessage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use uuid::Uuid;

/// Destinations as the server produces them. The stream ends when the
/// sender side is dropped.
pub type DestinationStream = Receiver<Result<DestinationMessage, Error>>;

/// Which RIB table a query is directed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableType {
    Global,
    AdjIn(String),
    AdjOut(String),
}

impl TableType {
    pub fn kind(&self) -> TableKind {
        match self {
            Self::Global => TableKind::Global,
            Self::AdjIn(_) => TableKind::AdjIn,
            Self::AdjOut(_) => TableKind::AdjOut,
        }
    }

    pub fn peer(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::AdjIn(peer) | Self::AdjOut(peer) => Some(peer),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKind {
    Global,
    AdjIn,
    AdjOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLookupPrefix {
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPathRequest {
    pub table_type: TableKind,
    pub name: Option<String>,
    pub family: Family,
    pub prefixes: Vec<TableLookupPrefix>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPathRequest {
    pub table_type: TableKind,
    pub path: PathMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPathResponse {
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePathRequest {
    pub table_type: TableKind,
    pub path: PathMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub asn: u32,
    #[serde(default)]
    pub router_id: Option<String>,
}

/// The operations the RIB service exposes. Each call is bounded by
/// `timeout` and is never retried.
#[async_trait]
pub trait Session: Send + Sync {
    async fn list_paths(
        &self,
        req: &ListPathRequest,
        timeout: Duration,
    ) -> Result<DestinationStream, Error>;

    async fn add_path(
        &self,
        req: &AddPathRequest,
        timeout: Duration,
    ) -> Result<Uuid, Error>;

    async fn delete_path(
        &self,
        req: &DeletePathRequest,
        timeout: Duration,
    ) -> Result<(), Error>;

    async fn get_global_config(
        &self,
        timeout: Duration,
    ) -> Result<GlobalConfig, Error>;
}
