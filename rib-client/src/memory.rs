// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A session backed by an in-process snapshot. Mutations are recorded
//! rather than applied so callers can inspect exactly what would have been
//! sent.

use crate::error::Error;
use crate::session::{
    AddPathRequest, DeletePathRequest, DestinationStream, GlobalConfig,
    ListPathRequest, Session,
};
use async_trait::async_trait;
use bgp_attr::DestinationMessage;
use rib_common::lock;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::channel;
use uuid::Uuid;

#[derive(Default)]
pub struct MemorySession {
    destinations: Vec<DestinationMessage>,
    global: Option<GlobalConfig>,
    reject: Option<String>,
    log: Mutex<Recorded>,
}

#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub listed: Vec<ListPathRequest>,
    pub added: Vec<(Uuid, AddPathRequest)>,
    pub deleted: Vec<DeletePathRequest>,
    pub config_fetches: usize,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destinations handed back, in this order, by every `list_paths`.
    pub fn with_destinations(
        self,
        destinations: Vec<DestinationMessage>,
    ) -> Self {
        Self {
            destinations,
            ..self
        }
    }

    /// Without a global config `get_global_config` fails.
    pub fn with_global_config(self, config: GlobalConfig) -> Self {
        Self {
            global: Some(config),
            ..self
        }
    }

    /// Reject every call with `reason`.
    pub fn rejecting(self, reason: &str) -> Self {
        Self {
            reject: Some(reason.to_owned()),
            ..self
        }
    }

    pub fn recorded(&self) -> Recorded {
        lock!(self.log).clone()
    }

    fn check(&self) -> Result<(), Error> {
        match &self.reject {
            Some(reason) => Err(Error::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn list_paths(
        &self,
        req: &ListPathRequest,
        _timeout: Duration,
    ) -> Result<DestinationStream, Error> {
        lock!(self.log).listed.push(req.clone());
        self.check()?;
        let (tx, rx) = channel(self.destinations.len().max(1));
        for d in &self.destinations {
            // capacity covers the whole snapshot
            if tx.try_send(Ok(d.clone())).is_err() {
                break;
            }
        }
        Ok(rx)
    }

    async fn add_path(
        &self,
        req: &AddPathRequest,
        _timeout: Duration,
    ) -> Result<Uuid, Error> {
        self.check()?;
        let id = Uuid::new_v4();
        lock!(self.log).added.push((id, req.clone()));
        Ok(id)
    }

    async fn delete_path(
        &self,
        req: &DeletePathRequest,
        _timeout: Duration,
    ) -> Result<(), Error> {
        self.check()?;
        lock!(self.log).deleted.push(req.clone());
        Ok(())
    }

    async fn get_global_config(
        &self,
        _timeout: Duration,
    ) -> Result<GlobalConfig, Error> {
        lock!(self.log).config_fetches += 1;
        self.check()?;
        self.global
            .clone()
            .ok_or_else(|| Error::Rejected("global config not set".into()))
    }
}
