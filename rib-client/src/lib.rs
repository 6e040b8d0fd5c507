// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod builder;
pub mod error;
pub mod http;
pub mod log;
pub mod memory;
pub mod query;
pub mod session;

pub use builder::{advertise, build, withdraw, RouteRequest};
pub use error::Error;
pub use http::HttpSession;
pub use memory::MemorySession;
pub use query::{query, render, QueryRequest};
pub use session::{GlobalConfig, Session, TableType};

pub const COMPONENT_RIB_CLIENT: &str = "rib-client";
pub const MOD_QUERY: &str = "query";
pub const MOD_BUILDER: &str = "builder";
pub const MOD_SESSION: &str = "session";

#[cfg(test)]
mod proptest;
