// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::codec::Envelope;
use crate::error::Error;
use crate::prefix::Prefix;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub const IP_ADDRESS_PREFIX: &str = "IPAddressPrefix";

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct IpAddressPrefix {
    prefix_len: u32,
    prefix: String,
}

/// Pack a prefix as NLRI.
pub fn encode_nlri(p: &Prefix) -> Result<Envelope, Error> {
    Envelope::pack(
        IP_ADDRESS_PREFIX,
        &IpAddressPrefix {
            prefix_len: u32::from(p.length()),
            prefix: p.addr().to_string(),
        },
    )
}

/// Unpack NLRI. The exact address and length are preserved, host bits
/// included.
pub fn decode_nlri(env: &Envelope) -> Result<Prefix, Error> {
    let p: IpAddressPrefix = env.unpack(IP_ADDRESS_PREFIX)?;
    let addr: IpAddr = p
        .prefix
        .parse()
        .map_err(|e| Error::decode(&env.type_url, e))?;
    let length = u8::try_from(p.prefix_len).map_err(|_| {
        Error::decode(&env.type_url, format!("bad length {}", p.prefix_len))
    })?;
    Prefix::from_parts(addr, length)
        .map_err(|e| Error::decode(&env.type_url, e))
}
