// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::family::AddressFamily;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{value} does not belong to address family {family}")]
    FamilyMismatch {
        family: AddressFamily,
        value: String,
    },

    #[error("invalid origin: {0}")]
    InvalidOrigin(String),

    #[error("invalid community: {0}")]
    InvalidCommunity(String),

    #[error("unknown address family afi={afi} safi={safi}")]
    UnknownFamily { afi: u32, safi: u32 },

    #[error("cannot decode {type_url}: {reason}")]
    Decode { type_url: String, reason: String },

    #[error("cannot encode {type_name}: {reason}")]
    Encode {
        type_name: &'static str,
        reason: String,
    },
}

impl Error {
    pub(crate) fn decode(type_url: &str, reason: impl ToString) -> Self {
        Self::Decode {
            type_url: type_url.to_owned(),
            reason: reason.to_string(),
        }
    }
}
