// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Packing of typed path attributes into generic envelopes and back.
//!
//! An envelope is a type URL naming the payload's record type plus the
//! record's CBOR encoding. Decoding dispatches on the type name through the
//! [`registry`](crate::registry); names the registry does not know decode to
//! [`PathAttribute::Unknown`] so that attribute kinds introduced by the
//! server after this client was built still pass through.

use crate::attr::PathAttribute;
use crate::error::Error;
use crate::registry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/apipb.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Envelope {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Envelope {
    /// Serialize `payload` into an envelope tagged with `type_name`.
    pub fn pack<T: Serialize>(
        type_name: &'static str,
        payload: &T,
    ) -> Result<Envelope, Error> {
        let mut value = Vec::new();
        ciborium::into_writer(payload, &mut value).map_err(|e| {
            Error::Encode {
                type_name,
                reason: e.to_string(),
            }
        })?;
        Ok(Envelope {
            type_url: format!("{TYPE_URL_PREFIX}{type_name}"),
            value,
        })
    }

    /// Deserialize the payload as `T`. The envelope must be tagged
    /// `type_name` and the payload must be a well formed `T`.
    pub fn unpack<T: DeserializeOwned>(
        &self,
        type_name: &str,
    ) -> Result<T, Error> {
        if self.type_name() != type_name {
            return Err(Error::decode(
                &self.type_url,
                format!("expected {type_name}"),
            ));
        }
        ciborium::from_reader(self.value.as_slice())
            .map_err(|e| Error::decode(&self.type_url, e))
    }

    /// The last `.` separated component of the type URL.
    pub fn type_name(&self) -> &str {
        self.type_url
            .rsplit('.')
            .next()
            .unwrap_or(self.type_url.as_str())
    }
}

/// Pack an attribute for transmission.
pub fn encode(attr: &PathAttribute) -> Result<Envelope, Error> {
    if let PathAttribute::Unknown(env) = attr {
        return Ok(env.clone());
    }
    let type_name = attr.kind().map(|k| k.type_name()).unwrap_or_default();
    let reg = registry::resolve(type_name).ok_or(Error::Encode {
        type_name,
        reason: "not registered".into(),
    })?;
    (reg.encode)(attr)
}

/// Unpack an envelope. Unregistered type names decode to
/// [`PathAttribute::Unknown`]; a payload that does not match its type name
/// is an error.
pub fn decode(env: &Envelope) -> Result<PathAttribute, Error> {
    match registry::resolve(env.type_name()) {
        Some(reg) => (reg.decode)(env),
        None => Ok(PathAttribute::Unknown(env.clone())),
    }
}

/// Like [`decode`], but a payload that fails to decode is kept as
/// [`PathAttribute::Unknown`] along with the reason it was not understood.
pub fn decode_lossy(env: &Envelope) -> (PathAttribute, Option<Error>) {
    match decode(env) {
        Ok(attr) => (attr, None),
        Err(e) => (PathAttribute::Unknown(env.clone()), Some(e)),
    }
}

#[cfg(test)]
pub(crate) fn raw_payload<T: Serialize>(payload: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    ciborium::into_writer(payload, &mut buf).expect("serialize payload");
    buf
}
