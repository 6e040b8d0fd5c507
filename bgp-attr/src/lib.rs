// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod attr;
pub mod codec;
pub mod community;
pub mod error;
pub mod family;
pub mod nlri;
pub mod path;
pub mod prefix;
pub mod registry;

pub use attr::{AttributeKind, MpReachNlri, PathAttribute, PathOrigin};
pub use codec::Envelope;
pub use community::{Community, WellKnownCommunity};
pub use error::Error;
pub use family::AddressFamily;
pub use path::{Destination, DestinationMessage, Path, PathMessage};
pub use prefix::{Prefix, Prefix4, Prefix6};

#[cfg(test)]
mod proptest;
