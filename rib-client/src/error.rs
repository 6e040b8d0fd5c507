// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// User supplied input that cannot be turned into a request. Always
    /// raised before anything is sent.
    #[error("invalid {what}: {value}")]
    Invalid { what: &'static str, value: String },

    #[error("attribute error: {0}")]
    Attr(#[from] bgp_attr::Error),

    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("timeout")]
    Timeout,

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Response(String),
}

impl Error {
    pub(crate) fn invalid(what: &'static str, value: impl ToString) -> Self {
        Self::Invalid {
            what,
            value: value.to_string(),
        }
    }

    /// Whether this error was raised by input validation rather than by the
    /// remote side.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Response(e.to_string())
    }
}
