// SPDX-License-Identifier: GPL-3.0-only
use thiserror::Error;

/// Tag prefix for navigation requests; the payload is the target URL.
const NAVI_PREFIX: &str = "navi:";

/// Tag prefix for the locale handshake; the payload is the locale code.
const LANG_PREFIX: &str = "lang:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty message frame")]
    EmptyFrame,

    #[error("unknown message tag in '{0}'")]
    UnknownTag(String),
}

/// Message received from the embedded module.
///
/// The wire format is a tagged string (`init:`, `quit:`, `none:`,
/// `navi:<url>`), kept compatible with the unmodified collaborator module.
/// Frames are decoded exactly once, here at the channel boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleMessage {
    /// The module has started initialising.
    Init,

    /// The module has ended; the host may tear the session down.
    Quit,

    /// The module asks the host to hide its loading overlay.
    HideOverlay,

    /// The module asks the host to open an external URL.
    Navigate(String),
}

impl ModuleMessage {
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        match raw {
            "" => Err(ProtocolError::EmptyFrame),
            "init:" => Ok(Self::Init),
            "quit:" => Ok(Self::Quit),
            "none:" => Ok(Self::HideOverlay),
            _ => {
                if let Some(url) = raw.strip_prefix(NAVI_PREFIX) {
                    Ok(Self::Navigate(url.to_string()))
                } else {
                    Err(ProtocolError::UnknownTag(raw.to_string()))
                }
            }
        }
    }
}

/// Message sent to the embedded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    /// Readiness plus locale negotiation: posted once the package cache is
    /// synchronized, carrying the locale the module should start in.
    Lang(String),
}

impl HostMessage {
    pub fn encode(&self) -> String {
        match self {
            Self::Lang(locale) => format!("{}{}", LANG_PREFIX, locale),
        }
    }
}
