//! PHY link descriptors used for switch-port bring-up.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Link speed in Mb/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LinkSpeed(u32);

impl LinkSpeed {
    /// 10 Mb/s Ethernet.
    pub const MBPS_10: Self = LinkSpeed(10);
    /// 100 Mb/s Fast Ethernet.
    pub const MBPS_100: Self = LinkSpeed(100);
    /// 1 Gb/s Ethernet.
    pub const GBPS_1: Self = LinkSpeed(1_000);
    /// 2.5 Gb/s Ethernet.
    pub const GBPS_2_5: Self = LinkSpeed(2_500);
    /// 10 Gb/s Ethernet.
    pub const GBPS_10: Self = LinkSpeed(10_000);

    /// Creates a link speed from Mb/s, rejecting zero.
    pub const fn from_mbps(mbps: u32) -> Result<Self, ParseError> {
        if mbps == 0 {
            Err(ParseError::InvalidLinkSpeed(mbps))
        } else {
            Ok(LinkSpeed(mbps))
        }
    }

    /// Returns the speed in Mb/s.
    pub const fn as_mbps(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LinkSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Mb/s", self.0)
    }
}

impl TryFrom<u32> for LinkSpeed {
    type Error = ParseError;

    fn try_from(mbps: u32) -> Result<Self, Self::Error> {
        LinkSpeed::from_mbps(mbps)
    }
}

impl From<LinkSpeed> for u32 {
    fn from(speed: LinkSpeed) -> u32 {
        speed.0
    }
}

/// Duplex mode of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplex {
    /// Half duplex.
    Half,
    /// Full duplex (default for switch ports).
    #[default]
    Full,
}

impl fmt::Display for Duplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duplex::Half => write!(f, "half"),
            Duplex::Full => write!(f, "full"),
        }
    }
}

impl FromStr for Duplex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half" => Ok(Duplex::Half),
            "full" => Ok(Duplex::Full),
            _ => Err(ParseError::InvalidDuplex(s.to_string())),
        }
    }
}

/// Autonegotiation mode of a MAC/PHY link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagedMode {
    /// Link parameters negotiated by the PHY.
    #[default]
    Phy,
    /// Fixed link, no negotiation.
    Fixed,
    /// In-band signaling (e.g. SGMII control word).
    Inband,
}

impl fmt::Display for ManagedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagedMode::Phy => write!(f, "phy"),
            ManagedMode::Fixed => write!(f, "fixed"),
            ManagedMode::Inband => write!(f, "inband"),
        }
    }
}

/// Snapshot of a PHY link handed to the driver on port enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkState {
    /// Negotiated or configured speed.
    pub speed: LinkSpeed,
    /// Duplex mode.
    pub duplex: Duplex,
    /// Whether the link is up.
    pub is_up: bool,
}

impl LinkState {
    /// Common-sense default for port enable: 1 Gb/s, full duplex, link up.
    pub const DEFAULT_UP: LinkState = LinkState {
        speed: LinkSpeed::GBPS_1,
        duplex: Duplex::Full,
        is_up: true,
    };
}
