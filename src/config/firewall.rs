//! Firewall rule configuration.
//!
//! Each `[[firewall]]` table declares a service that stays closed to
//! clients until they authenticate through the web interface.

use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use super::error::ConfigError;

/// Firewall rule as written in the config file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawRule {
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub proto: String,
    #[serde(default)]
    pub dest: String,
    #[serde(default)]
    pub dport: String,
    #[serde(default)]
    pub redir: String,
}

/// Validated firewall rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallRule {
    /// Rule comment, attached to the generated firewall rules.
    pub comment: String,
    /// Protocol to match.
    pub proto: Protocol,
    /// Destination address to match.
    pub dest: Destination,
    /// Destination port or inclusive port range.
    pub dport: PortSpec,
    /// Where to send unauthorized traffic instead of denying it.
    pub redir: Option<Redirect>,
}

impl TryFrom<RawRule> for FirewallRule {
    type Error = ConfigError;

    /// Checks run in field order: `proto`, `dest`, `dport`, `redir`.
    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let proto: Protocol = raw.proto.parse()?;
        let dest: Destination = raw.dest.parse()?;
        if raw.dport.is_empty() {
            return Err(ConfigError::missing("dport"));
        }
        let dport: PortSpec = raw.dport.parse()?;
        let redir = if raw.redir.is_empty() {
            None
        } else {
            Some(raw.redir.parse::<Redirect>()?)
        };

        Ok(Self {
            comment: raw.comment,
            proto,
            dest,
            dport,
            redir,
        })
    }
}

// =============================================================================
// Deny method
// =============================================================================

/// Firewall action applied to unauthorized clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DenyMethod {
    /// Silently drop incoming packets. Works best when the firewall also
    /// drops traffic to other unoccupied ports.
    Drop,
    /// Refuse with "connection refused". Works best when the firewall does
    /// not drop traffic to other unoccupied ports.
    #[default]
    Reject,
}

impl DenyMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for DenyMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Self::Drop),
            "reject" => Ok(Self::Reject),
            other => Err(ConfigError::invalid("firewall-deny-method", other)),
        }
    }
}

impl fmt::Display for DenyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Protocol
// =============================================================================

/// Transport protocol a rule applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    /// Both TCP and UDP (`proto` omitted or empty).
    #[default]
    Any,
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "" => Ok(Self::Any),
            other => Err(ConfigError::invalid("proto", other)),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::Udp => f.write_str("udp"),
            Self::Any => f.write_str("any"),
        }
    }
}

// =============================================================================
// Destination
// =============================================================================

/// Destination address of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// Matches every address (`0.0.0.0/0` and `::/0`).
    #[default]
    Any,
    /// A single address or subnet.
    Address {
        /// Parsed address literal, without the subnet suffix.
        addr: IpAddr,
        /// Subnet prefix length from the `/n` suffix, if present.
        prefix_len: Option<u8>,
        /// The text exactly as written in the config file.
        raw: String,
    },
}

impl Destination {
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Parsed address, `None` for match-any.
    pub fn addr(&self) -> Option<IpAddr> {
        match self {
            Self::Any => None,
            Self::Address { addr, .. } => Some(*addr),
        }
    }

    /// The subnet suffix including its slash (e.g. `/32`), as written.
    pub fn suffix(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Address { raw, .. } => raw.find('/').map(|slash| &raw[slash..]),
        }
    }
}

impl FromStr for Destination {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "any" {
            return Ok(Self::Any);
        }

        let invalid = || ConfigError::invalid("dest", s);
        let (literal, suffix) = match s.split_once('/') {
            Some((literal, suffix)) => (literal, Some(suffix)),
            None => (s, None),
        };
        let addr: IpAddr = literal.parse().map_err(|_| invalid())?;

        let prefix_len = match suffix {
            Some(suffix) => {
                let max = if addr.is_ipv4() { 32 } else { 128 };
                let len = decimal::<u8>(suffix)
                    .filter(|len| *len <= max)
                    .ok_or_else(invalid)?;
                Some(len)
            }
            None => None,
        };

        Ok(Self::Address {
            addr,
            prefix_len,
            raw: s.to_string(),
        })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Address { raw, .. } => f.write_str(raw),
        }
    }
}

// =============================================================================
// Destination port
// =============================================================================

/// Destination port, a single port or an inclusive `first:last` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSpec {
    Single(u16),
    /// Inclusive range. `:last` starts at 1 and `first:` ends at 65535.
    Range(u16, u16),
}

impl FromStr for PortSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::invalid("dport", s);
        let port = |p: &str, open: u16| -> Result<u16, ConfigError> {
            if p.is_empty() {
                Ok(open)
            } else {
                port_number(p).ok_or_else(invalid)
            }
        };

        match s.split_once(':') {
            None => port_number(s).map(Self::Single).ok_or_else(invalid),
            Some(("", "")) => Err(invalid()),
            Some((first, last)) => {
                let first = port(first, 1)?;
                let last = port(last, u16::MAX)?;
                if first > last {
                    return Err(invalid());
                }
                Ok(Self::Range(first, last))
            }
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(port) => write!(f, "{port}"),
            Self::Range(first, last) => write!(f, "{first}:{last}"),
        }
    }
}

// =============================================================================
// Redirect
// =============================================================================

/// Redirect target for unauthorized traffic: `addr`, `:port` or `addr:port`.
///
/// IPv6 addresses with a port use the bracketed form `[addr]:port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub addr: Option<IpAddr>,
    pub port: Option<u16>,
}

impl FromStr for Redirect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(sock) = s.parse::<SocketAddr>() {
            return Ok(Self {
                addr: Some(sock.ip()),
                port: Some(sock.port()),
            });
        }
        if let Ok(addr) = s.parse::<IpAddr>() {
            return Ok(Self {
                addr: Some(addr),
                port: None,
            });
        }
        match s.strip_prefix(':').and_then(port_number) {
            Some(port) => Ok(Self {
                addr: None,
                port: Some(port),
            }),
            _ => Err(ConfigError::invalid("redir", s)),
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.addr, self.port) {
            (Some(addr), Some(port)) => write!(f, "{}", SocketAddr::new(addr, port)),
            (Some(addr), None) => write!(f, "{addr}"),
            (None, Some(port)) => write!(f, ":{port}"),
            (None, None) => Ok(()),
        }
    }
}

/// Unsigned decimal number made of ASCII digits only (no sign, no spaces).
fn decimal<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Port number in `1..=65535`.
fn port_number(s: &str) -> Option<u16> {
    decimal::<u16>(s).filter(|port| *port != 0)
}
