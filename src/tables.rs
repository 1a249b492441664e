//! Static lookup tables shared by every generator
//!
//! All data here is read-only `static` state: protocol name/number mappings,
//! address families, per-family ICMP type codes, and the ordered term-name
//! abbreviation table. Nothing in this module is ever mutated, which is what
//! makes the tables safe to share across concurrent renderers without
//! synchronization.

use serde::{Deserialize, Serialize};

/// IP protocol name ↔ number mapping
///
/// Invariant: this table is a bijection - no two names share a number and no
/// two numbers share a name (enforced by test below).
pub static PROTOCOLS: &[(&str, u8)] = &[
    ("ip", 0),
    ("icmp", 1),
    ("igmp", 2),
    ("ggp", 3),
    ("ipencap", 4),
    ("tcp", 6),
    ("egp", 8),
    ("igp", 9),
    ("udp", 17),
    ("rdp", 27),
    ("ipv6", 41),
    ("ipv6-route", 43),
    ("ipv6-frag", 44),
    ("rsvp", 46),
    ("gre", 47),
    ("esp", 50),
    ("ah", 51),
    ("icmpv6", 58),
    ("ipv6-nonxt", 59),
    ("ipv6-opts", 60),
    ("ospf", 89),
    ("ipip", 94),
    ("pim", 103),
    ("vrrp", 112),
    ("l2tp", 115),
    ("sctp", 132),
];

/// Looks up the protocol number for a symbolic name.
pub fn protocol_number(name: &str) -> Option<u8> {
    PROTOCOLS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, num)| num)
}

/// Looks up the symbolic name for a protocol number.
pub fn protocol_name(number: u8) -> Option<&'static str> {
    PROTOCOLS
        .iter()
        .find(|&&(_, num)| num == number)
        .map(|&(n, _)| n)
}

/// Address family of a filter or term
///
/// Every family resolves to numeric 4 or 6. `Bridge` is a legacy alias for 4
/// retained only so renderers can select bridge-style output; it is not a
/// distinct numeric space.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum AddressFamily {
    /// IPv4
    #[strum(serialize = "inet")]
    #[serde(rename = "inet")]
    Inet,
    /// IPv6
    #[strum(serialize = "inet6")]
    #[serde(rename = "inet6")]
    Inet6,
    /// Legacy bridge output selector; numerically identical to `Inet`
    #[strum(serialize = "bridge")]
    #[serde(rename = "bridge")]
    Bridge,
}

impl AddressFamily {
    /// Returns the numeric address-family value (4 or 6).
    pub const fn number(self) -> u8 {
        match self {
            AddressFamily::Inet | AddressFamily::Bridge => 4,
            AddressFamily::Inet6 => 6,
        }
    }
}

/// ICMP type name → code table for IPv4
pub static ICMP_TYPES_V4: &[(&str, u16)] = &[
    ("echo-reply", 0),
    ("unreachable", 3),
    ("source-quench", 4),
    ("redirect", 5),
    ("alternate-address", 6),
    ("echo-request", 8),
    ("router-advertisement", 9),
    ("router-solicitation", 10),
    ("time-exceeded", 11),
    ("parameter-problem", 12),
    ("timestamp-request", 13),
    ("timestamp-reply", 14),
    ("information-request", 15),
    ("information-reply", 16),
    ("mask-request", 17),
    ("mask-reply", 18),
    ("conversion-error", 31),
    ("mobile-redirect", 32),
];

/// ICMPv6 type name → code table
pub static ICMP_TYPES_V6: &[(&str, u16)] = &[
    ("destination-unreachable", 1),
    ("packet-too-big", 2),
    ("time-exceeded", 3),
    ("parameter-problem", 4),
    ("echo-request", 128),
    ("echo-reply", 129),
    ("multicast-listener-query", 130),
    ("multicast-listener-report", 131),
    ("multicast-listener-done", 132),
    ("router-solicit", 133),
    ("router-advertisement", 134),
    ("neighbor-solicit", 135),
    ("neighbor-advertisement", 136),
    ("redirect-message", 137),
    ("router-renumbering", 138),
    ("icmp-node-information-query", 139),
    ("icmp-node-information-response", 140),
    ("inverse-neighbor-discovery-solicitation", 141),
    ("inverse-neighbor-discovery-advertisement", 142),
    ("version-2-multicast-listener-report", 143),
    ("home-agent-address-discovery-request", 144),
    ("home-agent-address-discovery-reply", 145),
    ("mobile-prefix-solicitation", 146),
    ("mobile-prefix-advertisement", 147),
    ("certification-path-solicitation", 148),
    ("certification-path-advertisement", 149),
    ("multicast-router-advertisement", 151),
    ("multicast-router-solicitation", 152),
    ("multicast-router-termination", 153),
];

/// Returns the ICMP type table for a numeric address family, if one exists.
pub fn icmp_table(af: u8) -> Option<&'static [(&'static str, u16)]> {
    match af {
        4 => Some(ICMP_TYPES_V4),
        6 => Some(ICMP_TYPES_V6),
        _ => None,
    }
}

/// Resolves an ICMP type name to its numeric code for the given family.
pub fn icmp_type_code(af: u8, name: &str) -> Option<u16> {
    icmp_table(af)?
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| code)
}

/// Ordered abbreviation table for over-length term names
///
/// Uppercase short forms distinguish abbreviations from lowercase names.
/// Order is significant: entries near the top are tried first, so clear or
/// very space-saving abbreviations come early. Entries are fixed substrings,
/// applied by plain replacement.
pub static ABBREVIATIONS: &[(&str, &str)] = &[
    ("bogons", "BGN"),
    ("bogon", "BGN"),
    ("reserved", "RSV"),
    ("rfc1918", "PRV"),
    ("rfc-1918", "PRV"),
    ("internet", "EXT"),
    ("global", "GBL"),
    ("internal", "INT"),
    ("customer", "CUST"),
    ("partner", "PART"),
    ("border", "BDR"),
    ("service", "SVC"),
    ("router", "RTR"),
    ("transit", "TRNS"),
    ("experiment", "EXP"),
    ("established", "EST"),
    ("unreachable", "UNR"),
    ("fragment", "FRG"),
    ("accept", "OK"),
    ("discard", "DSC"),
    ("reject", "REJ"),
    ("replies", "ACK"),
    ("request", "REQ"),
];
