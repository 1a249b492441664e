//! Stateless normalization of single terms
//!
//! Address-family coercion and ICMP type resolution. These operations have no
//! side effects and keep no state; renderers call them per term, per target,
//! and must not re-derive the rules themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tables::{self, AddressFamily};

/// Address family as it appears in policy input: numeric or symbolic
///
/// Policy files may spell an address family either way (`4` or `"inet"`),
/// so the untagged representation accepts both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AfSpec {
    Number(u8),
    Name(String),
}

impl fmt::Display for AfSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AfSpec::Number(n) => write!(f, "{n}"),
            AfSpec::Name(name) => f.write_str(name),
        }
    }
}

impl From<u8> for AfSpec {
    fn from(n: u8) -> Self {
        AfSpec::Number(n)
    }
}

impl From<&str> for AfSpec {
    fn from(name: &str) -> Self {
        AfSpec::Name(name.to_string())
    }
}

impl From<AddressFamily> for AfSpec {
    fn from(af: AddressFamily) -> Self {
        AfSpec::Number(af.number())
    }
}

/// Converts (if necessary) an address family to its numeric value.
///
/// Recognized numeric values (4, 6) pass through unchanged; recognized names
/// (`inet`, `inet6`, `bridge`) map to their numeric family. Anything else
/// fails with [`Error::UnsupportedAddressFamily`] naming the term.
pub fn normalize_address_family(af: &AfSpec, term_name: &str) -> Result<u8> {
    match af {
        AfSpec::Number(n) if *n == 4 || *n == 6 => Ok(*n),
        AfSpec::Name(name) => match AddressFamily::from_str(name) {
            Ok(family) => Ok(family.number()),
            Err(_) => Err(Error::UnsupportedAddressFamily {
                af: name.clone(),
                term: term_name.to_string(),
            }),
        },
        AfSpec::Number(n) => Err(Error::UnsupportedAddressFamily {
            af: n.to_string(),
            term: term_name.to_string(),
        }),
    }
}

/// Resolved ICMP type match for a term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcmpMatch {
    /// No specific type named: the match applies to all ICMP types
    All,
    /// Numeric type codes, sorted ascending
    Types(Vec<u16>),
}

/// Returns the verified ICMP type codes for a term.
///
/// An empty `icmp_types` list resolves to [`IcmpMatch::All`] and never fails.
/// Otherwise the term's protocols must be exactly `icmp` or exactly `icmpv6`
/// (ICMP types are meaningless for anything else), the address family has to
/// agree with the protocol (icmp ⇔ IPv4, icmpv6 ⇔ IPv6), and every name must
/// exist in the type table for that family. Codes come back sorted so that
/// repeated renders and value comparisons are deterministic.
pub fn normalize_icmp_types(
    icmp_types: &[String],
    protocols: &[String],
    af: &AfSpec,
    term_name: &str,
) -> Result<IcmpMatch> {
    if icmp_types.is_empty() {
        return Ok(IcmpMatch::All);
    }

    let is_icmp = matches!(protocols, [p] if p == "icmp");
    let is_icmpv6 = matches!(protocols, [p] if p == "icmpv6");
    if !is_icmp && !is_icmpv6 {
        return Err(Error::UnsupportedFilter {
            reason: "icmp-types specified for non-icmp protocols".to_string(),
            term: term_name.to_string(),
            platform: None,
        });
    }

    let af = normalize_address_family(af, term_name)?;
    if (af != 4 && is_icmp) || (af != 6 && is_icmpv6) {
        return Err(Error::MismatchIcmpInet {
            term: term_name.to_string(),
        });
    }

    let mut codes = Vec::with_capacity(icmp_types.len());
    for name in icmp_types {
        match tables::icmp_type_code(af, name) {
            Some(code) => codes.push(code),
            None => {
                return Err(Error::UnknownIcmpType {
                    icmp_type: name.clone(),
                    term: term_name.to_string(),
                });
            }
        }
    }
    codes.sort_unstable();
    Ok(IcmpMatch::Types(codes))
}

/// Direction of an address match on a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum Direction {
    #[strum(serialize = "source")]
    Source,
    #[strum(serialize = "destination")]
    Destination,
}

/// Logs the uniform warning for a term that matches on addresses in one
/// direction but has no addresses of the requested family left.
///
/// Renderers skip such terms; routing the message through one helper keeps
/// the wording identical across backends. Logging only, never fails.
pub fn warn_no_addresses_for_family(term_name: &str, direction: Direction, af: &str) {
    tracing::warn!(
        term = term_name,
        direction = %direction,
        af,
        "term will not be rendered: it has an address match specified but no \
         addresses of this family are present"
    );
}
