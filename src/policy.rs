//! Policy object model consumed by the generator core
//!
//! This module defines the platform-independent policy graph: a [`Policy`]
//! holds [`Filter`]s, each pairing a [`Header`] (name plus target platforms)
//! with an ordered list of [`Term`]s. The core reads these structures as
//! opaque data; it never mutates a caller's term in place. When a fixed
//! variant is needed (see [`crate::generator::Generator::fix_high_ports`]),
//! an independent deep copy is produced instead, because a single term may be
//! rendered for multiple platforms with different fix-up outcomes.

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{Error, Result};

/// Prefix marking internal, implementation-owned term fields.
///
/// Fields with this prefix bypass keyword validation: they are written by the
/// compiler pipeline itself, not by policy authors.
pub const INTERNAL_FIELD_PREFIX: &str = "flatten";

/// Closed interval of 16-bit port numbers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub const fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Collapses a port list into the minimal sorted sequence of disjoint,
/// non-adjacent ranges covering the same set of ports.
///
/// Ranges are sorted by lower bound, then any range whose lower bound is at
/// most one past the previous range's upper bound is merged into it. The
/// operation is idempotent: collapsing an already-collapsed list returns the
/// same list.
pub fn collapse_port_list(ports: &[PortRange]) -> Vec<PortRange> {
    let mut sorted = ports.to_vec();
    sorted.sort_unstable();

    let mut collapsed: Vec<PortRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match collapsed.last_mut() {
            // u32 arithmetic so end = 65535 cannot overflow the adjacency check
            Some(prev) if u32::from(range.start) <= u32::from(prev.end) + 1 => {
                prev.end = prev.end.max(range.end);
            }
            _ => collapsed.push(range),
        }
    }
    collapsed
}

/// A single match-condition plus action rule within a filter
///
/// Field names double as the keyword names checked by the platform keyword
/// validator, so they follow the policy language vocabulary rather than Rust
/// naming preferences. Unknown or experimental attributes go in [`extra`];
/// keys there starting with [`INTERNAL_FIELD_PREFIX`] are reserved for the
/// pipeline and always pass validation.
///
/// [`extra`]: Term::extra
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    /// Term name, unique within its filter
    pub name: String,
    /// Declared protocols; empty means the platform default protocol
    #[serde(default)]
    pub protocol: Vec<String>,
    /// Option flags such as `established`
    #[serde(default)]
    pub option: Vec<String>,
    #[serde(default)]
    pub action: Vec<String>,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default)]
    pub icmp_type: Vec<String>,
    #[serde(default)]
    pub source_address: Vec<IpNetwork>,
    #[serde(default)]
    pub source_address_exclude: Vec<IpNetwork>,
    #[serde(default)]
    pub destination_address: Vec<IpNetwork>,
    #[serde(default)]
    pub destination_address_exclude: Vec<IpNetwork>,
    #[serde(default)]
    pub source_port: Vec<PortRange>,
    #[serde(default)]
    pub destination_port: Vec<PortRange>,
    /// Platform allow-list; a non-empty list gates the term to those targets
    #[serde(default)]
    pub platform: Vec<String>,
    /// Platforms the term must never be rendered for
    #[serde(default)]
    pub platform_exclude: Vec<String>,
    /// Pre-rendered output fragments passed through untouched
    #[serde(default)]
    pub verbatim: Vec<String>,
    /// Set once the term has been translated for a target
    #[serde(default)]
    pub translated: bool,
    /// Free-form attributes not covered by the fixed fields
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Term {
    /// Creates an empty term with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the names of all populated (truthy) fields.
    ///
    /// This is the introspection surface the per-platform keyword validator
    /// consumes: every returned name must be a keyword the target platform
    /// recognizes, except names carrying [`INTERNAL_FIELD_PREFIX`].
    pub fn populated_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        if !self.name.is_empty() {
            fields.push("name");
        }
        if !self.protocol.is_empty() {
            fields.push("protocol");
        }
        if !self.option.is_empty() {
            fields.push("option");
        }
        if !self.action.is_empty() {
            fields.push("action");
        }
        if !self.comment.is_empty() {
            fields.push("comment");
        }
        if !self.icmp_type.is_empty() {
            fields.push("icmp_type");
        }
        if !self.source_address.is_empty() {
            fields.push("source_address");
        }
        if !self.source_address_exclude.is_empty() {
            fields.push("source_address_exclude");
        }
        if !self.destination_address.is_empty() {
            fields.push("destination_address");
        }
        if !self.destination_address_exclude.is_empty() {
            fields.push("destination_address_exclude");
        }
        if !self.source_port.is_empty() {
            fields.push("source_port");
        }
        if !self.destination_port.is_empty() {
            fields.push("destination_port");
        }
        if !self.platform.is_empty() {
            fields.push("platform");
        }
        if !self.platform_exclude.is_empty() {
            fields.push("platform_exclude");
        }
        if !self.verbatim.is_empty() {
            fields.push("verbatim");
        }
        if self.translated {
            fields.push("translated");
        }
        for (key, value) in &self.extra {
            if !value.is_empty() {
                fields.push(key.as_str());
            }
        }
        fields
    }
}

/// Filter header: name plus the platforms the filter targets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    /// Target platform identifiers this filter applies to
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Filter-level options (e.g. the address family of the filter)
    #[serde(default)]
    pub options: Vec<String>,
}

impl Header {
    pub fn new(name: impl Into<String>, platforms: Vec<String>) -> Self {
        Self {
            name: name.into(),
            platforms,
            options: Vec::new(),
        }
    }
}

/// A named, ordered collection of terms applied on a platform
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Filter {
    pub header: Header,
    #[serde(default)]
    pub terms: Vec<Term>,
}

impl Filter {
    /// Fails with [`Error::DuplicateTermName`] if two terms share a name.
    ///
    /// Term names key renderer output, so a collision would silently merge
    /// two unrelated rules on the device.
    pub fn ensure_unique_term_names(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for term in &self.terms {
            if !seen.insert(term.name.as_str()) {
                return Err(Error::DuplicateTermName {
                    term: term.name.clone(),
                    filter: self.header.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The full platform-independent policy: an ordered list of filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Policy {
    pub filters: Vec<Filter>,
}

impl Policy {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_range() -> impl Strategy<Value = PortRange> {
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| PortRange::new(a.min(b), a.max(b)))
    }

    proptest! {
        #[test]
        fn test_collapse_output_sorted_and_disjoint(ranges in prop::collection::vec(arb_range(), 0..32)) {
            let collapsed = collapse_port_list(&ranges);
            for pair in collapsed.windows(2) {
                prop_assert!(pair[0].end < u16::MAX);
                // strictly non-adjacent: a gap of at least one port remains
                prop_assert!(u32::from(pair[1].start) > u32::from(pair[0].end) + 1);
            }
        }

        #[test]
        fn test_collapse_preserves_coverage(ranges in prop::collection::vec(arb_range(), 0..16)) {
            let collapsed = collapse_port_list(&ranges);
            // every input endpoint stays covered
            for r in &ranges {
                prop_assert!(collapsed.iter().any(|c| c.start <= r.start && r.start <= c.end));
                prop_assert!(collapsed.iter().any(|c| c.start <= r.end && r.end <= c.end));
            }
            // and nothing outside the inputs is covered
            for c in &collapsed {
                prop_assert!(ranges.iter().any(|r| r.start == c.start));
                prop_assert!(ranges.iter().any(|r| r.end == c.end || c.end >= r.end));
            }
        }

        #[test]
        fn test_collapse_idempotent(ranges in prop::collection::vec(arb_range(), 0..32)) {
            let once = collapse_port_list(&ranges);
            prop_assert_eq!(collapse_port_list(&once), once);
        }
    }
}
