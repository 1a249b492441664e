//! Per-platform capability descriptors
//!
//! Each target platform (router, firewall, or packet-filter syntax) declares
//! what it can express through a [`Platform`] value instead of subclassing a
//! generator base: the keywords it recognizes, the address families and
//! protocols it supports, the maximum term-name length it accepts, and
//! whether it treats every protocol as stateful. The shared core consults
//! the descriptor; renderers stay purely mechanical.

use std::collections::{BTreeMap, BTreeSet};

/// Keywords every platform must support
///
/// `name` and `translated` are object attributes rather than policy-language
/// keywords, but they appear on every term and must always validate.
pub const REQUIRED_KEYWORDS: &[&str] = &[
    "action",
    "comment",
    "destination_address",
    "destination_address_exclude",
    "destination_port",
    "icmp_type",
    "name",
    "option",
    "protocol",
    "platform",
    "platform_exclude",
    "source_address",
    "source_address_exclude",
    "source_port",
    "translated",
    "verbatim",
];

/// Default maximum term-name length accepted by a target platform
pub const DEFAULT_TERM_MAX_LENGTH: usize = 62;

/// Capability descriptor for one target platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Platform identifier matched against header and term platform lists
    pub name: String,
    /// Protocol applied when a term declares none
    pub default_protocol: String,
    /// Symbolic address families the platform can render
    pub supported_afs: BTreeSet<String>,
    /// Per-address-family protocols the platform cannot express
    pub filter_blacklist: BTreeMap<String, BTreeSet<String>>,
    /// Optionally supported keywords beyond [`REQUIRED_KEYWORDS`]
    pub optional_keywords: BTreeSet<String>,
    /// Maximum term-name length the platform accepts
    pub term_max_length: usize,
    /// Whether the platform expresses statefulness for every protocol,
    /// making explicit high-port ranges for `established` unnecessary
    pub all_protocols_stateful: bool,
}

impl Platform {
    /// Creates a descriptor with the baseline capabilities shared by all
    /// platforms: `ip` default protocol, `inet`/`inet6` support, no
    /// blacklist, no optional keywords, 62-character names, stateless.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_protocol: "ip".to_string(),
            supported_afs: ["inet", "inet6"].map(String::from).into(),
            filter_blacklist: BTreeMap::new(),
            optional_keywords: BTreeSet::new(),
            term_max_length: DEFAULT_TERM_MAX_LENGTH,
            all_protocols_stateful: false,
        }
    }

    pub fn with_default_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.default_protocol = protocol.into();
        self
    }

    pub fn with_supported_afs<I, S>(mut self, afs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_afs = afs.into_iter().map(Into::into).collect();
        self
    }

    /// Declares protocols the platform cannot express for one address family.
    pub fn with_blacklisted_protocols<I, S>(mut self, af: impl Into<String>, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_blacklist
            .insert(af.into(), protocols.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_optional_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_keywords
            .extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_term_max_length(mut self, length: usize) -> Self {
        self.term_max_length = length;
        self
    }

    pub fn with_all_protocols_stateful(mut self, stateful: bool) -> Self {
        self.all_protocols_stateful = stateful;
        self
    }

    /// Returns `true` if the keyword is valid on this platform: either a
    /// required keyword or one the platform optionally supports.
    pub fn supports_keyword(&self, keyword: &str) -> bool {
        REQUIRED_KEYWORDS.contains(&keyword) || self.optional_keywords.contains(keyword)
    }

    /// Blacklisted protocols for a symbolic address family, if any.
    pub fn blacklisted_protocols(&self, af: &str) -> Option<&BTreeSet<String>> {
        self.filter_blacklist.get(af)
    }
}
