use thiserror::Error;

/// Core error types for aclforge
///
/// Every variant is terminal: each one indicates a policy-authoring mistake
/// or a platform-capability mismatch that a human must fix. The core never
/// retries, recovers partially, or continues past a failed term.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Address family value outside the known set
    #[error("address family {af} is not supported, term {term}")]
    UnsupportedAddressFamily { af: String, term: String },

    /// Keyword, protocol, or ICMP usage invalid for the term/platform/AF combination
    #[error(
        "unsupported filter{}: {reason} (term {term})",
        .platform.as_deref().map(|p| format!(" for target {p}")).unwrap_or_default()
    )]
    UnsupportedFilter {
        reason: String,
        term: String,
        /// Target platform, when the failure is platform-specific
        platform: Option<String>,
    },

    /// Referenced ICMP type name has no mapping for the resolved address family
    #[error("unrecognized ICMP type {icmp_type} specified in term {term}")]
    UnknownIcmpType { icmp_type: String, term: String },

    /// ICMP protocol family and address family disagree (e.g. icmp with IPv6)
    #[error("ICMP/ICMPv6 mismatch with address family IPv4/IPv6 in term {term}")]
    MismatchIcmpInet { term: String },

    /// Established option combined with a non-TCP/UDP protocol on a platform
    /// that cannot express statefulness implicitly
    #[error("established option supplied with inappropriate protocol(s) {protocols:?} in term {term}")]
    EstablishedOption {
        protocols: Vec<String>,
        term: String,
    },

    /// Name cannot fit within the platform maximum even after every enabled
    /// shortening strategy
    #[error(
        "term {name} (originally {original}) is too long: limit is {limit} characters (vs. {length}) \
         and no abbreviations remain or abbreviations disabled"
    )]
    TermNameTooLong {
        name: String,
        original: String,
        limit: usize,
        length: usize,
    },

    /// Two terms in the same filter share a name
    #[error("duplicate term name {term} in filter {filter}")]
    DuplicateTermName { term: String, filter: String },
}

pub type Result<T> = std::result::Result<T, Error>;
