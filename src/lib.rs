//! aclforge - normalization and validation core for multi-platform ACL generation
//!
//! Given an abstract, platform-independent security policy (named filter
//! headers, each owning an ordered list of terms), this crate prepares each
//! term so that any number of platform-specific renderers can emit it without
//! re-deriving cross-cutting correctness rules. Getting these rules wrong
//! produces silently incorrect firewall rules in production networks, so they
//! live in exactly one place.
//!
//! # Architecture
//!
//! - [`tables`] - Static protocol, address-family, ICMP, and abbreviation tables
//! - [`policy`] - The policy object model: terms, headers, filters, port ranges
//! - [`platform`] - Per-platform capability descriptors
//! - [`normalize`] - Stateless address-family and ICMP type normalization
//! - [`generator`] - The keyword validation gate and per-term fix-up operations
//! - [`error`] - Error types for policy and platform mismatches
//!
//! # Invariants
//!
//! - All table data is immutable `static` state, safe to share across
//!   concurrent renderers without synchronization.
//! - The core never mutates a caller's term: fixed variants are independent
//!   deep copies, so one term can be rendered for many platforms.
//! - Every failure is terminal and names the term, the platform, and the
//!   offending values; there is no partial recovery.

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod generator;
pub mod normalize;
pub mod platform;
pub mod policy;
pub mod tables;

// Re-export commonly used types
pub use error::{Error, Result};
pub use generator::Generator;
pub use normalize::{AfSpec, IcmpMatch, normalize_address_family, normalize_icmp_types};
pub use platform::Platform;
pub use policy::{Filter, Header, Policy, PortRange, Term};
pub use tables::AddressFamily;
