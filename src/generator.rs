//! Platform generator: keyword gate and term fix-up operations
//!
//! A [`Generator`] binds a [`Policy`] to one target [`Platform`]. Building
//! one runs the keyword validation gate over every filter targeting that
//! platform, so a generator that exists is a generator whose policy only uses
//! keywords the platform understands. The remaining operations -
//! [`fix_high_ports`] and [`fix_term_length`] - are called by the renderer
//! per term while emitting output.
//!
//! [`fix_high_ports`]: Generator::fix_high_ports
//! [`fix_term_length`]: Generator::fix_term_length

use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::policy::{INTERNAL_FIELD_PREFIX, Policy, PortRange, Term, collapse_port_list};
use crate::tables::ABBREVIATIONS;

/// High-port range appended for `established` return traffic
const ESTABLISHED_HIGH_PORTS: PortRange = PortRange::new(1024, 65535);

/// A policy bound to one target platform, validated at construction
#[derive(Debug, Clone)]
pub struct Generator {
    policy: Policy,
    platform: Platform,
}

impl Generator {
    /// Validates the policy against the platform and stores both.
    ///
    /// Every filter whose header lists the target platform is checked,
    /// however many headers do so. A term is skipped entirely when its own
    /// platform allow-list excludes the target or its exclude-list includes
    /// it; these two gates are independent. For every other term, each
    /// populated field must be a keyword the platform recognizes (fields
    /// carrying the internal prefix are always permitted).
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateTermName`] if a filter reuses a term name, or
    /// [`Error::UnsupportedFilter`] naming the term, the platform, and the
    /// complete list of offending fields - all of them, so the operator gets
    /// one actionable error instead of one-at-a-time discovery.
    pub fn new(policy: Policy, platform: Platform) -> Result<Self> {
        let mut terms_checked = 0usize;
        let mut terms_skipped = 0usize;

        for filter in &policy.filters {
            if !filter.header.platforms.iter().any(|p| *p == platform.name) {
                continue;
            }
            filter.ensure_unique_term_names()?;

            for term in &filter.terms {
                if !term.platform.is_empty() && !term.platform.iter().any(|p| *p == platform.name)
                {
                    terms_skipped += 1;
                    continue;
                }
                if term.platform_exclude.iter().any(|p| *p == platform.name) {
                    terms_skipped += 1;
                    continue;
                }

                let offending: Vec<&str> = term
                    .populated_fields()
                    .into_iter()
                    .filter(|field| {
                        !field.starts_with(INTERNAL_FIELD_PREFIX)
                            && !platform.supports_keyword(field)
                    })
                    .collect();
                if !offending.is_empty() {
                    return Err(Error::UnsupportedFilter {
                        reason: format!(
                            "unsupported optional keywords in policy: {}",
                            offending.join(" ")
                        ),
                        term: term.name.clone(),
                        platform: Some(platform.name.clone()),
                    });
                }
                terms_checked += 1;
            }
        }

        debug!(
            platform = %platform.name,
            terms_checked,
            terms_skipped,
            "keyword validation passed"
        );
        Ok(Self { policy, platform })
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Evaluates protocols and ports of a term, returning a sane version.
    ///
    /// Stateless packet-filter targets need an explicit high-port destination
    /// range to express TCP/UDP `established` return traffic. When the term
    /// carries an `established`-style option and all its effective protocols
    /// are TCP or UDP, this returns an independent copy with `1024-65535`
    /// appended to the destination ports and the list collapsed; the caller's
    /// term is never touched. Terms without the option come back borrowed, so
    /// the common path allocates nothing.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedAddressFamily`] if `af` is not one the platform
    /// supports, [`Error::UnsupportedFilter`] if the effective protocols hit
    /// the platform's per-family blacklist, and [`Error::EstablishedOption`]
    /// if `established` is combined with a non-TCP/UDP protocol on a platform
    /// that is not universally stateful.
    pub fn fix_high_ports<'t>(&self, term: &'t Term, af: &str) -> Result<Cow<'t, Term>> {
        let protocols: BTreeSet<&str> = if term.protocol.is_empty() {
            std::iter::once(self.platform.default_protocol.as_str()).collect()
        } else {
            term.protocol.iter().map(String::as_str).collect()
        };

        if !self.platform.supported_afs.contains(af) {
            return Err(Error::UnsupportedAddressFamily {
                af: af.to_string(),
                term: term.name.clone(),
            });
        }

        if let Some(blacklist) = self.platform.blacklisted_protocols(af) {
            let unsupported: Vec<&str> = protocols
                .iter()
                .copied()
                .filter(|p| blacklist.contains(*p))
                .collect();
            if !unsupported.is_empty() {
                return Err(Error::UnsupportedFilter {
                    reason: format!(
                        "protocol(s) {} not supported with address family {af}",
                        unsupported.join(" ")
                    ),
                    term: term.name.clone(),
                    platform: Some(self.platform.name.clone()),
                });
            }
        }

        // Many renderers expect high ports for terms with the established
        // option; only the first matching option triggers the fix-up.
        for opt in &term.option {
            if opt.starts_with("established") {
                let unstateful: Vec<String> = protocols
                    .iter()
                    .copied()
                    .filter(|p| *p != "tcp" && *p != "udp")
                    .map(String::from)
                    .collect();
                if unstateful.is_empty() {
                    let mut fixed = term.clone();
                    fixed.destination_port.push(ESTABLISHED_HIGH_PORTS);
                    fixed.destination_port = collapse_port_list(&fixed.destination_port);
                    return Ok(Cow::Owned(fixed));
                } else if !self.platform.all_protocols_stateful {
                    return Err(Error::EstablishedOption {
                        protocols: unstateful,
                        term: term.name.clone(),
                    });
                }
                // Universally stateful platform: no explicit high ports needed.
                break;
            }
        }

        Ok(Cow::Borrowed(term))
    }

    /// Returns a term name no longer than the platform maximum.
    ///
    /// A name that already fits comes back unchanged regardless of flags.
    /// With `abbreviate`, the abbreviation table is applied in its fixed
    /// priority order - each entry replaces every occurrence of its long
    /// form, and the length is re-checked before each entry so the first
    /// fitting result is returned immediately. With `truncate`, the possibly
    /// abbreviated name is then hard-cut to the maximum.
    ///
    /// Deterministic: the same input and flags always produce the same name.
    ///
    /// # Errors
    ///
    /// [`Error::TermNameTooLong`] when the name still exceeds the maximum
    /// after every enabled strategy; an over-length name would be rejected or
    /// silently mangled by the target platform.
    pub fn fix_term_length(&self, name: &str, abbreviate: bool, truncate: bool) -> Result<String> {
        let limit = self.platform.term_max_length;
        let mut fitted = name.to_string();

        if abbreviate {
            for (word, abbrev) in ABBREVIATIONS {
                if fitted.len() <= limit {
                    return Ok(fitted);
                }
                fitted = fitted.replace(word, abbrev);
            }
        }
        if truncate && fitted.len() > limit {
            let mut cut = limit;
            while !fitted.is_char_boundary(cut) {
                cut -= 1;
            }
            fitted.truncate(cut);
        }
        if fitted.len() <= limit {
            return Ok(fitted);
        }

        Err(Error::TermNameTooLong {
            length: fitted.len(),
            name: fitted,
            original: name.to_string(),
            limit,
        })
    }
}
