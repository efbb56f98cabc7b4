// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reverse DNS name resolution.
//!
//! Pure name arithmetic shared by the lookup layer and the reconcilers:
//! canonical reverse names for IPv4/IPv6 addresses, RFC2317 short labels,
//! and relative labels of a name under an owning zone. No store access and
//! no side effects.

use std::net::{IpAddr, Ipv4Addr};

use hickory_proto::error::ProtoError;
use hickory_proto::rr::Name;

use crate::constants::APEX_LABEL;

/// Parse a zone or host name into a fully qualified [`Name`].
///
/// Accepts names with or without the trailing dot; the result is always
/// marked fully qualified so ancestor checks behave consistently.
///
/// # Errors
///
/// Returns an error if the name is not a well-formed DNS name.
pub fn dns_name(name: &str) -> Result<Name, ProtoError> {
    let mut parsed = Name::from_ascii(name)?;
    parsed.set_fqdn(true);
    Ok(parsed)
}

/// The canonical reverse DNS name of an address.
///
/// IPv4 addresses map into `in-addr.arpa` with reversed octets; IPv6
/// addresses map into `ip6.arpa` with reversed nibbles.
#[must_use]
pub fn reverse_name(addr: IpAddr) -> Name {
    Name::from(addr)
}

/// The RFC2317 short PTR label of an IPv4 address within a classless
/// prefix.
///
/// Classless delegation only subdivides the final octet, so the label is
/// that octet in decimal: `10.0.0.21` yields `21` whether the owning prefix
/// is `10.0.0.16/28` or `10.0.0.0/25`.
#[must_use]
pub fn rfc2317_label(addr: Ipv4Addr) -> String {
    addr.octets()[3].to_string()
}

/// The labels of `name` not already covered by `zone`, joined with dots.
///
/// Returns `None` when `zone` is not a proper ancestor of `name`. This is
/// the relative PTR name within a classful reverse zone: the reverse name
/// of `10.0.0.1` yields `1` under `0.0.10.in-addr.arpa` and `1.0` under
/// `0.10.in-addr.arpa`.
#[must_use]
pub fn relative_label(name: &Name, zone: &Name) -> Option<String> {
    if !zone.zone_of(name) || name.num_labels() <= zone.num_labels() {
        return None;
    }
    let keep = usize::from(name.num_labels() - zone.num_labels());
    let labels: Vec<String> = name
        .iter()
        .take(keep)
        .map(|label| String::from_utf8_lossy(label).to_ascii_lowercase())
        .collect();
    Some(labels.join("."))
}

/// Assemble the fully qualified name of a record, with trailing dot.
///
/// The apex label `@` (or an empty name) yields the zone name itself.
#[must_use]
pub fn fqdn(record_name: &str, zone_name: &str) -> String {
    if record_name == APEX_LABEL || record_name.is_empty() {
        format!("{zone_name}.")
    } else {
        format!("{record_name}.{zone_name}.")
    }
}

#[cfg(test)]
#[path = "reverse_tests.rs"]
mod reverse_tests;
