// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reverse zone selection.
//!
//! Given an address and a view, decide which zone owns the reverse mapping:
//! RFC2317 classless zones match first through their delegated prefix
//! (narrowest prefix wins), then ordinary reverse zones through the network
//! implied by their `in-addr.arpa` / `ip6.arpa` name. Views partition the
//! search space: a zone only ever matches records whose own zone lives in
//! the same view (or, for unscoped zones, the global partition).
//!
//! Both lookups are deterministic over the current zone set; re-running
//! them yields the same result unless a mutation changed the candidates.

use std::net::IpAddr;

use ipnet::IpNet;

use crate::model::{ViewId, Zone, ZoneId};
use crate::reverse;
use crate::store::Store;

/// The network a reverse zone's name implies.
///
/// `0.0.10.in-addr.arpa` implies `10.0.0.0/24`, `0.10.in-addr.arpa`
/// implies `10.0.0.0/16`, and nibble-form `ip6.arpa` names imply the
/// corresponding IPv6 network. Returns `None` for forward zones and for
/// reverse-style names that do not parse as an address prefix (such as
/// RFC2317 range labels).
#[must_use]
pub fn implied_network(zone: &Zone) -> Option<IpNet> {
    let name = reverse::dns_name(&zone.name).ok()?;
    name.parse_arpa_name().ok()
}

/// Find the reverse zone owning an address within a view.
///
/// RFC2317 zones whose delegated prefix contains the address take
/// precedence, with the longest prefix winning; otherwise the reverse zone
/// with the longest implied network containing the address is selected.
/// Returns `None` when no zone in the view covers the address, in which
/// case no PTR is derived.
#[must_use]
pub fn find_reverse_zone(store: &Store, addr: IpAddr, view: Option<ViewId>) -> Option<ZoneId> {
    if let IpAddr::V4(v4) = addr {
        let best = store
            .zones()
            .filter(|z| z.view == view)
            .filter_map(|z| z.rfc2317_prefix.map(|prefix| (z, prefix)))
            .filter(|(_, prefix)| prefix.contains(&v4))
            .max_by_key(|(_, prefix)| prefix.prefix_len());
        if let Some((zone, _)) = best {
            return Some(zone.id);
        }
    }

    store
        .zones()
        .filter(|z| z.view == view && !z.is_rfc2317())
        .filter_map(|z| implied_network(z).map(|net| (z, net)))
        .filter(|(_, net)| net.contains(&addr))
        .max_by_key(|(_, net)| net.prefix_len())
        .map(|(zone, _)| zone.id)
}

/// Find the classful parent zone of an RFC2317 zone.
///
/// The parent is the non-RFC2317 reverse zone, in the same view, whose
/// implied network contains the entire delegated prefix; the closest
/// (longest) such network wins. Returns `None` for zones without an RFC2317
/// prefix or when no candidate exists.
#[must_use]
pub fn find_parent_zone(store: &Store, zone: ZoneId) -> Option<ZoneId> {
    let child = store.zone(zone)?;
    let prefix = IpNet::V4(child.rfc2317_prefix?);

    store
        .zones()
        .filter(|z| z.id != zone && z.view == child.view && !z.is_rfc2317())
        .filter_map(|z| implied_network(z).map(|net| (z, net)))
        .filter(|(_, net)| net.contains(&prefix))
        .max_by_key(|(_, net)| net.prefix_len())
        .map(|(parent, _)| parent.id)
}

/// The PTR label an address carries inside a reverse zone.
///
/// RFC2317 zones use the short final-octet label; classful zones use the
/// reverse name relative to the zone. Returns `None` when the zone does not
/// actually cover the address's reverse name.
#[must_use]
pub fn ptr_label_in_zone(zone: &Zone, addr: IpAddr) -> Option<String> {
    if zone.is_rfc2317() {
        match addr {
            IpAddr::V4(v4) => Some(reverse::rfc2317_label(v4)),
            IpAddr::V6(_) => None,
        }
    } else {
        let zone_name = reverse::dns_name(&zone.name).ok()?;
        reverse::relative_label(&reverse::reverse_name(addr), &zone_name)
    }
}

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod lookup_tests;
