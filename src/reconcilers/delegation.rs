// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Delegation CNAME reconciliation.
//!
//! When an RFC2317 zone declares its classful parent as managed, the parent
//! zone carries one canonical CNAME per delegated PTR name, pointing the
//! classful reverse name at the PTR inside the classless zone:
//!
//! ```text
//! 1.0.0.10.in-addr.arpa.  CNAME  1.0-15.0.0.10.in-addr.arpa.
//! ```
//!
//! Several address records can map to the same address and therefore to the
//! same delegated name; they share a single CNAME. The CNAME is created on
//! first acquisition, retargeted when the parent or the label changes, and
//! deleted only when the last referencing PTR lets go.

use std::net::IpAddr;

use chrono::Utc;
use hickory_proto::rr::RecordType;
use tracing::debug;

use super::ttl;
use crate::lookup;
use crate::model::{Record, RecordId, RecordStatus, ZoneId};
use crate::reverse;
use crate::store::Store;

/// Bring the delegation CNAME of one PTR record in line with the current
/// zone graph.
///
/// Resolves where the CNAME should live (managed parent of the PTR's zone,
/// label relative to that parent); then reuses, retargets, creates or
/// releases as needed. Invoked after every PTR placement.
pub(crate) fn sync(store: &mut Store, ptr_id: RecordId, addr: IpAddr) {
    let Some(ptr) = store.record(ptr_id) else {
        return;
    };
    let current = ptr.rfc2317_cname_record;
    let ptr_zone = ptr.zone;

    let desired = desired_location(store, ptr_zone, addr);

    let current_location = current
        .and_then(|id| store.record(id))
        .map(|c| (c.id, c.zone, c.name.clone()));

    match (current_location, desired) {
        (Some((cname_id, zone, name)), Some((want_zone, want_name)))
            if zone == want_zone && name == want_name =>
        {
            refresh(store, cname_id, ptr_id);
        }
        (current_location, desired) => {
            if current_location.is_some() {
                release(store, ptr_id);
            }
            if let Some((zone, name)) = desired {
                acquire(store, ptr_id, zone, name);
            }
        }
    }
}

/// Drop a PTR's reference to its delegation CNAME.
///
/// The CNAME itself is deleted only when no other PTR still references it;
/// otherwise its TTL is recomputed from the remaining referencers.
pub(crate) fn release(store: &mut Store, ptr_id: RecordId) {
    let Some(cname_id) = store.record(ptr_id).and_then(|p| p.rfc2317_cname_record) else {
        return;
    };
    if let Some(ptr) = store.record_mut(ptr_id) {
        ptr.rfc2317_cname_record = None;
    }

    if store.referencing_ptrs(cname_id).is_empty() {
        store.remove_record(cname_id);
        debug!(ptr = %ptr_id, cname = %cname_id, "Removed delegation CNAME with no remaining referencers");
    } else {
        let new_ttl = ttl::shared_cname_ttl(store, cname_id, None);
        if let Some(cname) = store.record_mut(cname_id) {
            cname.ttl = new_ttl;
        }
        debug!(ptr = %ptr_id, cname = %cname_id, "Released shared delegation CNAME");
    }
}

/// Where the delegation CNAME for a PTR in `ptr_zone` should live, if
/// anywhere: the resolved parent zone and the label relative to it.
fn desired_location(store: &Store, ptr_zone: ZoneId, addr: IpAddr) -> Option<(ZoneId, String)> {
    let zone = store.zone(ptr_zone)?;
    if !zone.is_rfc2317() || !zone.rfc2317_parent_managed {
        return None;
    }
    let parent_id = lookup::find_parent_zone(store, ptr_zone)?;
    let parent_name = reverse::dns_name(&store.zone(parent_id)?.name).ok()?;
    let label = reverse::relative_label(&reverse::reverse_name(addr), &parent_name)?;
    Some((parent_id, label))
}

/// Update a CNAME already linked to this PTR: value follows the PTR fqdn,
/// TTL follows the propagation rules.
fn refresh(store: &mut Store, cname_id: RecordId, ptr_id: RecordId) {
    let value = store.fqdn(ptr_id);
    let new_ttl = ttl::shared_cname_ttl(store, cname_id, Some(ptr_id));
    if let Some(cname) = store.record_mut(cname_id) {
        if let Some(value) = value {
            cname.value = value;
        }
        cname.ttl = new_ttl;
    }
}

/// Point a PTR at the delegation CNAME for `(zone, name)`, sharing an
/// existing managed CNAME when one is present and creating it otherwise.
fn acquire(store: &mut Store, ptr_id: RecordId, zone: ZoneId, name: String) {
    let Some(value) = store.fqdn(ptr_id) else {
        return;
    };

    if let Some(cname_id) = store.managed_cname_in(zone, &name) {
        if let Some(ptr) = store.record_mut(ptr_id) {
            ptr.rfc2317_cname_record = Some(cname_id);
        }
        refresh(store, cname_id, ptr_id);
        debug!(ptr = %ptr_id, cname = %cname_id, zone = %zone, "Sharing existing delegation CNAME");
    } else {
        let ttl = store.record(ptr_id).and_then(|p| p.ttl);
        let cname_id = store.insert_record(Record {
            id: RecordId(0),
            zone,
            name,
            rtype: RecordType::CNAME,
            value,
            ttl,
            status: RecordStatus::Active,
            disable_ptr: false,
            managed: true,
            ptr_record: None,
            rfc2317_cname_record: None,
            last_updated: Utc::now(),
        });
        if let Some(ptr) = store.record_mut(ptr_id) {
            ptr.rfc2317_cname_record = Some(cname_id);
        }
        debug!(ptr = %ptr_id, cname = %cname_id, zone = %zone, "Created delegation CNAME");
    }
}

#[cfg(test)]
#[path = "delegation_tests.rs"]
mod delegation_tests;
