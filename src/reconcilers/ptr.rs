// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PTR record reconciliation.
//!
//! Every active address record with PTR derivation enabled owns exactly one
//! managed PTR record, placed in the reverse zone selected by
//! [`crate::lookup::find_reverse_zone`]. This module keeps that pairing
//! true across value changes, zone reshuffles and record removal.
//!
//! The delegation CNAME cascade ([`super::delegation`]) runs after every
//! PTR placement so the classful parent zone stays in step.

use std::net::IpAddr;

use chrono::Utc;
use hickory_proto::rr::RecordType;
use tracing::debug;

use super::delegation;
use crate::config::EngineConfig;
use crate::lookup;
use crate::model::{Record, RecordId, RecordStatus, ZoneId};
use crate::store::Store;

/// Re-evaluate the PTR pairing of one record.
///
/// Safe to call for any record: managed records and records that are not
/// address-typed (or are inactive, or have `disable_ptr`) simply end up
/// with no PTR, removing a stale one if present. When the resolved reverse
/// zone matches the existing PTR's zone the PTR is updated in place, which
/// preserves its delegation CNAME linkage across value and TTL edits.
pub(crate) fn sync(store: &mut Store, config: &EngineConfig, record_id: RecordId) {
    let Some(record) = store.record(record_id) else {
        return;
    };
    if record.managed {
        return;
    }

    let current_ptr = record.ptr_record;
    let addr = record.address();
    let eligible = config.auto_create_ptr_records && record.is_active() && !record.disable_ptr;
    let view = store.zone(record.zone).and_then(|z| z.view);

    let target = match (addr, eligible) {
        (Some(addr), true) => lookup::find_reverse_zone(store, addr, view),
        _ => None,
    };

    match (target, addr) {
        (Some(zone), Some(addr)) => place(store, record_id, zone, addr),
        _ => {
            if current_ptr.is_some() {
                remove(store, record_id);
            }
        }
    }
}

/// Delete the PTR derived from a record, if any, releasing its delegation
/// CNAME reference first.
pub(crate) fn remove(store: &mut Store, record_id: RecordId) {
    let Some(ptr_id) = store.record(record_id).and_then(|r| r.ptr_record) else {
        return;
    };
    delegation::release(store, ptr_id);
    store.remove_record(ptr_id);
    if let Some(source) = store.record_mut(record_id) {
        source.ptr_record = None;
    }
    debug!(source = %record_id, ptr = %ptr_id, "Removed derived PTR record");
}

/// Place or update the PTR for an address record in its resolved zone.
fn place(store: &mut Store, record_id: RecordId, target_zone: ZoneId, addr: IpAddr) {
    let label = store
        .zone(target_zone)
        .and_then(|zone| lookup::ptr_label_in_zone(zone, addr));
    let Some(label) = label else {
        // The selected zone does not actually cover the reverse name;
        // treat it as unresolvable.
        remove(store, record_id);
        return;
    };

    let Some(value) = store.fqdn(record_id) else {
        return;
    };
    let ttl = store.record(record_id).and_then(|r| r.ttl);
    let current_ptr = store.record(record_id).and_then(|r| r.ptr_record);
    let current_zone = current_ptr.and_then(|id| store.record(id)).map(|p| p.zone);

    match current_ptr {
        Some(ptr_id) if current_zone == Some(target_zone) => {
            if let Some(ptr) = store.record_mut(ptr_id) {
                ptr.name = label;
                ptr.value = value;
                ptr.ttl = ttl;
            }
            debug!(source = %record_id, ptr = %ptr_id, zone = %target_zone, "Updated derived PTR record in place");
            delegation::sync(store, ptr_id, addr);
        }
        stale => {
            if stale.is_some() {
                remove(store, record_id);
            }
            let ptr_id = store.insert_record(Record {
                id: RecordId(0),
                zone: target_zone,
                name: label,
                rtype: RecordType::PTR,
                value,
                ttl,
                status: RecordStatus::Active,
                disable_ptr: false,
                managed: true,
                ptr_record: None,
                rfc2317_cname_record: None,
                last_updated: Utc::now(),
            });
            if let Some(source) = store.record_mut(record_id) {
                source.ptr_record = Some(ptr_id);
            }
            debug!(source = %record_id, ptr = %ptr_id, zone = %target_zone, "Created derived PTR record");
            delegation::sync(store, ptr_id, addr);
        }
    }
}

#[cfg(test)]
#[path = "ptr_tests.rs"]
mod ptr_tests;
