// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TTL propagation between primary and derived records.
//!
//! A PTR record always mirrors its source record's TTL, including the
//! "no explicit TTL, inherit the zone default" state (`None`), which is
//! propagated as `None` and never resolved to a number by the engine.
//!
//! A delegation CNAME is shared by every PTR mapping to the same name, so
//! its TTL cannot simply mirror one source. The rule: the PTR most recently
//! saved wins when it carries an explicit TTL; a PTR saved without one
//! defers to the tightest (lowest) explicit TTL among the other referencing
//! PTRs; the CNAME drops to `None` only when no referencing PTR carries an
//! explicit TTL at all.

use crate::model::RecordId;
use crate::store::Store;

/// Compute the TTL a shared delegation CNAME should carry.
///
/// `just_saved` names the PTR whose save triggered the recomputation, if
/// any; pass `None` when a reference was released and only the remaining
/// referencers should be considered.
#[must_use]
pub(crate) fn shared_cname_ttl(
    store: &Store,
    cname: RecordId,
    just_saved: Option<RecordId>,
) -> Option<u32> {
    if let Some(saved) = just_saved {
        if let Some(ttl) = store.record(saved).and_then(|r| r.ttl) {
            return Some(ttl);
        }
    }

    store
        .referencing_ptrs(cname)
        .into_iter()
        .filter_map(|id| store.record(id))
        .filter_map(|r| r.ttl)
        .min()
}

#[cfg(test)]
#[path = "ttl_tests.rs"]
mod ttl_tests;
