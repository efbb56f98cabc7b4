// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory relational store for views, zones and records.
//!
//! The store is an arena of entities keyed by identifier. All derived-link
//! fields (`ptr_record`, `rfc2317_cname_record`) are plain identifiers that
//! the reconcilers recompute; the store itself never cascades.
//!
//! Reads are public and side-effect free. Writes are crate-internal: the
//! only way to mutate a store from outside is through
//! [`crate::engine::Engine`], which stages every mutation on a snapshot and
//! commits only after the consistency check passes.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use hickory_proto::rr::RecordType;
use serde::{Deserialize, Serialize};

use crate::errors::ConsistencyError;
use crate::lookup;
use crate::model::{Record, RecordId, View, ViewId, Zone, ZoneId};
use crate::reverse;

/// The complete authoritative data set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Store {
    views: BTreeMap<ViewId, View>,
    zones: BTreeMap<ZoneId, Zone>,
    records: BTreeMap<RecordId, Record>,
    next_id: u64,
}

impl Store {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ------------------------------------------------------------------
    // Plain entity reads
    // ------------------------------------------------------------------

    /// Look up a view by identifier
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    /// Look up a zone by identifier
    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    /// Look up a record by identifier
    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Iterate all views in identifier order
    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// Iterate all zones in identifier order
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Iterate all records in identifier order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Iterate the records owned by a zone
    pub fn records_in_zone(&self, zone: ZoneId) -> impl Iterator<Item = &Record> {
        self.records.values().filter(move |r| r.zone == zone)
    }

    /// Number of views in the store
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Number of zones in the store
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Number of records in the store
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    // ------------------------------------------------------------------
    // Derived reads
    // ------------------------------------------------------------------

    /// The fully qualified name of a record, with trailing dot
    #[must_use]
    pub fn fqdn(&self, record: RecordId) -> Option<String> {
        let record = self.record(record)?;
        let zone = self.zone(record.zone)?;
        Some(reverse::fqdn(&record.name, &zone.name))
    }

    /// The PTR record derived from an address record, if any
    #[must_use]
    pub fn ptr_record_of(&self, record: RecordId) -> Option<&Record> {
        self.record(record)
            .and_then(|r| r.ptr_record)
            .and_then(|id| self.record(id))
    }

    /// The delegation CNAME referenced by a PTR record, if any
    #[must_use]
    pub fn rfc2317_cname_record_of(&self, ptr: RecordId) -> Option<&Record> {
        self.record(ptr)
            .and_then(|r| r.rfc2317_cname_record)
            .and_then(|id| self.record(id))
    }

    /// The label an address record's PTR carries (or would carry) in its
    /// resolved reverse zone.
    ///
    /// For an RFC2317 zone this is the final octet; for a classful zone it
    /// is the reverse name relative to the zone.
    #[must_use]
    pub fn rfc2317_ptr_name(&self, record: RecordId) -> Option<String> {
        let record = self.record(record)?;
        let addr = record.address()?;
        let view = self.zone(record.zone)?.view;
        let target = lookup::find_reverse_zone(self, addr, view)?;
        lookup::ptr_label_in_zone(self.zone(target)?, addr)
    }

    /// The delegation CNAME name for an address record: its PTR label
    /// computed relative to the classful parent of the resolved RFC2317
    /// zone.
    #[must_use]
    pub fn rfc2317_ptr_cname_name(&self, record: RecordId) -> Option<String> {
        let record = self.record(record)?;
        let addr = record.address()?;
        let view = self.zone(record.zone)?.view;
        let target = lookup::find_reverse_zone(self, addr, view)?;
        if !self.zone(target)?.is_rfc2317() {
            return None;
        }
        let parent = lookup::find_parent_zone(self, target)?;
        let parent_name = reverse::dns_name(&self.zone(parent)?.name).ok()?;
        reverse::relative_label(&reverse::reverse_name(addr), &parent_name)
    }

    /// The classful parent zone of a managed RFC2317 zone.
    ///
    /// Resolved only while `rfc2317_parent_managed` is set; an unmanaged
    /// classless zone has no parent relation even when a candidate exists.
    #[must_use]
    pub fn rfc2317_parent_zone(&self, zone: ZoneId) -> Option<ZoneId> {
        let z = self.zone(zone)?;
        if !z.is_rfc2317() || !z.rfc2317_parent_managed {
            return None;
        }
        lookup::find_parent_zone(self, zone)
    }

    /// The managed RFC2317 zones currently parented by a classful zone
    #[must_use]
    pub fn rfc2317_child_zones(&self, zone: ZoneId) -> Vec<ZoneId> {
        self.zones
            .values()
            .filter(|z| self.rfc2317_parent_zone(z.id) == Some(zone))
            .map(|z| z.id)
            .collect()
    }

    /// The address record an engine-managed PTR was derived from
    #[must_use]
    pub fn source_of_ptr(&self, ptr: RecordId) -> Option<RecordId> {
        self.records
            .values()
            .find(|r| r.ptr_record == Some(ptr))
            .map(|r| r.id)
    }

    /// All PTR records referencing a delegation CNAME
    #[must_use]
    pub fn referencing_ptrs(&self, cname: RecordId) -> Vec<RecordId> {
        self.records
            .values()
            .filter(|r| r.rfc2317_cname_record == Some(cname))
            .map(|r| r.id)
            .collect()
    }

    /// Find the managed delegation CNAME with a given name inside a zone
    #[must_use]
    pub fn managed_cname_in(&self, zone: ZoneId, name: &str) -> Option<RecordId> {
        self.records
            .values()
            .find(|r| {
                r.zone == zone && r.managed && r.rtype == RecordType::CNAME && r.name == name
            })
            .map(|r| r.id)
    }

    // ------------------------------------------------------------------
    // Crate-internal writes
    // ------------------------------------------------------------------

    pub(crate) fn insert_view(&mut self, name: String) -> ViewId {
        let id = ViewId(self.bump());
        self.views.insert(id, View { id, name });
        id
    }

    pub(crate) fn insert_zone(&mut self, mut zone: Zone) -> ZoneId {
        let id = ZoneId(self.bump());
        zone.id = id;
        zone.last_updated = Utc::now();
        self.zones.insert(id, zone);
        id
    }

    pub(crate) fn insert_record(&mut self, mut record: Record) -> RecordId {
        let id = RecordId(self.bump());
        record.id = id;
        record.last_updated = Utc::now();
        self.records.insert(id, record);
        id
    }

    /// Mutable zone access; stamps the audit timestamp
    pub(crate) fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        let zone = self.zones.get_mut(&id)?;
        zone.last_updated = Utc::now();
        Some(zone)
    }

    /// Mutable record access; stamps the audit timestamp
    pub(crate) fn record_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        let record = self.records.get_mut(&id)?;
        record.last_updated = Utc::now();
        Some(record)
    }

    pub(crate) fn remove_view(&mut self, id: ViewId) -> Option<View> {
        self.views.remove(&id)
    }

    pub(crate) fn remove_zone(&mut self, id: ZoneId) -> Option<Zone> {
        self.zones.remove(&id)
    }

    pub(crate) fn remove_record(&mut self, id: RecordId) -> Option<Record> {
        self.records.remove(&id)
    }

    // ------------------------------------------------------------------
    // Invariant checks
    // ------------------------------------------------------------------

    /// Validate the derived-record graph.
    ///
    /// Run by the engine after every mutation cascade, before commit. Any
    /// violation here is a defect in the reconciliation logic, never an
    /// expected runtime condition.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: dangling links, orphaned managed
    /// records, duplicate delegation CNAMEs, or broken entity ownership.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        for zone in self.zones.values() {
            if let Some(view) = zone.view {
                if !self.views.contains_key(&view) {
                    return Err(ConsistencyError::ZoneWithoutView {
                        zone: zone.id,
                        view,
                    });
                }
            }
        }

        let mut cname_names: BTreeSet<(ZoneId, String)> = BTreeSet::new();
        for record in self.records.values() {
            if !self.zones.contains_key(&record.zone) {
                return Err(ConsistencyError::RecordWithoutZone {
                    record: record.id,
                    zone: record.zone,
                });
            }
            if let Some(ptr) = record.ptr_record {
                let valid = self
                    .records
                    .get(&ptr)
                    .is_some_and(|p| p.managed && p.rtype == RecordType::PTR);
                if !valid {
                    return Err(ConsistencyError::DanglingPtrLink {
                        record: record.id,
                        ptr,
                    });
                }
            }
            if let Some(cname) = record.rfc2317_cname_record {
                let valid = self
                    .records
                    .get(&cname)
                    .is_some_and(|c| c.managed && c.rtype == RecordType::CNAME);
                if !valid {
                    return Err(ConsistencyError::DanglingCnameLink {
                        ptr: record.id,
                        cname,
                    });
                }
            }
            if record.managed && record.rtype == RecordType::PTR {
                let sources = self
                    .records
                    .values()
                    .filter(|r| r.ptr_record == Some(record.id))
                    .count();
                if sources != 1 {
                    return Err(ConsistencyError::OrphanPtr {
                        ptr: record.id,
                        sources,
                    });
                }
            }
            if record.managed && record.rtype == RecordType::CNAME {
                if self.referencing_ptrs(record.id).is_empty() {
                    return Err(ConsistencyError::OrphanCname { cname: record.id });
                }
                if !cname_names.insert((record.zone, record.name.clone())) {
                    return Err(ConsistencyError::DuplicateCname {
                        zone: record.zone,
                        name: record.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
