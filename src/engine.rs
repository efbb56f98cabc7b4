// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The mutation interface and reconciliation trigger.
//!
//! All external writes funnel through [`Engine::apply`] (or the typed
//! convenience wrappers around it). Each mutation is staged on a snapshot
//! of the store; validation, the reconciliation cascade and the consistency
//! check all run against the snapshot, and the live store is replaced only
//! on success. A failed mutation therefore leaves no partial state behind.
//!
//! Ordering per mutation, always inside one unit of work:
//!
//! 1. validate and apply the primary change
//! 2. re-evaluate the PTR pairing of every affected address record
//!    (structural zone changes re-scan the whole affected view)
//! 3. delegation CNAME and TTL propagation run inside the PTR cascade
//! 4. orphan sweep after structural zone changes
//! 5. consistency check, then commit
//!
//! The reconcilers write managed records through crate-internal store
//! operations and never re-enter this interface, so the trigger cannot
//! recurse; direct mutations of managed records are additionally rejected
//! here with a validation error.

use std::collections::BTreeSet;
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::Utc;
use hickory_proto::rr::RecordType;
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::constants::{APEX_LABEL, RFC2317_MAX_PREFIX_LENGTH, RFC2317_MIN_PREFIX_LENGTH};
use crate::errors::{EngineError, ValidationError};
use crate::lookup;
use crate::model::{Record, RecordId, RecordStatus, ViewId, Zone, ZoneId};
use crate::reconcilers::{delegation, ptr};
use crate::reverse;
use crate::store::Store;

/// Payload for zone creation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewZone {
    /// Zone name, without trailing dot
    pub name: String,
    /// View scope; `None` for the global partition
    #[serde(default)]
    pub view: Option<ViewId>,
    /// Zone default TTL; falls back to the configured default
    #[serde(default)]
    pub default_ttl: Option<u32>,
    /// Classless reverse delegation prefix
    #[serde(default)]
    pub rfc2317_prefix: Option<Ipv4Net>,
    /// Whether the classful parent zone carries delegation CNAMEs
    #[serde(default)]
    pub rfc2317_parent_managed: bool,
}

/// Partial update of a zone; `None` fields are left untouched.
///
/// Option-of-Option fields distinguish "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZoneChange {
    /// Rename the zone
    #[serde(default)]
    pub name: Option<String>,
    /// Move the zone to another view (or the global partition)
    #[serde(default)]
    pub view: Option<Option<ViewId>>,
    /// Change the zone default TTL
    #[serde(default)]
    pub default_ttl: Option<u32>,
    /// Set or clear the classless reverse delegation prefix
    #[serde(default)]
    pub rfc2317_prefix: Option<Option<Ipv4Net>>,
    /// Toggle delegation CNAME maintenance in the classful parent
    #[serde(default)]
    pub rfc2317_parent_managed: Option<bool>,
}

/// Payload for record creation. Records created through the mutation
/// interface are never managed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewRecord {
    /// Owning zone
    pub zone: ZoneId,
    /// Relative record name; `@` for the zone apex
    pub name: String,
    /// Record type
    pub rtype: RecordType,
    /// Record data in textual form
    pub value: String,
    /// Explicit TTL; `None` inherits the zone default
    #[serde(default)]
    pub ttl: Option<u32>,
    /// Lifecycle status
    #[serde(default)]
    pub status: RecordStatus,
    /// Suppress PTR derivation for this address record
    #[serde(default)]
    pub disable_ptr: bool,
}

impl Default for NewRecord {
    fn default() -> Self {
        Self {
            zone: ZoneId(0),
            name: String::new(),
            rtype: RecordType::A,
            value: String::new(),
            ttl: None,
            status: RecordStatus::Active,
            disable_ptr: false,
        }
    }
}

/// Partial update of a record; `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordChange {
    /// Rename the record
    #[serde(default)]
    pub name: Option<String>,
    /// Change the record type
    #[serde(default)]
    pub rtype: Option<RecordType>,
    /// Change the record data
    #[serde(default)]
    pub value: Option<String>,
    /// Set (`Some(Some(_))`) or clear (`Some(None)`) the explicit TTL
    #[serde(default)]
    pub ttl: Option<Option<u32>>,
    /// Change the lifecycle status
    #[serde(default)]
    pub status: Option<RecordStatus>,
    /// Toggle PTR suppression
    #[serde(default)]
    pub disable_ptr: Option<bool>,
}

/// A single external write against the data set.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// Create a view
    CreateView {
        /// View name
        name: String,
    },
    /// Delete a view; rejected while zones reference it
    DeleteView {
        /// View to delete
        view: ViewId,
    },
    /// Create a zone
    CreateZone(NewZone),
    /// Update zone attributes
    UpdateZone {
        /// Zone to update
        zone: ZoneId,
        /// Attribute changes
        change: ZoneChange,
    },
    /// Delete a zone and every record it owns
    DeleteZone {
        /// Zone to delete
        zone: ZoneId,
    },
    /// Create a record
    CreateRecord(NewRecord),
    /// Update record attributes
    UpdateRecord {
        /// Record to update
        record: RecordId,
        /// Attribute changes
        change: RecordChange,
    },
    /// Delete a record
    DeleteRecord {
        /// Record to delete
        record: RecordId,
    },
}

/// The primary entity a successful mutation touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Applied {
    /// A view was created
    View(ViewId),
    /// A zone was created
    Zone(ZoneId),
    /// A record was created
    Record(RecordId),
    /// An existing entity was updated
    Updated,
    /// An entity was deleted
    Removed,
}

/// The reconciliation engine: configuration plus the live store.
///
/// # Example
///
/// ```rust
/// use revzone::config::EngineConfig;
/// use revzone::engine::{Engine, NewZone};
///
/// let mut engine = Engine::new(EngineConfig::default());
/// let zone = engine
///     .add_zone(NewZone {
///         name: "example.com".to_string(),
///         ..NewZone::default()
///     })
///     .expect("zone creation failed");
/// assert!(engine.store().zone(zone).is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    config: EngineConfig,
    store: Store,
}

impl Engine {
    /// Create an engine over an empty store
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            store: Store::new(),
        }
    }

    /// Create an engine over an existing data set (e.g. loaded from disk).
    ///
    /// The data set is taken as-is; run [`Store::check_consistency`] first
    /// when the provenance is untrusted.
    #[must_use]
    pub fn with_store(config: EngineConfig, store: Store) -> Self {
        Self { config, store }
    }

    /// The injected configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the live store
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Consume the engine, yielding the store for serialization
    #[must_use]
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Stage a unit of work on a snapshot; commit only if the closure and
    /// the consistency check both succeed.
    fn commit_with<T>(
        &mut self,
        unit: impl FnOnce(&EngineConfig, &mut Store) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut staged = self.store.clone();
        let outcome = unit(&self.config, &mut staged)?;
        staged.check_consistency()?;
        self.store = staged;
        Ok(outcome)
    }

    /// Apply one mutation atomically.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the mutation is rejected, or a
    /// [`crate::errors::ConsistencyError`] if the cascade left the derived
    /// graph broken (a defect). Either way the store is untouched.
    pub fn apply(&mut self, mutation: Mutation) -> Result<Applied, EngineError> {
        self.commit_with(|config, store| apply_one(config, store, mutation))
    }

    /// Apply a batch of mutations as one atomic unit of work.
    ///
    /// Every mutation runs the full per-record reconciliation; there is no
    /// bulk fast path. The first failure rolls back the whole batch.
    ///
    /// # Errors
    ///
    /// See [`Engine::apply`].
    pub fn apply_all(&mut self, mutations: Vec<Mutation>) -> Result<Vec<Applied>, EngineError> {
        self.commit_with(|config, store| {
            mutations
                .into_iter()
                .map(|mutation| apply_one(config, store, mutation))
                .collect()
        })
    }

    /// Create a view. See [`Engine::apply`] for error semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn add_view(&mut self, name: &str) -> Result<ViewId, EngineError> {
        let name = name.to_string();
        self.commit_with(|config, store| create_view(config, store, name))
    }

    /// Delete a view.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is unknown or still owns zones.
    pub fn remove_view(&mut self, view: ViewId) -> Result<(), EngineError> {
        self.commit_with(|config, store| delete_view(config, store, view))
    }

    /// Create a zone and reconcile every address record it affects.
    ///
    /// # Errors
    ///
    /// Returns an error on name or RFC2317 prefix conflicts.
    pub fn add_zone(&mut self, zone: NewZone) -> Result<ZoneId, EngineError> {
        self.commit_with(|config, store| create_zone(config, store, zone))
    }

    /// Update zone attributes and reconcile the affected views.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown zone, name or prefix conflicts.
    pub fn change_zone(&mut self, zone: ZoneId, change: ZoneChange) -> Result<(), EngineError> {
        self.commit_with(|config, store| update_zone(config, store, zone, change))
    }

    /// Delete a zone, its records, and every derived record that depended
    /// on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone is unknown.
    pub fn remove_zone(&mut self, zone: ZoneId) -> Result<(), EngineError> {
        self.commit_with(|config, store| delete_zone(config, store, zone))
    }

    /// Create a record and derive its PTR (and delegation CNAME) as
    /// applicable.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown zone, invalid names/addresses or
    /// untolerated record types.
    pub fn add_record(&mut self, record: NewRecord) -> Result<RecordId, EngineError> {
        self.commit_with(|config, store| create_record(config, store, record))
    }

    /// Update record attributes and re-derive as applicable.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown or managed records and on invalid
    /// values.
    pub fn change_record(
        &mut self,
        record: RecordId,
        change: RecordChange,
    ) -> Result<(), EngineError> {
        self.commit_with(|config, store| update_record(config, store, record, change))
    }

    /// Delete a record together with its derived records.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown or managed records.
    pub fn remove_record(&mut self, record: RecordId) -> Result<(), EngineError> {
        self.commit_with(|config, store| delete_record(config, store, record))
    }
}

fn apply_one(
    config: &EngineConfig,
    store: &mut Store,
    mutation: Mutation,
) -> Result<Applied, EngineError> {
    match mutation {
        Mutation::CreateView { name } => create_view(config, store, name).map(Applied::View),
        Mutation::DeleteView { view } => delete_view(config, store, view).map(|()| Applied::Removed),
        Mutation::CreateZone(zone) => create_zone(config, store, zone).map(Applied::Zone),
        Mutation::UpdateZone { zone, change } => {
            update_zone(config, store, zone, change).map(|()| Applied::Updated)
        }
        Mutation::DeleteZone { zone } => delete_zone(config, store, zone).map(|()| Applied::Removed),
        Mutation::CreateRecord(record) => create_record(config, store, record).map(Applied::Record),
        Mutation::UpdateRecord { record, change } => {
            update_record(config, store, record, change).map(|()| Applied::Updated)
        }
        Mutation::DeleteRecord { record } => {
            delete_record(config, store, record).map(|()| Applied::Removed)
        }
    }
}

// ----------------------------------------------------------------------
// View mutations
// ----------------------------------------------------------------------

fn create_view(
    _config: &EngineConfig,
    store: &mut Store,
    name: String,
) -> Result<ViewId, EngineError> {
    if name.is_empty() {
        return Err(ValidationError::InvalidName {
            name,
            reason: "view name must not be empty".to_string(),
        }
        .into());
    }
    let id = store.insert_view(name.clone());
    info!(view = %id, name = %name, "Created view");
    Ok(id)
}

fn delete_view(
    _config: &EngineConfig,
    store: &mut Store,
    view: ViewId,
) -> Result<(), EngineError> {
    let Some(existing) = store.view(view) else {
        return Err(ValidationError::UnknownView { view }.into());
    };
    let name = existing.name.clone();
    let owned = store.zones().filter(|z| z.view == Some(view)).count();
    if owned > 0 {
        return Err(ValidationError::ViewInUse {
            view: name,
            zones: owned,
        }
        .into());
    }
    store.remove_view(view);
    info!(view = %view, name = %name, "Deleted view");
    Ok(())
}

// ----------------------------------------------------------------------
// Zone mutations
// ----------------------------------------------------------------------

fn create_zone(
    config: &EngineConfig,
    store: &mut Store,
    zone: NewZone,
) -> Result<ZoneId, EngineError> {
    validate_zone_name(&zone.name)?;
    if let Some(view) = zone.view {
        if store.view(view).is_none() {
            return Err(ValidationError::UnknownView { view }.into());
        }
    }
    ensure_zone_name_free(store, &zone.name, zone.view, None)?;
    if let Some(prefix) = zone.rfc2317_prefix {
        validate_rfc2317_prefix(store, prefix, zone.view, None)?;
    }

    let id = store.insert_zone(Zone {
        id: ZoneId(0),
        name: zone.name.clone(),
        view: zone.view,
        default_ttl: zone.default_ttl.unwrap_or(config.default_zone_ttl),
        rfc2317_prefix: zone.rfc2317_prefix,
        rfc2317_parent_managed: zone.rfc2317_parent_managed,
        last_updated: Utc::now(),
    });
    info!(zone = %id, name = %zone.name, "Created zone");

    resync_view(config, store, zone.view);
    sweep_orphans(store);
    Ok(id)
}

fn update_zone(
    config: &EngineConfig,
    store: &mut Store,
    zone: ZoneId,
    change: ZoneChange,
) -> Result<(), EngineError> {
    let Some(existing) = store.zone(zone) else {
        return Err(ValidationError::UnknownZone { zone }.into());
    };

    let old_view = existing.view;
    let new_name = change.name.clone().unwrap_or_else(|| existing.name.clone());
    let new_view = change.view.unwrap_or(old_view);
    let new_prefix = change.rfc2317_prefix.unwrap_or(existing.rfc2317_prefix);
    let new_managed = change
        .rfc2317_parent_managed
        .unwrap_or(existing.rfc2317_parent_managed);

    let structural = new_name != existing.name
        || new_view != old_view
        || new_prefix != existing.rfc2317_prefix
        || new_managed != existing.rfc2317_parent_managed;

    validate_zone_name(&new_name)?;
    if let Some(view) = new_view {
        if store.view(view).is_none() {
            return Err(ValidationError::UnknownView { view }.into());
        }
    }
    ensure_zone_name_free(store, &new_name, new_view, Some(zone))?;
    if let Some(prefix) = new_prefix {
        validate_rfc2317_prefix(store, prefix, new_view, Some(zone))?;
    }

    if let Some(z) = store.zone_mut(zone) {
        z.name = new_name;
        z.view = new_view;
        z.rfc2317_prefix = new_prefix;
        z.rfc2317_parent_managed = new_managed;
        if let Some(default_ttl) = change.default_ttl {
            z.default_ttl = default_ttl;
        }
    }
    info!(zone = %zone, structural, "Updated zone");

    if structural {
        let mut views: BTreeSet<Option<ViewId>> = BTreeSet::new();
        views.insert(old_view);
        views.insert(new_view);
        for view in views {
            resync_view(config, store, view);
        }
        sweep_orphans(store);
    }
    Ok(())
}

fn delete_zone(
    config: &EngineConfig,
    store: &mut Store,
    zone: ZoneId,
) -> Result<(), EngineError> {
    let Some(existing) = store.zone(zone) else {
        return Err(ValidationError::UnknownZone { zone }.into());
    };
    let view = existing.view;
    let name = existing.name.clone();

    // RFC2317 zones currently parented by the zone being deleted; they may
    // need their managed flag dropped once no replacement parent resolves.
    let children: Vec<ZoneId> = store
        .zones()
        .filter(|z| z.id != zone && z.is_rfc2317() && z.rfc2317_parent_managed)
        .filter(|z| lookup::find_parent_zone(store, z.id) == Some(zone))
        .map(|z| z.id)
        .collect();

    let owned: Vec<RecordId> = store.records_in_zone(zone).map(|r| r.id).collect();
    for record_id in owned {
        let Some(record) = store.record(record_id) else {
            continue;
        };
        let managed = record.managed;
        let rtype = record.rtype;
        let is_address = record.is_address();

        if managed && rtype == RecordType::PTR {
            delegation::release(store, record_id);
            if let Some(source) = store.source_of_ptr(record_id) {
                if let Some(source) = store.record_mut(source) {
                    source.ptr_record = None;
                }
            }
        } else if managed && rtype == RecordType::CNAME {
            for referencing in store.referencing_ptrs(record_id) {
                if let Some(ptr) = store.record_mut(referencing) {
                    ptr.rfc2317_cname_record = None;
                }
            }
        } else if is_address {
            ptr::remove(store, record_id);
        }
        store.remove_record(record_id);
    }

    store.remove_zone(zone);
    info!(zone = %zone, name = %name, "Deleted zone");

    for child in children {
        if lookup::find_parent_zone(store, child).is_none() {
            if let Some(z) = store.zone_mut(child) {
                z.rfc2317_parent_managed = false;
            }
            debug!(zone = %child, "No classful parent remains; delegation maintenance disabled");
        }
    }

    resync_view(config, store, view);
    sweep_orphans(store);
    Ok(())
}

// ----------------------------------------------------------------------
// Record mutations
// ----------------------------------------------------------------------

fn create_record(
    config: &EngineConfig,
    store: &mut Store,
    record: NewRecord,
) -> Result<RecordId, EngineError> {
    if store.zone(record.zone).is_none() {
        return Err(ValidationError::UnknownZone { zone: record.zone }.into());
    }
    validate_record_name(&record.name)?;
    validate_record_type(config, record.rtype)?;
    let value = normalize_value(record.rtype, &record.value)?;

    let id = store.insert_record(Record {
        id: RecordId(0),
        zone: record.zone,
        name: record.name,
        rtype: record.rtype,
        value,
        ttl: record.ttl,
        status: record.status,
        disable_ptr: record.disable_ptr,
        managed: false,
        ptr_record: None,
        rfc2317_cname_record: None,
        last_updated: Utc::now(),
    });
    info!(record = %id, zone = %record.zone, "Created record");

    ptr::sync(store, config, id);
    Ok(id)
}

fn update_record(
    config: &EngineConfig,
    store: &mut Store,
    record: RecordId,
    change: RecordChange,
) -> Result<(), EngineError> {
    let Some(existing) = store.record(record) else {
        return Err(ValidationError::UnknownRecord { record }.into());
    };
    if existing.managed {
        return Err(ValidationError::ManagedRecordImmutable {
            record,
            name: existing.name.clone(),
        }
        .into());
    }

    let new_name = change.name.clone().unwrap_or_else(|| existing.name.clone());
    let new_rtype = change.rtype.unwrap_or(existing.rtype);
    let new_value = change.value.clone().unwrap_or_else(|| existing.value.clone());

    validate_record_name(&new_name)?;
    validate_record_type(config, new_rtype)?;
    let new_value = normalize_value(new_rtype, &new_value)?;

    if let Some(r) = store.record_mut(record) {
        r.name = new_name;
        r.rtype = new_rtype;
        r.value = new_value;
        if let Some(ttl) = change.ttl {
            r.ttl = ttl;
        }
        if let Some(status) = change.status {
            r.status = status;
        }
        if let Some(disable_ptr) = change.disable_ptr {
            r.disable_ptr = disable_ptr;
        }
    }
    info!(record = %record, "Updated record");

    ptr::sync(store, config, record);
    Ok(())
}

fn delete_record(
    _config: &EngineConfig,
    store: &mut Store,
    record: RecordId,
) -> Result<(), EngineError> {
    let Some(existing) = store.record(record) else {
        return Err(ValidationError::UnknownRecord { record }.into());
    };
    if existing.managed {
        return Err(ValidationError::ManagedRecordImmutable {
            record,
            name: existing.name.clone(),
        }
        .into());
    }

    ptr::remove(store, record);
    store.remove_record(record);
    info!(record = %record, "Deleted record");
    Ok(())
}

// ----------------------------------------------------------------------
// Cascade helpers
// ----------------------------------------------------------------------

/// Re-evaluate the PTR pairing of every address record whose zone lives in
/// `view`. Structural zone changes cannot cheaply identify the precise
/// affected set, so the whole view partition is re-scanned.
fn resync_view(config: &EngineConfig, store: &mut Store, view: Option<ViewId>) {
    let affected: Vec<RecordId> = store
        .records()
        .filter(|r| !r.managed && r.is_address())
        .filter(|r| store.zone(r.zone).map(|z| z.view) == Some(view))
        .map(|r| r.id)
        .collect();

    debug!(records = affected.len(), "Re-scanning address records in affected view");
    for record in affected {
        ptr::sync(store, config, record);
    }
}

/// Delete managed records whose source is gone.
///
/// The explicit cascades above should never leave any; this pass backstops
/// them after structural zone mutations so a missed edge case surfaces as
/// a swept orphan rather than silent drift.
fn sweep_orphans(store: &mut Store) {
    let orphan_ptrs: Vec<RecordId> = store
        .records()
        .filter(|r| r.managed && r.rtype == RecordType::PTR)
        .filter(|r| store.source_of_ptr(r.id).is_none())
        .map(|r| r.id)
        .collect();
    for ptr_id in orphan_ptrs {
        delegation::release(store, ptr_id);
        store.remove_record(ptr_id);
        debug!(ptr = %ptr_id, "Swept orphaned PTR record");
    }

    let orphan_cnames: Vec<RecordId> = store
        .records()
        .filter(|r| r.managed && r.rtype == RecordType::CNAME)
        .filter(|r| store.referencing_ptrs(r.id).is_empty())
        .map(|r| r.id)
        .collect();
    for cname_id in orphan_cnames {
        store.remove_record(cname_id);
        debug!(cname = %cname_id, "Swept orphaned delegation CNAME");
    }
}

// ----------------------------------------------------------------------
// Validation helpers
// ----------------------------------------------------------------------

fn validate_zone_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "zone name must not be empty".to_string(),
        });
    }
    reverse::dns_name(name).map_err(|err| ValidationError::InvalidName {
        name: name.to_string(),
        reason: err.to_string(),
    })?;
    Ok(())
}

fn validate_record_name(name: &str) -> Result<(), ValidationError> {
    if name == APEX_LABEL {
        return Ok(());
    }
    if name.is_empty() {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "record name must not be empty".to_string(),
        });
    }
    reverse::dns_name(name).map_err(|err| ValidationError::InvalidName {
        name: name.to_string(),
        reason: err.to_string(),
    })?;
    Ok(())
}

fn ensure_zone_name_free(
    store: &Store,
    name: &str,
    view: Option<ViewId>,
    exclude: Option<ZoneId>,
) -> Result<(), ValidationError> {
    let taken = store.zones().any(|z| {
        Some(z.id) != exclude && z.view == view && z.name.eq_ignore_ascii_case(name)
    });
    if taken {
        return Err(ValidationError::ZoneNameInUse {
            name: name.to_string(),
            view: view_label(store, view),
        });
    }
    Ok(())
}

fn validate_rfc2317_prefix(
    store: &Store,
    prefix: Ipv4Net,
    view: Option<ViewId>,
    exclude: Option<ZoneId>,
) -> Result<(), ValidationError> {
    if prefix.prefix_len() < RFC2317_MIN_PREFIX_LENGTH
        || prefix.prefix_len() > RFC2317_MAX_PREFIX_LENGTH
    {
        return Err(ValidationError::Rfc2317PrefixInvalid {
            prefix: prefix.to_string(),
            reason: format!(
                "prefix length must be between /{RFC2317_MIN_PREFIX_LENGTH} and /{RFC2317_MAX_PREFIX_LENGTH}"
            ),
        });
    }
    if prefix.network() != prefix.addr() {
        return Err(ValidationError::Rfc2317PrefixInvalid {
            prefix: prefix.to_string(),
            reason: "prefix has host bits set".to_string(),
        });
    }

    let conflict = store.zones().find(|z| {
        Some(z.id) != exclude && z.view == view && z.rfc2317_prefix == Some(prefix)
    });
    if let Some(zone) = conflict {
        return Err(ValidationError::Rfc2317PrefixConflict {
            prefix: prefix.to_string(),
            zone: zone.name.clone(),
        });
    }
    Ok(())
}

fn validate_record_type(config: &EngineConfig, rtype: RecordType) -> Result<(), ValidationError> {
    let classic = !matches!(
        rtype,
        RecordType::Unknown(_)
            | RecordType::ANY
            | RecordType::AXFR
            | RecordType::IXFR
            | RecordType::OPT
            | RecordType::ZERO
    );
    if classic || config.tolerate_non_rfc1035_types {
        Ok(())
    } else {
        Err(ValidationError::RecordTypeNotTolerated {
            rtype: rtype.to_string(),
        })
    }
}

/// Canonicalize address record values; other types pass through untouched.
fn normalize_value(rtype: RecordType, value: &str) -> Result<String, ValidationError> {
    match rtype {
        RecordType::A => value
            .parse::<Ipv4Addr>()
            .map(|addr| addr.to_string())
            .map_err(|_| ValidationError::InvalidAddress {
                value: value.to_string(),
                rtype: rtype.to_string(),
            }),
        RecordType::AAAA => value
            .parse::<Ipv6Addr>()
            .map(|addr| addr.to_string())
            .map_err(|_| ValidationError::InvalidAddress {
                value: value.to_string(),
                rtype: rtype.to_string(),
            }),
        _ => Ok(value.to_string()),
    }
}

fn view_label(store: &Store, view: Option<ViewId>) -> String {
    view.and_then(|id| store.view(id))
        .map_or_else(|| "global".to_string(), |v| v.name.clone())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
