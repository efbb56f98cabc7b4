// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the revzone engine.
//!
//! This module provides specialized error types for:
//! - Validation failures raised before a mutation is applied (bad names,
//!   conflicting RFC2317 prefixes, attempts to edit engine-managed records)
//! - Consistency violations detected by the post-mutation invariant check
//!
//! Validation errors are expected runtime conditions and are surfaced to the
//! caller of the mutation; consistency errors indicate a defect in the
//! reconciliation cascade and abort the unit of work before commit.

use thiserror::Error;

use crate::model::{RecordId, ViewId, ZoneId};

/// Errors raised while validating a mutation against the current data set.
///
/// A mutation that fails validation is rejected as a whole; the store is
/// left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A zone with the same name already exists within the target view
    #[error("Zone '{name}' already exists in view '{view}'")]
    ZoneNameInUse {
        /// The conflicting zone name
        name: String,
        /// The view the name collides in ("global" for unscoped zones)
        view: String,
    },

    /// The referenced view does not exist
    #[error("View {view} does not exist")]
    UnknownView {
        /// The missing view identifier
        view: ViewId,
    },

    /// The referenced zone does not exist
    #[error("Zone {zone} does not exist")]
    UnknownZone {
        /// The missing zone identifier
        zone: ZoneId,
    },

    /// The referenced record does not exist
    #[error("Record {record} does not exist")]
    UnknownRecord {
        /// The missing record identifier
        record: RecordId,
    },

    /// A zone or record name failed DNS name parsing
    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        /// The offending name
        name: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// The RFC2317 prefix is not usable for classless reverse delegation.
    ///
    /// Only IPv4 prefixes longer than /24 and at most /31 can be delegated
    /// via RFC2317 CNAME indirection.
    #[error("Invalid RFC2317 prefix '{prefix}': {reason}")]
    Rfc2317PrefixInvalid {
        /// The offending prefix
        prefix: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// Another zone in the same view already claims the identical RFC2317
    /// prefix.
    ///
    /// Two classless reverse zones of equal specificity would make address
    /// resolution ambiguous, so the conflict is rejected at save time and
    /// never resolved during reconciliation.
    #[error("RFC2317 prefix '{prefix}' is already delegated to zone '{zone}'")]
    Rfc2317PrefixConflict {
        /// The conflicting prefix
        prefix: String,
        /// The zone that already owns the prefix
        zone: String,
    },

    /// The record is synthesized and owned by the engine.
    ///
    /// Managed records (PTR and delegation CNAME records) are maintained as
    /// a side effect of other mutations and cannot be edited or deleted
    /// directly.
    #[error("Record {record} ('{name}') is managed by the engine and cannot be modified directly")]
    ManagedRecordImmutable {
        /// The managed record identifier
        record: RecordId,
        /// The managed record name, for diagnostics
        name: String,
    },

    /// An address record value failed to parse as an address of its type
    #[error("Invalid {rtype} record value '{value}': not a valid address")]
    InvalidAddress {
        /// The offending value
        value: String,
        /// The record type the value was checked against
        rtype: String,
    },

    /// The record type is outside the tolerated set.
    ///
    /// Unknown and meta query types are rejected unless
    /// `tolerate_non_rfc1035_types` is enabled in the engine configuration.
    #[error("Record type '{rtype}' is not tolerated by the engine configuration")]
    RecordTypeNotTolerated {
        /// The rejected record type
        rtype: String,
    },

    /// The view still owns zones and cannot be deleted
    #[error("View '{view}' still owns {zones} zone(s) and cannot be deleted")]
    ViewInUse {
        /// The view name
        view: String,
        /// Number of zones still scoped to the view
        zones: usize,
    },
}

/// Invariant violations detected after a mutation cascade has run.
///
/// These are defects in the reconciliation logic, not expected runtime
/// conditions: any of them aborts the unit of work before it becomes
/// visible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// An address record points at a PTR record that does not exist or is
    /// not a managed PTR
    #[error("Record {record} references PTR record {ptr} which is missing or not a managed PTR")]
    DanglingPtrLink {
        /// The address record carrying the stale link
        record: RecordId,
        /// The referenced PTR record identifier
        ptr: RecordId,
    },

    /// A PTR record points at a delegation CNAME that does not exist or is
    /// not a managed CNAME
    #[error("PTR record {ptr} references CNAME record {cname} which is missing or not a managed CNAME")]
    DanglingCnameLink {
        /// The PTR record carrying the stale link
        ptr: RecordId,
        /// The referenced CNAME record identifier
        cname: RecordId,
    },

    /// A managed PTR record is not referenced by exactly one address record
    #[error("Managed PTR record {ptr} has {sources} source record(s), expected exactly one")]
    OrphanPtr {
        /// The orphaned PTR record identifier
        ptr: RecordId,
        /// Number of address records referencing it
        sources: usize,
    },

    /// A managed delegation CNAME is referenced by no PTR record
    #[error("Managed CNAME record {cname} is referenced by no PTR record")]
    OrphanCname {
        /// The orphaned CNAME record identifier
        cname: RecordId,
    },

    /// Two managed delegation CNAMEs share one name within one zone
    #[error("Duplicate managed CNAME '{name}' in zone {zone}")]
    DuplicateCname {
        /// The zone owning the duplicates
        zone: ZoneId,
        /// The duplicated CNAME name
        name: String,
    },

    /// A record is owned by a zone that does not exist
    #[error("Record {record} is owned by missing zone {zone}")]
    RecordWithoutZone {
        /// The record identifier
        record: RecordId,
        /// The missing zone identifier
        zone: ZoneId,
    },

    /// A zone is scoped to a view that does not exist
    #[error("Zone {zone} is scoped to missing view {view}")]
    ZoneWithoutView {
        /// The zone identifier
        zone: ZoneId,
        /// The missing view identifier
        view: ViewId,
    },
}

/// Composite error type returned by the mutation interface.
///
/// This is the primary error type surfaced by [`crate::engine::Engine`]: a
/// failed mutation returns one of these and leaves the store untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The mutation was rejected before being applied
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cascade produced an inconsistent derived-record graph
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

impl EngineError {
    /// Returns true if this error is a caller mistake rather than an
    /// internal defect.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns a short stable reason code for this error.
    ///
    /// Front-ends use this to render structured failure information without
    /// parsing the display message.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::ZoneNameInUse { .. }) => "ZoneNameInUse",
            Self::Validation(ValidationError::UnknownView { .. }) => "UnknownView",
            Self::Validation(ValidationError::UnknownZone { .. }) => "UnknownZone",
            Self::Validation(ValidationError::UnknownRecord { .. }) => "UnknownRecord",
            Self::Validation(ValidationError::InvalidName { .. }) => "InvalidName",
            Self::Validation(ValidationError::Rfc2317PrefixInvalid { .. }) => {
                "Rfc2317PrefixInvalid"
            }
            Self::Validation(ValidationError::Rfc2317PrefixConflict { .. }) => {
                "Rfc2317PrefixConflict"
            }
            Self::Validation(ValidationError::ManagedRecordImmutable { .. }) => {
                "ManagedRecordImmutable"
            }
            Self::Validation(ValidationError::InvalidAddress { .. }) => "InvalidAddress",
            Self::Validation(ValidationError::RecordTypeNotTolerated { .. }) => {
                "RecordTypeNotTolerated"
            }
            Self::Validation(ValidationError::ViewInUse { .. }) => "ViewInUse",

            Self::Consistency(ConsistencyError::DanglingPtrLink { .. }) => "DanglingPtrLink",
            Self::Consistency(ConsistencyError::DanglingCnameLink { .. }) => "DanglingCnameLink",
            Self::Consistency(ConsistencyError::OrphanPtr { .. }) => "OrphanPtr",
            Self::Consistency(ConsistencyError::OrphanCname { .. }) => "OrphanCname",
            Self::Consistency(ConsistencyError::DuplicateCname { .. }) => "DuplicateCname",
            Self::Consistency(ConsistencyError::RecordWithoutZone { .. }) => "RecordWithoutZone",
            Self::Consistency(ConsistencyError::ZoneWithoutView { .. }) => "ZoneWithoutView",
        }
    }
}
