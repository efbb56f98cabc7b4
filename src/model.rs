// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Data model for authoritative DNS zone and record data.
//!
//! The model is deliberately relational: [`View`], [`Zone`] and [`Record`]
//! live in arenas keyed by identifier (see [`crate::store::Store`]), and the
//! links between primary and derived records (`ptr_record`,
//! `rfc2317_cname_record`) are plain identifiers recomputed by the
//! reconcilers rather than enforced by cascading deletes.
//!
//! # Record ownership
//!
//! Every record is owned by exactly one zone. Records created through the
//! mutation interface carry `managed = false`; records synthesized by the
//! engine (PTR and delegation CNAME records) carry `managed = true` and are
//! rejected as targets of direct mutation.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use hickory_proto::rr::RecordType;
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// Identifier of a [`View`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u64);

/// Identifier of a [`Zone`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u64);

/// Identifier of a [`Record`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view/{}", self.0)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone/{}", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record/{}", self.0)
    }
}

/// Lifecycle status of a record.
///
/// Inactive records are kept in the store but do not participate in
/// reconciliation: an inactive address record has no PTR, and flipping it
/// back to active recreates the derived records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// The record is live and participates in reconciliation
    #[default]
    Active,
    /// The record is parked: no derived records, no publication
    Inactive,
}

impl RecordStatus {
    /// Returns true for [`RecordStatus::Active`]
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A named partition of the zone namespace.
///
/// The same zone name may exist independently in different views; zones
/// without a view live in the shared global partition. Reverse-zone
/// resolution never crosses view boundaries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct View {
    /// Identifier, assigned by the store
    pub id: ViewId,
    /// Unique view name
    pub name: String,
}

/// An authoritative DNS zone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Zone {
    /// Identifier, assigned by the store
    pub id: ZoneId,

    /// Zone name without trailing dot, e.g. `example.com` or
    /// `0.0.10.in-addr.arpa`. Unique within a view, case-insensitive.
    pub name: String,

    /// View the zone is scoped to; `None` means the global partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewId>,

    /// Default TTL for records of this zone, in seconds
    pub default_ttl: u32,

    /// Classless reverse delegation prefix per RFC2317.
    ///
    /// When set, this zone is the reverse-lookup target for every address
    /// inside the prefix (within the zone's view), taking precedence over
    /// the classful reverse zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfc2317_prefix: Option<Ipv4Net>,

    /// Whether the classful parent zone carries delegation CNAME records
    /// for this zone's PTR names
    #[serde(default)]
    pub rfc2317_parent_managed: bool,

    /// Last time the engine wrote this zone
    pub last_updated: DateTime<Utc>,
}

impl Zone {
    /// Returns true if this zone is a classless reverse delegation target
    #[must_use]
    pub fn is_rfc2317(&self) -> bool {
        self.rfc2317_prefix.is_some()
    }
}

/// A resource record owned by a zone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, assigned by the store
    pub id: RecordId,

    /// Owning zone
    pub zone: ZoneId,

    /// Relative record name; `@` denotes the zone apex
    pub name: String,

    /// Record type
    pub rtype: RecordType,

    /// Record data in textual form. Address records store the canonical
    /// textual form of the address.
    pub value: String,

    /// Explicit TTL in seconds; `None` means "inherit the zone default".
    ///
    /// The `None` state is itself propagated to derived records, never a
    /// resolved number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Lifecycle status
    #[serde(default)]
    pub status: RecordStatus,

    /// Suppresses PTR derivation for this address record
    #[serde(default)]
    pub disable_ptr: bool,

    /// True for records synthesized and owned by the engine.
    ///
    /// Managed records are hidden from direct editing by front-ends and
    /// rejected by the mutation interface.
    #[serde(default)]
    pub managed: bool,

    /// For an address record: the PTR record derived from it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptr_record: Option<RecordId>,

    /// For a PTR record in an RFC2317 zone: the canonical delegation CNAME
    /// created for it in the classful parent zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfc2317_cname_record: Option<RecordId>,

    /// Last time the engine wrote this record
    pub last_updated: DateTime<Utc>,
}

impl Record {
    /// Returns true for A and AAAA records
    #[must_use]
    pub fn is_address(&self) -> bool {
        is_address_type(self.rtype)
    }

    /// Returns true if the record participates in reconciliation
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Parses the record value as an IP address.
    ///
    /// Returns `None` for non-address records and for values that fail to
    /// parse (which validation prevents from entering the store).
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        if !self.is_address() {
            return None;
        }
        match (self.rtype, self.value.parse::<IpAddr>()) {
            (RecordType::A, Ok(addr @ IpAddr::V4(_))) | (RecordType::AAAA, Ok(addr @ IpAddr::V6(_))) => {
                Some(addr)
            }
            _ => None,
        }
    }
}

/// Returns true for record types that carry an IP address
#[must_use]
pub fn is_address_type(rtype: RecordType) -> bool {
    matches!(rtype, RecordType::A | RecordType::AAAA)
}
