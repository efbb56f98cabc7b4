// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Derived-record reconciliation.
//!
//! Three cooperating reconcilers keep the derived-record graph consistent:
//!
//! - [`ptr`] places, retargets and removes the PTR record paired with each
//!   address record
//! - [`delegation`] maintains the shared delegation CNAME records that an
//!   RFC2317 zone's classful parent carries for its PTR names
//! - [`ttl`] owns the TTL propagation rules between primary and derived
//!   records
//!
//! All entry points take `&mut Store` and are only reachable from the
//! engine's mutation cascade; they never re-enter the mutation interface,
//! which is what makes the trigger structurally non-recursive.

pub mod delegation;
pub mod ptr;
pub mod ttl;
