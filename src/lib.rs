// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Revzone - Consistency Engine for Authoritative DNS Data
//!
//! Revzone keeps an authoritative DNS data set internally consistent as
//! zones and records change. Whenever an address record is created, edited
//! or deleted, or a zone is created, reshaped or removed, the engine
//! derives the secondary records the data set implies:
//!
//! - a **PTR record** in the reverse zone owning the address, selected by
//!   RFC2317 classless prefix (narrowest match) or classful `arpa` name,
//!   scoped by view
//! - a **delegation CNAME** in the classful parent zone when an RFC2317
//!   zone declares its parent as managed, delegating the classful PTR name
//!   into the classless zone
//!
//! Every mutation runs as one atomic unit of work: resolution, PTR
//! placement, CNAME maintenance and TTL propagation either all commit or
//! none do, so readers never observe partially derived state.
//!
//! ## Modules
//!
//! - [`model`] - Views, zones and records with their derived-link fields
//! - [`store`] - The in-memory relational store and its read accessors
//! - [`lookup`] - Reverse zone selection and classful parent resolution
//! - [`reverse`] - Reverse-name and label arithmetic
//! - [`reconcilers`] - PTR, delegation CNAME and TTL reconciliation
//! - [`engine`] - The mutation interface wrapping it all
//! - [`config`] - Injected engine configuration
//! - [`errors`] - Validation and consistency error types
//!
//! ## Example
//!
//! ```rust
//! use hickory_proto::rr::RecordType;
//! use revzone::config::EngineConfig;
//! use revzone::engine::{Engine, NewRecord, NewZone};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//!
//! let forward = engine
//!     .add_zone(NewZone {
//!         name: "example.com".to_string(),
//!         ..NewZone::default()
//!     })
//!     .unwrap();
//! engine
//!     .add_zone(NewZone {
//!         name: "0.0.10.in-addr.arpa".to_string(),
//!         ..NewZone::default()
//!     })
//!     .unwrap();
//!
//! let host = engine
//!     .add_record(NewRecord {
//!         zone: forward,
//!         name: "www".to_string(),
//!         rtype: RecordType::A,
//!         value: "10.0.0.1".to_string(),
//!         ..NewRecord::default()
//!     })
//!     .unwrap();
//!
//! // The engine derived a PTR in the reverse zone automatically.
//! let ptr = engine.store().ptr_record_of(host).unwrap();
//! assert_eq!(ptr.name, "1");
//! assert_eq!(ptr.value, "www.example.com.");
//! ```

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod lookup;
pub mod model;
pub mod reconcilers;
pub mod reverse;
pub mod store;
