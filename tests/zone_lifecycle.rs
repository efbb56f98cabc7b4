// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone and view lifecycle tests: cascades that reshape the zone graph and
//! must leave the derived-record graph orphan-free.

use hickory_proto::rr::RecordType;
use revzone::config::EngineConfig;
use revzone::engine::{Engine, Mutation, NewRecord, NewZone, RecordChange, ZoneChange};
use revzone::model::{RecordId, ViewId, ZoneId};

// ============================================================================
// Helper Functions
// ============================================================================

fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

fn add_zone(engine: &mut Engine, name: &str, view: Option<ViewId>) -> ZoneId {
    engine
        .add_zone(NewZone {
            name: name.to_string(),
            view,
            ..NewZone::default()
        })
        .expect("zone creation failed")
}

fn add_address(
    engine: &mut Engine,
    zone: ZoneId,
    name: &str,
    rtype: RecordType,
    value: &str,
) -> RecordId {
    engine
        .add_record(NewRecord {
            zone,
            name: name.to_string(),
            rtype,
            value: value.to_string(),
            ..NewRecord::default()
        })
        .expect("record creation failed")
}

// ============================================================================
// Classful PTR Lifecycle
// ============================================================================

#[test]
fn test_classful_ptr_created_and_removed_with_record() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    let reverse = add_zone(&mut engine, "0.0.10.in-addr.arpa", None);

    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");

    let ptr = engine.store().ptr_record_of(record).unwrap();
    assert_eq!(ptr.zone, reverse);
    assert_eq!(ptr.name, "1");
    assert_eq!(ptr.value, "www.example.com.");

    engine.remove_record(record).unwrap();
    assert_eq!(
        engine
            .store()
            .records_in_zone(reverse)
            .filter(|r| r.rtype == RecordType::PTR)
            .count(),
        0
    );
}

#[test]
fn test_aaaa_record_ptr_in_ip6_arpa_zone() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    let reverse = add_zone(&mut engine, "8.b.d.0.1.0.0.2.ip6.arpa", None);

    let record = add_address(&mut engine, forward, "host", RecordType::AAAA, "2001:db8::1");

    let ptr = engine.store().ptr_record_of(record).unwrap();
    assert_eq!(ptr.zone, reverse);
    assert_eq!(ptr.value, "host.example.com.");
    assert_eq!(ptr.name.matches('.').count() + 1, 24, "24 nibble labels");
}

#[test]
fn test_disable_ptr_toggle_round_trip() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    add_zone(&mut engine, "0.0.10.in-addr.arpa", None);

    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");
    assert!(engine.store().ptr_record_of(record).is_some());

    engine
        .change_record(
            record,
            RecordChange {
                disable_ptr: Some(true),
                ..RecordChange::default()
            },
        )
        .unwrap();
    assert!(engine.store().ptr_record_of(record).is_none());

    engine
        .change_record(
            record,
            RecordChange {
                disable_ptr: Some(false),
                ..RecordChange::default()
            },
        )
        .unwrap();
    assert!(engine.store().ptr_record_of(record).is_some());
}

#[test]
fn test_record_type_change_away_from_address_drops_ptr() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    add_zone(&mut engine, "0.0.10.in-addr.arpa", None);

    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");
    assert!(engine.store().ptr_record_of(record).is_some());

    engine
        .change_record(
            record,
            RecordChange {
                rtype: Some(RecordType::TXT),
                value: Some("text payload".to_string()),
                ..RecordChange::default()
            },
        )
        .unwrap();
    assert!(engine.store().ptr_record_of(record).is_none());
}

// ============================================================================
// Zone Graph Reshaping
// ============================================================================

#[test]
fn test_create_reverse_zone_later_adopts_existing_records() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");
    assert!(
        engine.store().ptr_record_of(record).is_none(),
        "No reverse zone resolves yet"
    );

    let reverse = add_zone(&mut engine, "0.0.10.in-addr.arpa", None);
    let ptr = engine.store().ptr_record_of(record).unwrap();
    assert_eq!(ptr.zone, reverse);
}

#[test]
fn test_delete_reverse_zone_drops_ptrs() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    let reverse = add_zone(&mut engine, "0.0.10.in-addr.arpa", None);
    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");
    assert!(engine.store().ptr_record_of(record).is_some());

    engine.remove_zone(reverse).unwrap();
    assert!(engine.store().ptr_record_of(record).is_none());
    assert!(engine.store().check_consistency().is_ok());
}

#[test]
fn test_delete_forward_zone_removes_remote_ptrs() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    let reverse = add_zone(&mut engine, "0.0.10.in-addr.arpa", None);
    add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");

    engine.remove_zone(forward).unwrap();

    assert_eq!(
        engine
            .store()
            .records_in_zone(reverse)
            .filter(|r| r.rtype == RecordType::PTR)
            .count(),
        0,
        "PTRs must not outlive their source records"
    );
    assert!(engine.store().check_consistency().is_ok());
}

#[test]
fn test_narrower_classful_zone_takes_over() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    let wide = add_zone(&mut engine, "0.10.in-addr.arpa", None);
    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");

    let ptr = engine.store().ptr_record_of(record).unwrap();
    assert_eq!(ptr.zone, wide);
    assert_eq!(ptr.name, "1.0");

    let narrow = add_zone(&mut engine, "0.0.10.in-addr.arpa", None);
    let ptr = engine.store().ptr_record_of(record).unwrap();
    assert_eq!(ptr.zone, narrow);
    assert_eq!(ptr.name, "1");
    assert_eq!(engine.store().records_in_zone(wide).count(), 0);
}

#[test]
fn test_reverse_zone_rename_moves_coverage() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    let reverse = add_zone(&mut engine, "0.0.10.in-addr.arpa", None);
    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");
    assert!(engine.store().ptr_record_of(record).is_some());

    // Renaming the reverse zone to cover a different /24 orphans the
    // address; the PTR must disappear with the coverage.
    engine
        .change_zone(
            reverse,
            ZoneChange {
                name: Some("1.0.10.in-addr.arpa".to_string()),
                ..ZoneChange::default()
            },
        )
        .unwrap();
    assert!(engine.store().ptr_record_of(record).is_none());
    assert_eq!(engine.store().records_in_zone(reverse).count(), 0);
}

#[test]
fn test_zone_view_move_rescopes_resolution() {
    let mut engine = engine();
    let view = engine.add_view("internal").unwrap();
    let forward = add_zone(&mut engine, "example.com", None);
    let reverse = add_zone(&mut engine, "0.0.10.in-addr.arpa", None);
    let record = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");
    assert!(engine.store().ptr_record_of(record).is_some());

    // Moving the reverse zone into a view detaches it from the global
    // forward zone.
    engine
        .change_zone(
            reverse,
            ZoneChange {
                view: Some(Some(view)),
                ..ZoneChange::default()
            },
        )
        .unwrap();
    assert!(engine.store().ptr_record_of(record).is_none());

    // Moving it back restores the pairing.
    engine
        .change_zone(
            reverse,
            ZoneChange {
                view: Some(None),
                ..ZoneChange::default()
            },
        )
        .unwrap();
    assert!(engine.store().ptr_record_of(record).is_some());
    assert!(engine.store().check_consistency().is_ok());
}

// ============================================================================
// Batch Mutations
// ============================================================================

#[test]
fn test_bulk_bootstrap_in_one_unit_of_work() {
    let mut engine = engine();
    let applied = engine
        .apply_all(vec![
            Mutation::CreateView {
                name: "internal".to_string(),
            },
            Mutation::CreateZone(NewZone {
                name: "example.com".to_string(),
                ..NewZone::default()
            }),
            Mutation::CreateZone(NewZone {
                name: "0.0.10.in-addr.arpa".to_string(),
                ..NewZone::default()
            }),
        ])
        .unwrap();
    assert_eq!(applied.len(), 3);
    assert_eq!(engine.store().zone_count(), 2);
    assert_eq!(engine.store().view_count(), 1);
}

#[test]
fn test_bulk_record_import_derives_every_ptr() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    add_zone(&mut engine, "0.0.10.in-addr.arpa", None);

    let batch: Vec<Mutation> = (1..=20)
        .map(|i| {
            Mutation::CreateRecord(NewRecord {
                zone: forward,
                name: format!("host{i}"),
                rtype: RecordType::A,
                value: format!("10.0.0.{i}"),
                ..NewRecord::default()
            })
        })
        .collect();
    engine.apply_all(batch).unwrap();

    let ptrs = engine
        .store()
        .records()
        .filter(|r| r.managed && r.rtype == RecordType::PTR)
        .count();
    assert_eq!(ptrs, 20);
    assert!(engine.store().check_consistency().is_ok());
}

// ============================================================================
// Data Set Round Trip
// ============================================================================

#[test]
fn test_dataset_round_trip_preserves_derived_links() {
    let mut engine = engine();
    let forward = add_zone(&mut engine, "example.com", None);
    add_zone(&mut engine, "0.0.10.in-addr.arpa", None);
    add_zone(&mut engine, "8.b.d.0.1.0.0.2.ip6.arpa", None);
    let a = add_address(&mut engine, forward, "www", RecordType::A, "10.0.0.1");
    let aaaa = add_address(&mut engine, forward, "www", RecordType::AAAA, "2001:db8::1");

    let rendered = serde_json::to_string(engine.store()).unwrap();
    let restored: revzone::store::Store = serde_json::from_str(&rendered).unwrap();
    assert!(restored.check_consistency().is_ok());

    // A reloaded data set keeps reconciling where the old one left off.
    let mut engine = Engine::with_store(EngineConfig::default(), restored);
    assert!(engine.store().ptr_record_of(a).is_some());
    assert!(engine.store().ptr_record_of(aaaa).is_some());

    engine.remove_record(a).unwrap();
    assert!(engine.store().ptr_record_of(a).is_none());
    assert!(engine.store().check_consistency().is_ok());
}
