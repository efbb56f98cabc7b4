// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for reverse zone selection.

#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use chrono::Utc;

    use crate::lookup::*;
    use crate::model::{ViewId, Zone, ZoneId};
    use crate::store::Store;

    fn add_zone(store: &mut Store, name: &str, view: Option<ViewId>, prefix: Option<&str>) -> ZoneId {
        store.insert_zone(Zone {
            id: ZoneId(0),
            name: name.to_string(),
            view,
            default_ttl: 86400,
            rfc2317_prefix: prefix.map(|p| p.parse().unwrap()),
            rfc2317_parent_managed: false,
            last_updated: Utc::now(),
        })
    }

    fn addr(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    // ========== Tests for implied_network() ==========

    #[test]
    fn test_implied_network_classful_24() {
        let mut store = Store::new();
        let zone = add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        let net = implied_network(store.zone(zone).unwrap()).unwrap();
        assert_eq!(net.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_implied_network_classful_16() {
        let mut store = Store::new();
        let zone = add_zone(&mut store, "0.10.in-addr.arpa", None, None);
        let net = implied_network(store.zone(zone).unwrap()).unwrap();
        assert_eq!(net.to_string(), "10.0.0.0/16");
    }

    #[test]
    fn test_implied_network_forward_zone_is_none() {
        let mut store = Store::new();
        let zone = add_zone(&mut store, "example.com", None, None);
        assert!(implied_network(store.zone(zone).unwrap()).is_none());
    }

    #[test]
    fn test_implied_network_rfc2317_range_name_is_none() {
        // The dashed range label is not an address component, so the name
        // implies no network; such zones match through their prefix only.
        let mut store = Store::new();
        let zone = add_zone(&mut store, "0-15.0.0.10.in-addr.arpa", None, None);
        assert!(implied_network(store.zone(zone).unwrap()).is_none());
    }

    // ========== Tests for find_reverse_zone() ==========

    #[test]
    fn test_find_reverse_zone_classful_match() {
        let mut store = Store::new();
        let zone = add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        assert_eq!(find_reverse_zone(&store, addr("10.0.0.1"), None), Some(zone));
    }

    #[test]
    fn test_find_reverse_zone_prefers_narrowest_classful() {
        let mut store = Store::new();
        add_zone(&mut store, "0.10.in-addr.arpa", None, None);
        let narrow = add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        assert_eq!(
            find_reverse_zone(&store, addr("10.0.0.1"), None),
            Some(narrow),
            "The /24 should win over the /16"
        );
    }

    #[test]
    fn test_find_reverse_zone_rfc2317_beats_classful() {
        let mut store = Store::new();
        add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        let classless = add_zone(
            &mut store,
            "0-15.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/28"),
        );
        assert_eq!(
            find_reverse_zone(&store, addr("10.0.0.1"), None),
            Some(classless)
        );
    }

    #[test]
    fn test_find_reverse_zone_rfc2317_outside_prefix_falls_back() {
        let mut store = Store::new();
        let classful = add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        add_zone(
            &mut store,
            "0-15.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/28"),
        );
        assert_eq!(
            find_reverse_zone(&store, addr("10.0.0.21"), None),
            Some(classful),
            "Addresses outside the delegated range belong to the classful zone"
        );
    }

    #[test]
    fn test_find_reverse_zone_prefers_narrowest_rfc2317() {
        let mut store = Store::new();
        let wide = add_zone(
            &mut store,
            "0-127.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/25"),
        );
        let narrow = add_zone(
            &mut store,
            "0-15.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/28"),
        );
        assert_eq!(
            find_reverse_zone(&store, addr("10.0.0.1"), None),
            Some(narrow)
        );
        assert_eq!(
            find_reverse_zone(&store, addr("10.0.0.100"), None),
            Some(wide)
        );
    }

    #[test]
    fn test_find_reverse_zone_respects_views() {
        let mut store = Store::new();
        let view = ViewId(99);
        let scoped = add_zone(&mut store, "0.0.10.in-addr.arpa", Some(view), None);
        assert_eq!(
            find_reverse_zone(&store, addr("10.0.0.1"), None),
            None,
            "A view-scoped zone must not match the global partition"
        );
        assert_eq!(
            find_reverse_zone(&store, addr("10.0.0.1"), Some(view)),
            Some(scoped)
        );
    }

    #[test]
    fn test_find_reverse_zone_v6() {
        let mut store = Store::new();
        let zone = add_zone(&mut store, "8.b.d.0.1.0.0.2.ip6.arpa", None, None);
        assert_eq!(
            find_reverse_zone(&store, addr("2001:db8::1"), None),
            Some(zone)
        );
        assert_eq!(find_reverse_zone(&store, addr("2001:db9::1"), None), None);
    }

    #[test]
    fn test_find_reverse_zone_no_candidate() {
        let store = Store::new();
        assert_eq!(find_reverse_zone(&store, addr("10.0.0.1"), None), None);
    }

    // ========== Tests for find_parent_zone() ==========

    #[test]
    fn test_find_parent_zone_24() {
        let mut store = Store::new();
        let parent = add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        let child = add_zone(
            &mut store,
            "0-15.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/28"),
        );
        assert_eq!(find_parent_zone(&store, child), Some(parent));
    }

    #[test]
    fn test_find_parent_zone_prefers_closest() {
        let mut store = Store::new();
        add_zone(&mut store, "0.10.in-addr.arpa", None, None);
        let close = add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        let child = add_zone(
            &mut store,
            "0-15.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/28"),
        );
        assert_eq!(find_parent_zone(&store, child), Some(close));
    }

    #[test]
    fn test_find_parent_zone_falls_back_to_wider() {
        let mut store = Store::new();
        let wide = add_zone(&mut store, "0.10.in-addr.arpa", None, None);
        let child = add_zone(
            &mut store,
            "0-15.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/28"),
        );
        assert_eq!(find_parent_zone(&store, child), Some(wide));
    }

    #[test]
    fn test_find_parent_zone_same_view_only() {
        let mut store = Store::new();
        add_zone(&mut store, "0.0.10.in-addr.arpa", Some(ViewId(7)), None);
        let child = add_zone(
            &mut store,
            "0-15.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.0/28"),
        );
        assert_eq!(find_parent_zone(&store, child), None);
    }

    #[test]
    fn test_find_parent_zone_without_prefix() {
        let mut store = Store::new();
        let zone = add_zone(&mut store, "0.0.10.in-addr.arpa", None, None);
        assert_eq!(find_parent_zone(&store, zone), None);
    }

    // ========== Tests for ptr_label_in_zone() ==========

    #[test]
    fn test_ptr_label_rfc2317_zone_uses_final_octet() {
        let mut store = Store::new();
        let zone = add_zone(
            &mut store,
            "16-31.0.0.10.in-addr.arpa",
            None,
            Some("10.0.0.16/28"),
        );
        assert_eq!(
            ptr_label_in_zone(store.zone(zone).unwrap(), addr("10.0.0.21")),
            Some("21".to_string())
        );
    }

    #[test]
    fn test_ptr_label_classful_zone_uses_relative_name() {
        let mut store = Store::new();
        let zone = add_zone(&mut store, "0.10.in-addr.arpa", None, None);
        assert_eq!(
            ptr_label_in_zone(store.zone(zone).unwrap(), addr("10.0.0.1")),
            Some("1.0".to_string())
        );
    }
}
