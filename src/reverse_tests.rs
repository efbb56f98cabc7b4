// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for reverse-name and label arithmetic.

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use crate::reverse::*;

    fn v4(s: &str) -> IpAddr {
        IpAddr::V4(s.parse::<Ipv4Addr>().unwrap())
    }

    fn v6(s: &str) -> IpAddr {
        IpAddr::V6(s.parse::<Ipv6Addr>().unwrap())
    }

    // ========== Tests for dns_name() ==========

    #[test]
    fn test_dns_name_is_fully_qualified() {
        let name = dns_name("example.com").unwrap();
        assert!(name.is_fqdn(), "Parsed names should be fully qualified");
        assert_eq!(name.num_labels(), 2);
    }

    #[test]
    fn test_dns_name_accepts_trailing_dot() {
        let name = dns_name("example.com.").unwrap();
        assert!(name.is_fqdn());
        assert_eq!(name.num_labels(), 2);
    }

    #[test]
    fn test_dns_name_accepts_rfc2317_range_labels() {
        let name = dns_name("0-15.0.0.10.in-addr.arpa").unwrap();
        assert_eq!(name.num_labels(), 6);
    }

    // ========== Tests for reverse_name() ==========

    #[test]
    fn test_reverse_name_v4_is_under_in_addr_arpa() {
        let reverse = reverse_name(v4("10.0.0.1"));
        let arpa = dns_name("0.0.10.in-addr.arpa").unwrap();
        assert!(
            arpa.zone_of(&reverse),
            "Reverse name should live under the classful arpa zone"
        );
        assert_eq!(reverse.num_labels(), 6, "4 octets plus in-addr.arpa");
    }

    #[test]
    fn test_reverse_name_v6_is_under_ip6_arpa() {
        let reverse = reverse_name(v6("2001:db8::1"));
        let arpa = dns_name("8.b.d.0.1.0.0.2.ip6.arpa").unwrap();
        assert!(
            arpa.zone_of(&reverse),
            "Reverse name should live under the /32 ip6.arpa zone"
        );
        assert_eq!(reverse.num_labels(), 34, "32 nibbles plus ip6.arpa");
    }

    // ========== Tests for rfc2317_label() ==========

    #[test]
    fn test_rfc2317_label_is_final_octet() {
        assert_eq!(rfc2317_label("10.0.0.1".parse().unwrap()), "1");
        assert_eq!(rfc2317_label("10.0.0.21".parse().unwrap()), "21");
        assert_eq!(rfc2317_label("192.0.2.255".parse().unwrap()), "255");
    }

    // ========== Tests for relative_label() ==========

    #[test]
    fn test_relative_label_classful_24() {
        let reverse = reverse_name(v4("10.0.0.1"));
        let zone = dns_name("0.0.10.in-addr.arpa").unwrap();
        assert_eq!(relative_label(&reverse, &zone), Some("1".to_string()));
    }

    #[test]
    fn test_relative_label_classful_16_keeps_two_octets() {
        let reverse = reverse_name(v4("10.0.0.1"));
        let zone = dns_name("0.10.in-addr.arpa").unwrap();
        assert_eq!(relative_label(&reverse, &zone), Some("1.0".to_string()));
    }

    #[test]
    fn test_relative_label_not_an_ancestor() {
        let reverse = reverse_name(v4("10.0.0.1"));
        let zone = dns_name("0.1.10.in-addr.arpa").unwrap();
        assert_eq!(
            relative_label(&reverse, &zone),
            None,
            "A zone not covering the name yields no label"
        );
    }

    #[test]
    fn test_relative_label_equal_names() {
        let zone = dns_name("0.0.10.in-addr.arpa").unwrap();
        assert_eq!(
            relative_label(&zone, &zone),
            None,
            "A name is not relative to itself"
        );
    }

    #[test]
    fn test_relative_label_v6_nibbles() {
        let reverse = reverse_name(v6("2001:db8::1"));
        let zone = dns_name("8.b.d.0.1.0.0.2.ip6.arpa").unwrap();
        let expected = std::iter::once("1")
            .chain(std::iter::repeat("0").take(23))
            .collect::<Vec<_>>()
            .join(".");
        assert_eq!(relative_label(&reverse, &zone), Some(expected));
    }

    // ========== Tests for fqdn() ==========

    #[test]
    fn test_fqdn_regular_record() {
        assert_eq!(fqdn("www", "example.com"), "www.example.com.");
    }

    #[test]
    fn test_fqdn_apex_label() {
        assert_eq!(fqdn("@", "example.com"), "example.com.");
    }

    #[test]
    fn test_fqdn_empty_name_is_apex() {
        assert_eq!(fqdn("", "example.com"), "example.com.");
    }
}
