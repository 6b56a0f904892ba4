use ip_cidr_core::{Cidr, IpAddress, Ipv4Address, Ipv6Address};
use rand::Rng;

#[test]
fn test_random_ipv4_text_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let ip = Ipv4Address::new(rng.gen::<u32>());
        let text = ip.to_string();
        assert_eq!(Ipv4Address::parse(text.as_bytes()), Some(ip), "{}", text);
        assert_eq!(
            IpAddress::parse(text.as_bytes()),
            Some(IpAddress::V4(ip)),
            "{}",
            text
        );
    }
}

#[test]
fn test_random_ipv6_text_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let ip = Ipv6Address::new(rng.gen::<u128>());
        let text = ip.to_string();
        assert_eq!(Ipv6Address::parse(text.as_bytes()), Some(ip), "{}", text);
        assert_eq!(
            IpAddress::parse(text.as_bytes()),
            Some(IpAddress::V6(ip)),
            "{}",
            text
        );
    }
}

// sparse addresses exercise the zero-run compression much harder than
// uniformly random ones
#[test]
fn test_sparse_ipv6_text_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let mut segments = [0u16; 8];
        for segment in &mut segments {
            if rng.gen_bool(0.5) {
                *segment = rng.gen::<u16>();
            }
        }
        let ip = Ipv6Address::from_segments(segments);
        let text = ip.to_string();
        assert_eq!(Ipv6Address::parse(text.as_bytes()), Some(ip), "{}", text);
    }
}

#[test]
fn test_ipv6_parse_accepts_uncompressed_upper_case() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let ip = Ipv6Address::new(rng.gen::<u128>());
        let segments = ip.segments();
        let long_form = format!(
            "{:04X}:{:04X}:{:04X}:{:04X}:{:04X}:{:04X}:{:04X}:{:04X}",
            segments[0],
            segments[1],
            segments[2],
            segments[3],
            segments[4],
            segments[5],
            segments[6],
            segments[7]
        );
        assert_eq!(
            Ipv6Address::parse(long_form.as_bytes()),
            Some(ip),
            "{}",
            long_form
        );
    }
}

#[test]
fn test_canonical_form_is_stable() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let text = Ipv6Address::new(rng.gen::<u128>()).to_string();
        let reparsed = Ipv6Address::parse(text.as_bytes()).unwrap();
        assert_eq!(reparsed.to_string(), text);
    }
}

#[test]
fn test_random_ipv4_cidr_containment() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let prefix = Ipv4Address::new(rng.gen::<u32>());
        let prefix_len = rng.gen_range(0..=32u8);
        let net = Cidr::new(prefix, prefix_len);

        let candidate = Ipv4Address::new(rng.gen::<u32>());
        let expected = candidate.value() & net.mask().value() == net.prefix().value();
        assert_eq!(net.contains(candidate), expected, "{} in {}", candidate, net);

        // the network address itself always belongs
        assert!(net.contains(net.prefix()));
        assert!(net.contains(prefix));
    }
}

#[test]
fn test_random_ipv6_cidr_containment() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let prefix = Ipv6Address::new(rng.gen::<u128>());
        let prefix_len = rng.gen_range(0..=128u8);
        let net = Cidr::new(prefix, prefix_len);

        let candidate = Ipv6Address::new(rng.gen::<u128>());
        let expected = candidate.value() & net.mask().value() == net.prefix().value();
        assert_eq!(net.contains(candidate), expected, "{} in {}", candidate, net);

        assert!(net.contains(net.prefix()));
        assert!(net.contains(prefix));

        // a candidate sharing the prefix always belongs
        let inside = Ipv6Address::new(
            net.prefix().value() | (rng.gen::<u128>() & !net.mask().value()),
        );
        assert!(net.contains(inside), "{} in {}", inside, net);
    }
}

#[test]
fn test_random_cidr_text_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let net = Cidr::new(Ipv4Address::new(rng.gen::<u32>()), rng.gen_range(0..=32u8));
        let text = net.to_string();
        assert_eq!(Cidr::parse(text.as_bytes()), Some(net), "{}", text);

        let net = Cidr::new(
            Ipv6Address::new(rng.gen::<u128>()),
            rng.gen_range(0..=128u8),
        );
        let text = net.to_string();
        assert_eq!(Cidr::parse(text.as_bytes()), Some(net), "{}", text);
    }
}

#[test]
fn test_random_binary_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let v4 = Ipv4Address::new(rng.gen::<u32>());
        let mut buf = [0u8; 4];
        assert!(v4.encode(&mut buf));
        assert_eq!(Ipv4Address::from_bytes(&buf), Some(v4));

        let v6 = Ipv6Address::new(rng.gen::<u128>());
        let mut buf = [0u8; 16];
        assert!(v6.encode(&mut buf));
        assert_eq!(Ipv6Address::from_bytes(&buf), Some(v6));
    }
}

#[test]
fn test_serde_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let v4 = Ipv4Address::new(rng.gen::<u32>());
        let json = serde_json::to_string(&v4).unwrap();
        assert_eq!(serde_json::from_str::<Ipv4Address>(&json).unwrap(), v4);

        let v6 = Ipv6Address::new(rng.gen::<u128>());
        let json = serde_json::to_string(&v6).unwrap();
        assert_eq!(serde_json::from_str::<Ipv6Address>(&json).unwrap(), v6);

        let net = Cidr::new(v6, rng.gen_range(0..=128u8));
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(serde_json::from_str::<Cidr<Ipv6Address>>(&json).unwrap(), net);
    }
}

#[test]
fn test_mixed_input_classification() {
    let inputs: &[(&str, Option<&str>)] = &[
        ("192.168.1.98", Some("192.168.1.98")),
        ("2001:DB8:0:0:0:0:0:1", Some("[2001:db8::1]")),
        ("[2001:db8:1111:2222:3333:4444:0:0]", Some("[2001:db8:1111:2222:3333:4444::]")),
        ("::ffff:1.2.3.4", Some("[::ffff:102:304]")),
        ("::", Some("[::]")),
        ("host.example.com", None),
        ("192.168.1.256", None),
        ("1:2:3:4:5:6:7::", None),
    ];

    for &(input, expected) in inputs {
        let canonical = IpAddress::parse(input.as_bytes()).map(|ip| ip.to_string());
        assert_eq!(canonical.as_deref(), expected, "{}", input);
    }
}

#[test]
fn test_v6_network_planning_scenario() {
    let allocation: Cidr<Ipv6Address> = "[2001:db8::]/32".parse().unwrap();
    let customer = Cidr::new(Ipv6Address::parse(b"2001:db8:dead:beef::1").unwrap(), 64);

    assert_eq!(customer.to_string(), "[2001:db8:dead:beef::]/64");
    assert!(allocation.contains(customer.prefix()));
    assert!(customer.contains(Ipv6Address::parse(b"2001:db8:dead:beef::42").unwrap()));
    assert!(!customer.contains(Ipv6Address::parse(b"2001:db8:dead:beff::42").unwrap()));

    let ip = IpAddress::parse(b"2001:db8:dead:beef::42").unwrap();
    assert!(allocation.contains_ip(ip));
    assert!(!allocation.contains_ip(IpAddress::parse(b"10.0.0.1").unwrap()));
}
