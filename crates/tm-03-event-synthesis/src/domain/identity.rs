//! Deterministic synthetic IPv4 derivation.

use shared_types::{Direction, Timestamp};
use std::io::Cursor;
use std::net::Ipv4Addr;

const IP_HASH_SEED: u32 = 0x7A3D_1F05;

/// Derive a unicast-looking address from `(region, direction, timestamp)`.
///
/// Identical inputs always give identical output. The first octet lies in
/// `1..=223`; the remaining octets lie in `1..=254`.
pub fn derive_synthetic_ip(region_name: &str, direction: Direction, timestamp: Timestamp) -> Ipv4Addr {
    let key = format!("{region_name}|{}|{timestamp}", direction.as_str());
    let mut cursor = Cursor::new(key.as_bytes());
    // Reading from an in-memory cursor cannot fail.
    let hash = murmur3::murmur3_32(&mut cursor, IP_HASH_SEED).unwrap_or(0);
    let [a, b, c, d] = hash.to_be_bytes();

    Ipv4Addr::new((a % 223) + 1, (b % 254) + 1, (c % 254) + 1, (d % 254) + 1)
}
