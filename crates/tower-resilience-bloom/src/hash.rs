use xxhash_rust::xxh3::xxh3_64;

/// Default hash count, matching go-zero's fixed `maps = 14` in its
/// Redis-backed filter. The local/Redis Go variants this crate also draws on
/// accept `k` as a parameter, so this is only the default, not a constant.
pub const DEFAULT_HASH_COUNT: u32 = 14;

/// Computes the `k` bit offsets for `data`, each in `[0, m)`.
///
/// Each location is `H(data || byte(i)) mod m` for `i in [0, k)`, following
/// go-zero's `getLocations`: a single hash primitive reused `k` times with a
/// one-byte salt appended per call, rather than `k` independent hash
/// functions.
pub(crate) fn locations(data: &[u8], m: u64, k: u32) -> Vec<u64> {
    let mut buf = Vec::with_capacity(data.len() + 1);
    buf.extend_from_slice(data);
    buf.push(0);
    (0..k)
        .map(|i| {
            *buf.last_mut().unwrap() = i as u8;
            xxh3_64(&buf) % m
        })
        .collect()
}
