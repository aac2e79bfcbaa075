use xxhash_rust::xxh3::xxh3_64;

/// The FNV prime, folded into the hash input (per go-zero's
/// `consistenthash.go`) for the deterministic collision tie-break in
/// [`crate::store::LocalRingStore::get_node`] and the Redis store's
/// equivalent.
pub(crate) const PRIME: u64 = 16_777_619;

/// `H(data)`, used both for virtual-node placement and for query lookups.
pub(crate) fn hash_bytes(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// `H(repr || i)`: the hash of the `i`-th virtual node for a real node whose
/// canonical string form is `repr`.
pub(crate) fn hash_virtual_node(repr: &str, index: u32) -> u64 {
    let mut buf = String::with_capacity(repr.len() + 10);
    buf.push_str(repr);
    buf.push_str(&index.to_string());
    hash_bytes(buf.as_bytes())
}

/// Deterministically picks one of `chain_len` colliding nodes for a query
/// whose canonical string form is `query_repr`, folding the prime into the
/// hash input the way go-zero's `innerRepr` does (`fmt.Sprintf("%d%v", prime,
/// v)`) rather than applying it to the hash output.
pub(crate) fn tie_break(query_repr: &str, chain_len: usize) -> usize {
    debug_assert!(chain_len > 0);
    let inner_repr = format!("{PRIME}{query_repr}");
    (hash_bytes(inner_repr.as_bytes()) as usize) % chain_len
}
