//! Rolling name hash used to pre-filter name lookups

/// Hash a name the way fragment names are indexed
///
/// Walks the string backwards in strides of `(len >> 5) + 1`, so long names
/// are only sampled. Bytes are added sign-extended, as the format's tooling
/// treated names as signed chars. Collisions are expected; callers must
/// confirm a match by comparing the full string.
pub fn name_hash(key: &[u8]) -> u32 {
    let len = key.len() as u32;
    let step = (len >> 5) + 1;
    let mut h = len;
    let mut i = len;

    while i >= step {
        let byte = key[(i - 1) as usize] as i8 as i32 as u32;
        h ^= (h << 5).wrapping_add(h >> 2).wrapping_add(byte);
        i -= step;
    }

    h
}
