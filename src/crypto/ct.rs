//! Constant-time equality for hash strings.

/// Returns `true` iff `a` and `b` hold the same bytes.
///
/// Always scans `min(a.len(), b.len())` bytes; the running time does not depend
/// on where the first difference is. Only the shorter length is observable.
pub fn equals(a: &[u8], b: &[u8]) -> bool {
    let (diff, _) = accumulate(a, b);
    diff == 0 && a.len() == b.len()
}

/// ORs the pairwise XOR of the common prefix. Returns the accumulator and the
/// number of byte pairs visited.
#[inline(never)]
fn accumulate(a: &[u8], b: &[u8]) -> (u8, usize) {
    let mut diff = 0u8;
    let mut scanned = 0usize;

    // zip stops at the shorter input
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
        scanned += 1;
    }

    (diff, scanned)
}
