use crate::SequenceId;

/// Half of the u16 range. Two ids further apart than this are assumed to
/// straddle the wrap point.
pub const WRAP_THRESHOLD: u16 = 32768;

/// Returns whether or not a wrapping number is greater than another
/// sequence_greater_than(2,1) will return true
/// sequence_greater_than(1,2) will return false
/// sequence_greater_than(1,1) will return false
/// sequence_greater_than(0,65535) will return true
pub fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    ((s1 > s2) && (s1 - s2 <= WRAP_THRESHOLD)) || ((s1 < s2) && (s2 - s1 > WRAP_THRESHOLD))
}

/// Returns whether or not a wrapping number is less than another
/// sequence_less_than(1,2) will return true
/// sequence_less_than(65535,0) will return true
pub fn sequence_less_than(s1: u16, s2: u16) -> bool {
    sequence_greater_than(s2, s1)
}

/// Whether raw comparison of the two ids would be misleading because they
/// sit on opposite sides of the wrap point.
pub fn is_wrapped(a: u16, b: u16) -> bool {
    a.abs_diff(b) > WRAP_THRESHOLD
}

/// Signed distance travelled going from `a` to `b`, modulo 65536.
///
/// ```
/// # use ballast_shared::wrapping_diff;
/// assert_eq!(wrapping_diff(1, 2), 1);
/// assert_eq!(wrapping_diff(2, 1), -1);
/// assert_eq!(wrapping_diff(65535, 0), 1);
/// assert_eq!(wrapping_diff(0, 65535), -1);
/// ```
pub fn wrapping_diff(a: u16, b: u16) -> i32 {
    // exactly half the range away reads as behind
    i32::from(b.wrapping_sub(a) as i16)
}

/// Every id strictly between `after` and `before`, walking forward and
/// wrapping through zero. Empty when `before` does not follow `after`.
pub fn ids_between(after: SequenceId, before: SequenceId) -> impl Iterator<Item = SequenceId> {
    let gap = wrapping_diff(after, before);
    let count = if gap > 1 { (gap - 1) as u16 } else { 0 };
    (1..=count).map(move |offset| after.wrapping_add(offset))
}
