//! Small numeric helpers shared by the accumulator and worker crates.

/// Returns `1` for a strictly positive value, `-1` for a strictly negative
/// value, and `0` for zero.
///
/// `commit` aligns the sign of the amount it folds into `scalar` to the
/// current sign of the effective vector rather than trusting the caller's
/// `delta` argument — this is the helper that computation uses.
#[inline]
pub fn sign_of(v: i64) -> i64 {
    match v.cmp(&0) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_covers_all_branches() {
        assert_eq!(sign_of(42), 1);
        assert_eq!(sign_of(-42), -1);
        assert_eq!(sign_of(0), 0);
    }
}
