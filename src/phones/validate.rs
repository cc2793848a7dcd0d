/// Length of a canonical number: trunk prefix, area code, subscriber.
pub const CANONICAL_LEN: usize = 11;

/// Accept a normalized candidate.
///
/// The patterns already pin down the shape, so the only noise left is digit
/// runs that were read with the wrong split between area code and
/// subscriber. Those come out with the wrong length.
pub fn is_valid(phone: &str) -> bool {
    phone.len() == CANONICAL_LEN && phone.bytes().all(|b| b.is_ascii_digit())
}
