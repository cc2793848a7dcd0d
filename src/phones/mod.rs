pub mod normalize;
pub mod patterns;
pub mod validate;

use std::collections::HashSet;

use regex::Captures;
use tracing::trace;

use patterns::{group, LOCAL, NATIONAL};

/// Numbers already produced for one body by the national pass.
#[derive(Default)]
struct Session {
    seen: HashSet<String>,
}

/// Two-pass scan: national numbers, then local numbers not already found.
///
/// Output is in scan order, national matches first. Calling again on the same
/// text yields the same sequence.
pub fn extract(text: &str) -> Vec<String> {
    let mut session = Session::default();
    let mut phones = Vec::new();

    for phone in national_numbers(text) {
        session.seen.insert(phone.clone());
        phones.push(phone);
    }
    phones.extend(local_numbers(text, &session.seen));

    phones
}

/// First pass: numbers written with an area code.
pub fn national_numbers(text: &str) -> impl Iterator<Item = String> + '_ {
    NATIONAL
        .captures_iter(text)
        .map(|caps| normalize::national(&caps))
        .filter(|phone| accept(phone))
}

/// Second pass: bare subscriber numbers, placed in the default city.
///
/// Matches that carry a country marker or area code belong to the first
/// pass and are dropped, as is anything already in `seen`.
pub fn local_numbers<'a>(
    text: &'a str,
    seen: &'a HashSet<String>,
) -> impl Iterator<Item = String> + 'a {
    LOCAL
        .captures_iter(text)
        .filter(|caps| is_bare(caps))
        .map(|caps| normalize::local(&caps))
        .filter(|phone| accept(phone))
        .filter(move |phone| !seen.contains(phone))
}

/// No marker, no area code; a single leading space is allowed.
fn is_bare(caps: &Captures) -> bool {
    matches!(group(caps, "prefix"), "" | " ") && caps.name("area").is_none()
}

fn accept(phone: &str) -> bool {
    let ok = validate::is_valid(phone);
    if !ok {
        trace!(phone, "Dropped candidate with wrong length");
    }
    ok
}
