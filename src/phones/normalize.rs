use regex::Captures;

use super::patterns::group;

/// Leading digit of every canonical number, whatever marker the text used.
pub const TRUNK_PREFIX: char = '8';
/// City code assumed for numbers written without one (Moscow).
pub const DEFAULT_CITY_CODE: &str = "495";

/// `8` + area code + subscriber digits.
pub fn national(caps: &Captures) -> String {
    let mut phone = String::with_capacity(11);
    phone.push(TRUNK_PREFIX);
    push_digits(&mut phone, group(caps, "code"));
    push_digits(&mut phone, group(caps, "subscriber"));
    phone
}

/// `8495` + subscriber digits from whichever local layout matched.
pub fn local(caps: &Captures) -> String {
    let subscriber = caps
        .name("short")
        .or_else(|| caps.name("long"))
        .map_or("", |m| m.as_str());

    let mut phone = String::with_capacity(11);
    phone.push(TRUNK_PREFIX);
    phone.push_str(DEFAULT_CITY_CODE);
    push_digits(&mut phone, subscriber);
    phone
}

/// Append `raw` without hyphens, spaces or parentheses.
fn push_digits(out: &mut String, raw: &str) {
    out.extend(raw.chars().filter(|c| !matches!(c, '-' | ' ' | '(' | ')')));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phones::patterns::{LOCAL, NATIONAL};

    fn national_of(text: &str) -> String {
        national(&NATIONAL.captures(text).unwrap())
    }

    #[test]
    fn marker_does_not_change_canonical_form() {
        let expected = "84950210213";
        for text in [
            "7 (495) 021-02-13",
            "8 (495) 021-02-13",
            "+7 (495) 021-02-13",
            "(495) 021-02-13",
        ] {
            assert_eq!(national_of(text), expected, "{text}");
        }
    }

    #[test]
    fn strips_parentheses_and_separators() {
        assert_eq!(national_of("8(895)0210212"), "88950210212");
        assert_eq!(national_of("(395) 021 02 13"), "83950210213");
    }

    #[test]
    fn no_length_check_here() {
        // 5-digit area code plus a long subscriber: too long, but not our call.
        assert_eq!(national_of("87950210211"), "887950210211");
    }

    #[test]
    fn local_gets_default_city_code() {
        assert_eq!(local(&LOCAL.captures("456-33-22").unwrap()), "84954563322");
        assert_eq!(local(&LOCAL.captures("4-55-55-33").unwrap()), "84954555533");
    }
}
