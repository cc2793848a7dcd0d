use std::sync::LazyLock;

use regex::Regex;

/// Number with an explicit area/city code: `[7|8|+7] [(]CODE[)] SUBSCRIBER`.
///
/// Area codes start with 3, 4 or 8 (3xx, 4xx, 8xxx). The subscriber part is
/// loose (digits, hyphens, spaces); the length check after normalization
/// throws out whatever it swallowed by mistake.
pub static NATIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\s)?(?P<prefix>(?:7|8|\+7)?[\- ]?)(?P<area>\(?(?P<code>[348][0-9]{2,4})\)?[\- ]?)(?P<subscriber>[0-9\- ]{5,10})",
    )
    .unwrap()
});

/// Subscriber-only number in `DDD-DD-DD` or `D-DD-DD-DD` layout.
///
/// The optional prefix and area groups are matched so that numbers which do
/// carry them get consumed here and can be rejected by the caller instead of
/// being re-read as a bare local number.
pub static LOCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<prefix>(?:7|8|\+7)?[\- ]?)(?P<area>\(?[348][0-9]{2,4}\)?[\- ]?)?(?P<short>[0-9]{3}-[0-9]{2}-[0-9]{2})|(?P<long>[0-9]-[0-9]{2}-[0-9]{2}-[0-9]{2})",
    )
    .unwrap()
});

/// Group text, or "" when the group did not take part in the match.
pub fn group<'t>(caps: &regex::Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}
