//! Phone number display formatting.

/// Format a Kazakh phone number as `+7 (XXX) XXX-XX-XX`.
///
/// Only numbers with exactly eleven digits starting with `7` or `8` are
/// reformatted; anything else is returned unchanged.
#[must_use]
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    if digits.len() != 11 || !(digits.starts_with('7') || digits.starts_with('8')) {
        return phone.to_owned();
    }

    match (
        digits.get(1..4),
        digits.get(4..7),
        digits.get(7..9),
        digits.get(9..11),
    ) {
        (Some(area), Some(first), Some(second), Some(third)) => {
            format!("+7 ({area}) {first}-{second}-{third}")
        }
        _ => phone.to_owned(),
    }
}
