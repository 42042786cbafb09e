/// Keeps only the digits of a user-entered phone number.
///
/// Returns `None` when nothing is left.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { None } else { Some(digits) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting() {
        assert_eq!(
            normalize_phone("+998 (90) 123-45-67").as_deref(),
            Some("998901234567")
        );
    }

    #[test]
    fn empty_when_no_digits() {
        assert_eq!(normalize_phone("phone"), None);
        assert_eq!(normalize_phone(""), None);
    }
}
