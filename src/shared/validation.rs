use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// US-style ZIP: 5 digits with optional +4
    pub static ref ZIP_REGEX: Regex = Regex::new(r"^\d{5}(-\d{4})?$").unwrap();

    /// Phone: digits with optional separators/leading +, 7-15 digits total
    pub static ref PHONE_REGEX: Regex =
        Regex::new(r"^\+?[0-9][0-9 ().-]{5,18}[0-9]$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_regex_valid() {
        assert!(ZIP_REGEX.is_match("84604"));
        assert!(ZIP_REGEX.is_match("84604-1234"));
    }

    #[test]
    fn test_zip_regex_invalid() {
        assert!(!ZIP_REGEX.is_match("8460")); // too short
        assert!(!ZIP_REGEX.is_match("84604-12")); // bad +4
        assert!(!ZIP_REGEX.is_match("ABCDE")); // letters
        assert!(!ZIP_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("8015551234"));
        assert!(PHONE_REGEX.is_match("+1 801 555-1234"));
        assert!(PHONE_REGEX.is_match("(801) 555-1234"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("12345")); // too short
        assert!(!PHONE_REGEX.is_match("phone")); // letters
        assert!(!PHONE_REGEX.is_match("")); // empty
    }
}
