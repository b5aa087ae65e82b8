use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

/// `local@domain.tld`, compared as written (no case folding).
pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+promo@mail.example.co"));
        assert!(is_valid_email("Mixed.Case@Example.ORG"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["not-an-email", "a@b", "@b.com", "a@.c", "a b@c.com", "a@b.c", ""] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn password_length_boundary() {
        assert!(!is_valid_password("1234567"));
        assert!(is_valid_password("12345678"));
    }
}
