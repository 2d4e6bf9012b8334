//! Property tests for email shape validation
//!
//! The registration check accepts `local@domain.tld` shapes and nothing
//! else; these properties pin the boundary from both sides.

use proptest::prelude::*;

use gatehouse::auth::handlers::register::is_valid_email;

proptest! {
    #[test]
    fn simple_addresses_are_accepted(
        local in "[a-z0-9][a-z0-9._%+-]{0,15}",
        domain in "[a-z0-9]{1,12}",
        tld in "[a-z]{2,6}",
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email), "rejected {}", email);
    }

    #[test]
    fn subdomained_addresses_are_accepted(
        local in "[a-z0-9]{1,16}",
        sub in "[a-z0-9]{1,8}",
        domain in "[a-z0-9]{1,12}",
        tld in "[a-z]{2,6}",
    ) {
        let email = format!("{}@{}.{}.{}", local, sub, domain, tld);
        prop_assert!(is_valid_email(&email), "rejected {}", email);
    }

    #[test]
    fn strings_without_at_sign_are_rejected(s in "[^@]*") {
        prop_assert!(!is_valid_email(&s));
    }

    #[test]
    fn dotless_domains_are_rejected(
        local in "[a-z0-9]{1,16}",
        domain in "[a-z0-9]{1,12}",
    ) {
        let email = format!("{}@{}", local, domain);
        prop_assert!(!is_valid_email(&email));
    }

    #[test]
    fn numeric_tlds_are_rejected(
        local in "[a-z0-9]{1,16}",
        domain in "[a-z0-9]{1,12}",
        tld in "[0-9]{2,4}",
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(!is_valid_email(&email));
    }

    #[test]
    fn multiple_at_signs_are_rejected(
        a in "[a-z0-9]{1,8}",
        b in "[a-z0-9]{1,8}",
        c in "[a-z0-9]{1,8}",
    ) {
        let email = format!("{}@{}@{}.com", a, b, c);
        prop_assert!(!is_valid_email(&email));
    }
}
