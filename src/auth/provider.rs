/**
 * Sign-In Providers
 *
 * The set of authentication methods this service accepts is closed:
 * local credentials plus three third-party identity vendors. Modeling the
 * set as an enum keeps provider dispatch exhaustive at compile time;
 * unknown provider names are rejected where strings enter the system
 * (route parameters), not deep inside the decision logic.
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authentication method used for a sign-in attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Local email + password
    Credentials,
    /// GitHub OAuth
    GitHub,
    /// Google OAuth
    Google,
    /// Sign in with Apple
    Apple,
}

impl Provider {
    /// Canonical lowercase name, as used in route paths and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Credentials => "credentials",
            Provider::GitHub => "github",
            Provider::Google => "google",
            Provider::Apple => "apple",
        }
    }

    /// Whether this provider authenticates through an external redirect flow
    pub fn is_external(self) -> bool {
        !matches!(self, Provider::Credentials)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a provider name outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported provider: {0}")]
pub struct UnsupportedProvider(pub String);

impl FromStr for Provider {
    type Err = UnsupportedProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "credentials" => Ok(Provider::Credentials),
            "github" => Ok(Provider::GitHub),
            "google" => Ok(Provider::Google),
            "apple" => Ok(Provider::Apple),
            _ => Err(UnsupportedProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        assert_eq!("credentials".parse::<Provider>(), Ok(Provider::Credentials));
        assert_eq!("github".parse::<Provider>(), Ok(Provider::GitHub));
        assert_eq!("google".parse::<Provider>(), Ok(Provider::Google));
        assert_eq!("apple".parse::<Provider>(), Ok(Provider::Apple));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("GitHub".parse::<Provider>(), Ok(Provider::GitHub));
        assert_eq!("GOOGLE".parse::<Provider>(), Ok(Provider::Google));
    }

    #[test]
    fn test_parse_unknown_provider() {
        let err = "facebook".parse::<Provider>().unwrap_err();
        assert_eq!(err, UnsupportedProvider("facebook".to_string()));
    }

    #[test]
    fn test_display_round_trips() {
        for p in [
            Provider::Credentials,
            Provider::GitHub,
            Provider::Google,
            Provider::Apple,
        ] {
            assert_eq!(p.to_string().parse::<Provider>(), Ok(p));
        }
    }

    #[test]
    fn test_is_external() {
        assert!(!Provider::Credentials.is_external());
        assert!(Provider::GitHub.is_external());
        assert!(Provider::Google.is_external());
        assert!(Provider::Apple.is_external());
    }
}
