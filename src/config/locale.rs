//! Locale matching
//!
//! A locale is a four-part descriptor `realm::region::az::domain` that
//! adapters attach to configuration blocks. `*` matches anything. The
//! process side of the comparison comes from the `REALM`, `REGION`, `AZ` and
//! `DOMAIN` environment variables.

use crate::domain::errors::BootError;
use crate::domain::Result;
use std::fmt;
use std::str::FromStr;

const WILDCARD: &str = "*";

/// A parsed locale descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub realm: String,
    pub region: String,
    pub az: String,
    pub domain: String,
}

impl Locale {
    /// Locale matching every environment (`*::*::*::*`)
    pub fn any() -> Self {
        Self {
            realm: WILDCARD.to_string(),
            region: WILDCARD.to_string(),
            az: WILDCARD.to_string(),
            domain: WILDCARD.to_string(),
        }
    }

    /// Checks this locale against the process environment descriptor
    pub fn matches(&self, env: &LocaleEnv) -> bool {
        part_matches(&self.realm, &env.realm)
            && part_matches(&self.region, &env.region)
            && part_matches(&self.az, &env.az)
            && part_matches(&self.domain, &env.domain)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::any()
    }
}

/// A part matches when it is `*` or equal to the environment value
fn part_matches(part: &str, actual: &str) -> bool {
    part == WILDCARD || part == actual
}

impl FromStr for Locale {
    type Err = BootError;

    /// Parses `realm::region::az::domain`; an empty string means `*::*::*::*`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::any());
        }
        let parts: Vec<&str> = trimmed.split("::").map(str::trim).collect();
        let [realm, region, az, domain] = parts.as_slice() else {
            return Err(BootError::Validation(format!(
                "Invalid locale '{s}'. Expected realm::region::az::domain"
            )));
        };
        Ok(Self {
            realm: realm.to_string(),
            region: region.to_string(),
            az: az.to_string(),
            domain: domain.to_string(),
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}::{}",
            self.realm, self.region, self.az, self.domain
        )
    }
}

/// The process side of a locale comparison
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleEnv {
    pub realm: String,
    pub region: String,
    pub az: String,
    pub domain: String,
}

impl LocaleEnv {
    /// Reads `REALM`, `REGION`, `AZ` and `DOMAIN`; unset variables are empty
    pub fn from_process() -> Self {
        let read = |key: &str| std::env::var(key).unwrap_or_default();
        Self {
            realm: read("REALM"),
            region: read("REGION"),
            az: read("AZ"),
            domain: read("DOMAIN"),
        }
    }
}

/// Parses `locale` and matches it against the process environment
///
/// # Errors
///
/// Returns an error if the locale string is malformed.
pub fn match_locale_with_env(locale: &str) -> Result<bool> {
    Ok(locale.parse::<Locale>()?.matches(&LocaleEnv::from_process()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(realm: &str, region: &str, az: &str, domain: &str) -> LocaleEnv {
        LocaleEnv {
            realm: realm.to_string(),
            region: region.to_string(),
            az: az.to_string(),
            domain: domain.to_string(),
        }
    }

    #[test]
    fn test_parse_and_display() {
        let locale: Locale = "rk::us-east::az1::prod".parse().unwrap();
        assert_eq!(locale.realm, "rk");
        assert_eq!(locale.domain, "prod");
        assert_eq!(locale.to_string(), "rk::us-east::az1::prod");
    }

    #[test]
    fn test_empty_is_wildcard() {
        assert_eq!("".parse::<Locale>().unwrap(), Locale::any());
    }

    #[test]
    fn test_parse_wrong_arity() {
        assert!("rk::us-east".parse::<Locale>().is_err());
        assert!("a::b::c::d::e".parse::<Locale>().is_err());
    }

    #[test]
    fn test_wildcard_matches_anything() {
        assert!(Locale::any().matches(&env("", "", "", "")));
        assert!(Locale::any().matches(&env("rk", "eu", "az2", "test")));
    }

    #[test]
    fn test_exact_parts() {
        let locale: Locale = "*::*::*::prod".parse().unwrap();
        assert!(locale.matches(&env("rk", "eu", "az1", "prod")));
        assert!(!locale.matches(&env("rk", "eu", "az1", "test")));
        assert!(!locale.matches(&env("rk", "eu", "az1", "")));
    }
}
