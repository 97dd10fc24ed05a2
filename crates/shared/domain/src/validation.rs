//! Registration validation rules.
//!
//! Pure checks only: no store or network access. The first failing rule
//! decides the outcome.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::constants::{
    MAX_USERNAME_LENGTH, MIN_PASSWORD_CHARACTER_CLASSES, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
};
use crate::error::{DomainError, DomainResult};
use crate::registration::RegistrationRequest;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid username regex"));

/// Frequently breached passwords, compared case-insensitively.
const COMMON_PASSWORDS: &[&str] = &[
    "123456",
    "12345678",
    "123456789",
    "1234567890",
    "password",
    "password1",
    "password123",
    "passw0rd",
    "p@ssw0rd",
    "p@ssword1",
    "qwerty",
    "qwerty123",
    "qwertyuiop",
    "abc123",
    "abcd1234",
    "111111",
    "iloveyou",
    "letmein",
    "letmein1",
    "welcome",
    "welcome1",
    "welcome123",
    "admin",
    "admin123",
    "monkey",
    "dragon",
    "football",
    "baseball",
    "sunshine",
    "princess",
    "trustno1",
    "changeme",
    "changeme123",
    "superman",
    "starwars",
    "zaq12wsx",
    "1q2w3e4r",
    "1qaz2wsx",
    "secret123",
    "master123",
];

/// Allowed shape of a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernamePolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for UsernamePolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_USERNAME_LENGTH,
            max_length: MAX_USERNAME_LENGTH,
        }
    }
}

impl UsernamePolicy {
    /// ASCII letters, digits, `_`, `.` and `-`, starting with a letter or digit.
    pub fn allows(&self, username: &str) -> bool {
        let length = username.chars().count();
        length >= self.min_length && length <= self.max_length && USERNAME_PATTERN.is_match(username)
    }
}

/// Password strength requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in characters
    pub min_length: usize,
    /// How many of {lowercase, uppercase, digit, symbol} must appear
    pub min_character_classes: usize,
    /// Reject passwords from the common-password list
    pub reject_common: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            min_character_classes: MIN_PASSWORD_CHARACTER_CLASSES,
            reject_common: true,
        }
    }
}

impl PasswordPolicy {
    /// Check a password against the policy.
    ///
    /// # Errors
    /// Returns `WeakPassword` naming the first unmet requirement.
    pub fn check(&self, password: &str) -> DomainResult<()> {
        if password.chars().count() < self.min_length {
            return Err(DomainError::weak_password(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        if character_classes(password) < self.min_character_classes {
            return Err(DomainError::weak_password(format!(
                "Password must mix at least {} of: lowercase, uppercase, digits, symbols",
                self.min_character_classes
            )));
        }

        if self.reject_common && is_common(password) {
            return Err(DomainError::weak_password("Password is too common"));
        }

        Ok(())
    }
}

fn character_classes(password: &str) -> usize {
    let lower = password.chars().any(|c| c.is_lowercase());
    let upper = password.chars().any(|c| c.is_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    [lower, upper, digit, symbol].iter().filter(|present| **present).count()
}

fn is_common(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|common| *common == lowered)
}

/// Validates registration requests in a fixed precedence.
#[derive(Debug, Clone, Default)]
pub struct RegistrationValidator {
    username: UsernamePolicy,
    password: PasswordPolicy,
}

impl RegistrationValidator {
    pub fn new(username: UsernamePolicy, password: PasswordPolicy) -> Self {
        Self { username, password }
    }

    /// Validate a request; the first failing check wins.
    ///
    /// Order: terms, username, email, confirmation, strength.
    pub fn validate(&self, request: &RegistrationRequest) -> DomainResult<()> {
        if !request.terms_accepted {
            return Err(DomainError::TermsNotAccepted);
        }
        if !self.username.allows(&request.username) {
            return Err(DomainError::InvalidUsername);
        }
        if !request.email.validate_email() {
            return Err(DomainError::InvalidEmail);
        }
        if request.password != request.confirm_password {
            return Err(DomainError::PasswordMismatch);
        }
        self.password.check(&request.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> RegistrationRequest {
        RegistrationRequest::new("alice", "Str0ng!Pass", "Str0ng!Pass", "alice@example.com", true)
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(RegistrationValidator::default().validate(&alice()).is_ok());
    }

    #[test]
    fn test_terms_checked_first() {
        let validator = RegistrationValidator::default();
        let requests = [
            RegistrationRequest::new("alice", "Str0ng!Pass", "Str0ng!Pass", "alice@example.com", false),
            RegistrationRequest::new("", "", "", "", false),
            RegistrationRequest::new("!!", "short", "other", "not-an-email", false),
        ];

        for request in &requests {
            assert_eq!(validator.validate(request), Err(DomainError::TermsNotAccepted));
        }
    }

    #[test]
    fn test_username_checked_before_email() {
        let request = RegistrationRequest::new("a", "Str0ng!Pass", "Str0ng!Pass", "bad", true);
        assert_eq!(
            RegistrationValidator::default().validate(&request),
            Err(DomainError::InvalidUsername)
        );
    }

    #[test]
    fn test_invalid_usernames() {
        let policy = UsernamePolicy::default();
        let too_long = "a".repeat(33);
        let longest = "a".repeat(32);
        for username in ["", "ab", "-alice", "al ice", "alice!", "ålice", too_long.as_str()] {
            assert!(!policy.allows(username), "accepted {:?}", username);
        }
        for username in ["abc", "alice", "alice_b", "a.l-i_c3", longest.as_str()] {
            assert!(policy.allows(username), "rejected {:?}", username);
        }
    }

    #[test]
    fn test_invalid_email() {
        let request = RegistrationRequest::new("alice", "Str0ng!Pass", "Str0ng!Pass", "alice.example.com", true);
        assert_eq!(
            RegistrationValidator::default().validate(&request),
            Err(DomainError::InvalidEmail)
        );
    }

    #[test]
    fn test_mismatch_checked_before_strength() {
        let request = RegistrationRequest::new("alice", "short", "shorter", "alice@example.com", true);
        assert_eq!(
            RegistrationValidator::default().validate(&request),
            Err(DomainError::PasswordMismatch)
        );
    }

    #[test]
    fn test_mismatch_is_exact() {
        let request = RegistrationRequest::new("alice", "Str0ng!Pass", "Str0ng!Pass ", "alice@example.com", true);
        assert_eq!(
            RegistrationValidator::default().validate(&request),
            Err(DomainError::PasswordMismatch)
        );
    }

    #[test]
    fn test_short_password_is_weak() {
        let request = RegistrationRequest::new("alice", "short", "short", "alice@example.com", true);
        assert!(matches!(
            RegistrationValidator::default().validate(&request),
            Err(DomainError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_single_class_password_is_weak() {
        assert!(PasswordPolicy::default().check("alllowercaseletters").is_err());
        assert!(PasswordPolicy::default().check("lowerUPPER").is_err());
        assert!(PasswordPolicy::default().check("lowerUPPER1").is_ok());
    }

    #[test]
    fn test_common_password_is_weak() {
        let policy = PasswordPolicy::default();
        assert!(matches!(policy.check("P@ssw0rd"), Err(DomainError::WeakPassword(_))));

        let lenient = PasswordPolicy {
            reject_common: false,
            ..PasswordPolicy::default()
        };
        assert!(lenient.check("P@ssw0rd").is_ok());
    }

    #[test]
    fn test_policy_is_configurable() {
        let policy = PasswordPolicy {
            min_length: 12,
            min_character_classes: 1,
            reject_common: false,
        };
        assert!(policy.check("Str0ng!Pass").is_err());
        assert!(policy.check("averylongpassphrase").is_ok());
    }

    #[test]
    fn test_rejection_is_repeatable() {
        let validator = RegistrationValidator::default();
        let request = RegistrationRequest::new("alice", "short", "short", "alice@example.com", true);

        assert_eq!(validator.validate(&request), validator.validate(&request));
    }
}
