//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Credentials
// =============================================================================

/// Maximum accepted password length in bytes (hashing primitive input limit)
pub const MAX_CREDENTIAL_BYTES: usize = 72;

/// Default minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default number of character classes a password must draw from
pub const MIN_PASSWORD_CHARACTER_CLASSES: usize = 3;

// =============================================================================
// Usernames
// =============================================================================

/// Minimum username length
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 32;

// =============================================================================
// Sessions
// =============================================================================

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "jwt";

/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Path both session cookies are scoped to
pub const SESSION_COOKIE_PATH: &str = "/";

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Default refresh token lifetime in days
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Longest accepted access token lifetime (one day)
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime
pub const MAX_REFRESH_TOKEN_TTL_DAYS: i64 = 365;

/// Default deadline for a single store operation, in seconds
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per minute (for token expiration calculation)
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Seconds per day (for token expiration calculation)
pub const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// Responses
// =============================================================================

/// Confirmation message returned on successful registration
pub const REGISTRATION_COMPLETED: &str = "Account registration completed successfully";
