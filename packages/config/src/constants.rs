// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of the environment variables read by inactive-user

// Storage
pub const INACTIVE_USER_DB_PATH: &str = "INACTIVE_USER_DB_PATH";

// Site identity (mail template variables and default administrator address)
pub const INACTIVE_USER_SITE_NAME: &str = "INACTIVE_USER_SITE_NAME";
pub const INACTIVE_USER_SITE_URL: &str = "INACTIVE_USER_SITE_URL";
pub const INACTIVE_USER_SITE_MAIL: &str = "INACTIVE_USER_SITE_MAIL";

// Logging
pub const INACTIVE_USER_LOG: &str = "INACTIVE_USER_LOG";

// System Environment Variables
pub const HOME: &str = "HOME";

// Defaults
pub const DEFAULT_SITE_NAME: &str = "Site";
pub const DEFAULT_SITE_URL: &str = "http://localhost";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration namespace the policy keys live under
pub const SETTINGS_NAMESPACE: &str = "inactive_user.settings";
