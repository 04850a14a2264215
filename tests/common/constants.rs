//! Shared constants for end-to-end tests

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Polling interval when waiting for server state (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// How long a client waits for an expected broadcast (milliseconds)
pub const MESSAGE_TIMEOUT_MS: u64 = 5000;

/// How long a client waits before concluding no message is coming (milliseconds)
pub const QUIET_PERIOD_MS: u64 = 300;

// ============================================================================
// Event names
// ============================================================================

pub const CLIENT_DATA: &str = "client_data";
pub const UPDATE_DATA: &str = "update_data";
