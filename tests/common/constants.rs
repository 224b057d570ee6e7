//! Shared constants for end-to-end tests
//!
//! When test data changes (catalog layout, the report secret, etc.),
//! update only this file.

// ============================================================================
// Timeouts
// ============================================================================

pub const REQUEST_TIMEOUT_SECS: u64 = 5;
pub const SERVER_READY_TIMEOUT_MS: u64 = 5_000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

// ============================================================================
// Report access
// ============================================================================

/// Bearer secret the test server is configured with
pub const TEST_SECRET: &str = "test-report-secret";

// ============================================================================
// Test catalog layout
// ============================================================================

/// Artist directory with an artist.json profile ("The Test Band")
pub const ARTIST_1_SLUG: &str = "theband";

/// Artist directory without a profile
pub const ARTIST_2_SLUG: &str = "solo";

/// Track key for "Opening" on "First" by theband
pub const TRACK_1_KEY: &str = "music/theband/Album. First/01 Opening.mp3";

/// Track key for "Closing" on "First" by theband
pub const TRACK_2_KEY: &str = "music/theband/Album. First/02 Closing.mp3";

/// Track key for "Hush" on the "Quiet" EP by solo
pub const TRACK_3_KEY: &str = "music/solo/EP. Quiet/01 Hush.ogg";
