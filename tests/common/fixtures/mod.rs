//! This module provides reusable test utilities:
//! - Temporary database-backed environments
//! - Test configuration builders
//! - Common settings shortcuts

// Allow unused code in test fixtures - they are utilities for future tests
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod test_config;
pub mod test_env;

// Re-export commonly used items
pub use test_config::TestConfigBuilder;
pub use test_env::TestEnv;
