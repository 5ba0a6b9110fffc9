//! Shared test helpers for building guest files and ToolHub instances.

use crate::combiner::{ACCOUNT_INFO_KEY, PASSWORD_KEY, UID_KEY};
use crate::config::Config;
use crate::hub::ToolHub;
use std::time::Duration;
use tempfile::tempdir;

/// A well-formed guest account file
pub(crate) fn guest_file(uid: &str, password: &str) -> String {
    serde_json::json!({
        ACCOUNT_INFO_KEY: {
            UID_KEY: uid,
            PASSWORD_KEY: password,
        }
    })
    .to_string()
}

/// A guest account file whose password key is absent
pub(crate) fn guest_file_without_password(uid: &str) -> String {
    serde_json::json!({
        ACCOUNT_INFO_KEY: {
            UID_KEY: uid,
        }
    })
    .to_string()
}

/// Helper to create a test ToolHub that writes into a temporary directory.
///
/// When `ban_check_endpoint` is given, lookups go to that URL (usually a
/// wiremock server). Returns the hub and the tempdir (which must be kept alive).
pub(crate) fn create_test_hub(ban_check_endpoint: Option<String>) -> (ToolHub, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();

    let mut config = Config::default();
    config.combiner.output_dir = temp_dir.path().join("out");
    config.ban_check.timeout = Duration::from_secs(5);
    if let Some(endpoint) = ban_check_endpoint {
        config.ban_check.endpoint = endpoint;
    }

    let hub = ToolHub::new(config).unwrap();
    (hub, temp_dir)
}
