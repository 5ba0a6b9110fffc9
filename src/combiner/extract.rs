//! Record extraction from guest account documents.
//!
//! A guest account file is a JSON object of the shape
//!
//! ```json
//! {
//!   "guest_account_info": {
//!     "com.garena.msdk.guest_uid": "123456789",
//!     "com.garena.msdk.guest_password": "ABCDEF"
//!   }
//! }
//! ```
//!
//! Other top-level or nested keys are ignored.

use crate::error::ExtractError;
use crate::types::ParsedRecord;
use serde_json::{Map, Value};

/// Top-level key holding the account object
pub const ACCOUNT_INFO_KEY: &str = "guest_account_info";

/// Key of the UID inside the account object
pub const UID_KEY: &str = "com.garena.msdk.guest_uid";

/// Key of the password inside the account object
pub const PASSWORD_KEY: &str = "com.garena.msdk.guest_password";

/// Parse `text` and extract the (uid, password) record
///
/// # Errors
///
/// - [`ExtractError::Malformed`] if `text` is not valid JSON
/// - [`ExtractError::MissingFields`] if the account object or either of its
///   string fields is absent or has the wrong type
///
/// # Examples
///
/// ```
/// use guest_toolhub::combiner::extract;
///
/// let text = r#"{"guest_account_info": {
///     "com.garena.msdk.guest_uid": "A1",
///     "com.garena.msdk.guest_password": "P1"
/// }}"#;
/// let record = extract(text).unwrap();
/// assert_eq!(record.uid, "A1");
/// assert_eq!(record.password, "P1");
///
/// assert!(extract("not json").is_err());
/// ```
pub fn extract(text: &str) -> Result<ParsedRecord, ExtractError> {
    let document: Value = serde_json::from_str(text)?;

    let info = document
        .get(ACCOUNT_INFO_KEY)
        .and_then(Value::as_object)
        .ok_or(ExtractError::MissingFields {
            field: ACCOUNT_INFO_KEY,
        })?;

    let uid = string_field(info, UID_KEY)?;
    let password = string_field(info, PASSWORD_KEY)?;

    Ok(ParsedRecord::new(uid, password))
}

fn string_field<'a>(info: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, ExtractError> {
    info.get(key)
        .and_then(Value::as_str)
        .ok_or(ExtractError::MissingFields { field: key })
}
