//! Guest account file fixtures and on-disk helpers

use std::path::{Path, PathBuf};

/// A guest account file as exported by the game client
pub fn guest_file(uid: &str, password: &str) -> String {
    format!(
        r#"{{
  "guest_account_info": {{
    "com.garena.msdk.guest_uid": "{uid}",
    "com.garena.msdk.guest_password": "{password}"
  }},
  "last_login_platform": 4
}}"#
    )
}

/// A guest account file lacking the password key
pub fn guest_file_without_password(uid: &str) -> String {
    format!(r#"{{"guest_account_info": {{"com.garena.msdk.guest_uid": "{uid}"}}}}"#)
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write fixture");
    path
}

/// Multipart boundary used by [`multipart_body`]
pub const BOUNDARY: &str = "guest-toolhub-it-boundary";

/// Build a multipart/form-data body with one file part per `(filename, content)`
pub fn multipart_body(files: &[(&str, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (filename, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body.into_bytes()
}
