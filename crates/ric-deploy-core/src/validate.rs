//! Input validators for collected deployment parameters.
//!
//! All predicates are total over their string domain. The only side effect
//! lives in [`validate_directory`], and whether it happens is decided by the
//! caller-supplied confirmation.

use std::net::IpAddr;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{DeployError, Result};

/// True iff `s` is an IPv4 or IPv6 address literal.
///
/// No hostname resolution or reachability check is attempted.
pub fn validate_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// True iff `s` is a base-10 port number in `1..=65535`.
///
/// Only ASCII digits are accepted: no sign, no surrounding whitespace.
pub fn validate_port(s: &str) -> bool {
    parse_port(s).is_some()
}

/// Parse a port literal, returning `None` for anything [`validate_port`] rejects.
pub fn parse_port(s: &str) -> Option<u16> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match s.parse::<u32>() {
        Ok(n) if (1..=65535).contains(&n) => Some(n as u16),
        _ => None,
    }
}

/// True if `path` is an existing directory, or `confirm` agreed to create it
/// and creation succeeded.
///
/// Creation failures are logged and reported as `false`.
pub fn validate_directory(path: &Path, confirm: impl FnOnce(&Path) -> bool) -> bool {
    match ensure_directory(path, confirm) {
        Ok(ready) => ready,
        Err(e) => {
            warn!(event = "directory.create_failed", path = %path.display(), error = %e);
            false
        }
    }
}

/// Like [`validate_directory`] but surfaces the creation error.
///
/// Returns `Ok(false)` when the directory is missing and the caller declined
/// to create it.
pub fn ensure_directory(path: &Path, confirm: impl FnOnce(&Path) -> bool) -> Result<bool> {
    if path.is_dir() {
        return Ok(true);
    }
    if !confirm(path) {
        debug!(path = %path.display(), "directory creation declined");
        return Ok(false);
    }
    std::fs::create_dir_all(path).map_err(|source| DeployError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "directory created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_ip_accepts_literals() {
        for ip in ["127.0.0.1", "192.168.1.1", "10.0.0.1", "172.16.0.1", "::1", "fe80::1"] {
            assert!(validate_ip(ip), "{ip} should be valid");
        }
    }

    #[test]
    fn test_validate_ip_rejects_garbage() {
        for ip in ["256.1.1.1", "invalid", "192.168.1", "192.168.1.1.1", "", " 10.0.0.1"] {
            assert!(!validate_ip(ip), "{ip} should be invalid");
        }
    }

    #[test]
    fn test_validate_port_bounds() {
        for port in ["1", "80", "443", "8080", "36421", "65535"] {
            assert!(validate_port(port), "{port} should be valid");
        }
        for port in ["0", "65536", "invalid", "-1", "99999", "", " 80", "+80", "4294967297"] {
            assert!(!validate_port(port), "{port} should be invalid");
        }
    }

    #[test]
    fn test_parse_port_value() {
        assert_eq!(parse_port("36421"), Some(36421));
        assert_eq!(parse_port("0"), None);
    }

    #[test]
    fn test_existing_directory_skips_confirmation() {
        let dir = tempdir().unwrap();
        let ok = validate_directory(dir.path(), |_| panic!("should not ask"));
        assert!(ok);
    }

    #[test]
    fn test_missing_directory_created_on_confirm() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("c");

        assert!(validate_directory(&target, |_| true));
        assert!(target.is_dir());
    }

    #[test]
    fn test_missing_directory_declined() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("configs");

        assert!(!validate_directory(&target, |_| false));
        assert!(!target.exists());
    }

    #[test]
    fn test_creation_failure_is_reported() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain-file");
        std::fs::write(&file, b"x").unwrap();
        let target = file.join("child");

        assert!(!validate_directory(&target, |_| true));
        let err = ensure_directory(&target, |_| true).unwrap_err();
        assert!(matches!(err, DeployError::DirectoryCreation { .. }));
    }
}
