//! Records shared between the SSH backend, the CLI and the UI.

use serde::{Deserialize, Serialize};

/// A public key found in the key directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    /// SHA256 fingerprint (e.g. "SHA256:abc...")
    pub key_pid: String,
    /// Full contents of the `.pub` line
    pub public_key: String,
    /// Key comment, usually an email address
    pub email: String,
    /// Whether the key is currently loaded in the ssh-agent
    pub is_active: bool,
    /// Key algorithm as ssh-keygen prints it (e.g. "ED25519", "RSA")
    pub key_type: String,
    /// Public key file name, used for removal
    pub filename: String,
}

impl Key {
    /// Base name of the key pair (file name without `.pub`)
    pub fn name(&self) -> &str {
        self.filename.strip_suffix(".pub").unwrap_or(&self.filename)
    }

    /// Shortened fingerprint for compact display
    pub fn short_fingerprint(&self) -> &str {
        let body = self.key_pid.strip_prefix("SHA256:").unwrap_or(&self.key_pid);
        body.get(..12).unwrap_or(body)
    }
}

/// Raw `ssh-keygen -lv` output for one public key file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKeyInfo {
    pub filename: String,
    pub key_info: String,
}

/// Per-key feedback flags for the key context menu.
///
/// `copy` is raised after the public key was copied and `remove` while a
/// removal is waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyMenuTrigger {
    pub copy: bool,
    pub remove: bool,
}

impl KeyMenuTrigger {
    pub fn is_raised(&self) -> bool {
        self.copy || self.remove
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> Key {
        Key {
            key_pid: "SHA256:abcdefghijklmnopqrstuvwxyz".to_string(),
            public_key: "ssh-ed25519 AAAA me@example.com".to_string(),
            email: "me@example.com".to_string(),
            is_active: true,
            key_type: "ED25519".to_string(),
            filename: "id_ed25519.pub".to_string(),
        }
    }

    #[test]
    fn test_key_serializes_camel_case() {
        let value = serde_json::to_value(sample_key()).unwrap();
        assert_eq!(value["keyPid"], "SHA256:abcdefghijklmnopqrstuvwxyz");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["keyType"], "ED25519");
        assert_eq!(value["publicKey"], "ssh-ed25519 AAAA me@example.com");
    }

    #[test]
    fn test_key_name_and_short_fingerprint() {
        let key = sample_key();
        assert_eq!(key.name(), "id_ed25519");
        assert_eq!(key.short_fingerprint(), "abcdefghijkl");
    }

    #[test]
    fn test_trigger_default_is_lowered() {
        let trigger = KeyMenuTrigger::default();
        assert!(!trigger.is_raised());
        assert!(KeyMenuTrigger { copy: true, remove: false }.is_raised());
    }
}
