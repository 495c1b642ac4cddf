//! Native parsing and fingerprinting of OpenSSH public key lines.
//!
//! Fingerprints match what `ssh-keygen -l` prints by default:
//! `SHA256:` followed by the unpadded base64 SHA-256 of the key blob.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use sha2::{Digest, Sha256};

use super::SshError;

/// A parsed `<algorithm> <base64-blob> [comment]` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyLine {
    pub algorithm: String,
    pub blob: Vec<u8>,
    pub comment: String,
}

impl PublicKeyLine {
    /// Parse a single public key line as found in a `.pub` file
    pub fn parse(line: &str) -> Result<Self, SshError> {
        let invalid = |why: &str| SshError::InvalidPublicKey(why.to_string());

        // Fields may be separated by any run of spaces or tabs
        let line = line.trim();
        let (algorithm, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        if algorithm.is_empty() {
            return Err(invalid("empty line"));
        }
        let rest = rest.trim_start();
        let (encoded, comment) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if encoded.is_empty() {
            return Err(invalid("missing key data"));
        }
        let comment = comment.trim().to_string();

        let blob = STANDARD
            .decode(encoded)
            .map_err(|e| invalid(&format!("bad base64: {}", e)))?;

        // The blob repeats the algorithm name as a length-prefixed string
        match blob_algorithm(&blob) {
            Some(inner) if inner == algorithm => {}
            Some(inner) => {
                return Err(invalid(&format!(
                    "algorithm mismatch: {} vs {}",
                    algorithm, inner
                )));
            }
            None => return Err(invalid("truncated key data")),
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            blob,
            comment,
        })
    }

    /// `SHA256:` fingerprint of the key blob
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.blob);
        format!("SHA256:{}", STANDARD_NO_PAD.encode(digest))
    }

    /// Key type as `ssh-keygen -l` prints it in parentheses
    pub fn key_type(&self) -> String {
        key_type_label(&self.algorithm)
    }
}

fn blob_algorithm(blob: &[u8]) -> Option<&str> {
    let len_bytes: [u8; 4] = blob.get(..4)?.try_into().ok()?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    let name = blob.get(4..4usize.checked_add(len)?)?;
    std::str::from_utf8(name).ok()
}

/// Map an OpenSSH algorithm name to its short label
pub fn key_type_label(algorithm: &str) -> String {
    match algorithm {
        "ssh-ed25519" => "ED25519".to_string(),
        "ssh-rsa" => "RSA".to_string(),
        "ssh-dss" => "DSA".to_string(),
        "sk-ssh-ed25519@openssh.com" => "ED25519-SK".to_string(),
        a if a.starts_with("sk-ecdsa-") => "ECDSA-SK".to_string(),
        a if a.starts_with("ecdsa-sha2-") => "ECDSA".to_string(),
        other => other.to_uppercase(),
    }
}

/// Fingerprint a public key line
pub fn sha256(public_key_line: &str) -> Result<String, SshError> {
    PublicKeyLine::parse(public_key_line).map(|k| k.fingerprint())
}
