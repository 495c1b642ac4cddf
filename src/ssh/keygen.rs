//! Public key discovery in the key directory.
//!
//! Keys are read natively for listings. `ssh-keygen -lv` is only used to
//! produce the raw description shown by `keys info`.

use chrono::{DateTime, Local};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use super::SshError;
use super::fingerprint::PublicKeyLine;
use crate::types::{Key, SshKeyInfo};

const PUB_EXTENSION: &str = "pub";

/// The user's `~/.ssh` directory
pub fn default_ssh_dir() -> Result<PathBuf, SshError> {
    let dirs = directories::BaseDirs::new().ok_or(SshError::NoHomeDir)?;
    Ok(dirs.home_dir().join(".ssh"))
}

/// Key directory to use, honoring a configured override
pub fn ssh_dir(configured: Option<&str>) -> Result<PathBuf, SshError> {
    match configured.map(str::trim).filter(|d| !d.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => default_ssh_dir(),
    }
}

/// List `*.pub` files in `dir`, sorted by file name
pub fn scan_public_keys(dir: &Path) -> Result<Vec<PathBuf>, SshError> {
    let entries = fs::read_dir(dir).map_err(|_| SshError::KeyDirUnreadable(dir.to_path_buf()))?;

    let mut keys: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some(PUB_EXTENSION))
        .collect();

    keys.sort();
    tracing::debug!("Found {} public keys in {:?}", keys.len(), dir);
    Ok(keys)
}

/// One line of `ssh-keygen -l` / `ssh-add -l` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintLine {
    pub bits: u32,
    pub fingerprint: String,
    pub comment: String,
    pub key_type: String,
}

/// Parse `<bits> <fingerprint> <comment...> (<TYPE>)`
pub fn parse_fingerprint_line(line: &str) -> Option<FingerprintLine> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(\d+)\s+(\S+)\s+(.*?)\s*\(([^()]+)\)\s*$").unwrap_or_else(|e| {
            panic!("Invalid fingerprint pattern: {}", e);
        })
    });

    let caps = re.captures(line.trim())?;
    Some(FingerprintLine {
        bits: caps[1].parse().ok()?,
        fingerprint: caps[2].to_string(),
        comment: caps[3].to_string(),
        key_type: caps[4].to_string(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Run `ssh-keygen -lv -f <path>` and capture its output.
///
/// Failures are recorded in `key_info` rather than returned, so one broken
/// file does not hide the others.
pub fn describe_file(ssh_keygen: &str, path: &Path) -> SshKeyInfo {
    let output = Command::new(ssh_keygen).arg("-lv").arg("-f").arg(path).output();

    let key_info = match output {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).to_string(),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr).to_string();
            format!("Error for {}: {}", path.display(), err)
        }
        Err(e) => format!("Failed to run ssh-keygen for {}: {}", path.display(), e),
    };

    SshKeyInfo {
        filename: file_name(path),
        key_info,
    }
}

/// Describe every public key in `dir` with ssh-keygen
pub async fn describe(ssh_keygen: String, dir: PathBuf) -> Result<Vec<SshKeyInfo>, SshError> {
    tokio::task::spawn_blocking(move || {
        let infos: Vec<SshKeyInfo> = scan_public_keys(&dir)?
            .iter()
            .map(|path| describe_file(&ssh_keygen, path))
            .collect();
        Ok(infos)
    })
    .await
    .map_err(|_| SshError::Cancelled)?
}

/// Build a [`Key`] from a `.pub` file.
///
/// The first non-blank, non-comment line is used.
pub fn read_key(path: &Path, agent_fingerprints: &HashSet<String>) -> Result<Key, SshError> {
    let content = fs::read_to_string(path)?;
    let line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .ok_or_else(|| SshError::InvalidPublicKey(format!("{} is empty", path.display())))?;

    let parsed = PublicKeyLine::parse(line)?;
    let key_pid = parsed.fingerprint();

    Ok(Key {
        is_active: agent_fingerprints.contains(&key_pid),
        key_pid,
        public_key: line.to_string(),
        email: parsed.comment.clone(),
        key_type: parsed.key_type(),
        filename: file_name(path),
    })
}

/// Read every public key in `dir`, skipping unreadable ones
pub fn read_keys(dir: &Path, agent_fingerprints: &HashSet<String>) -> Result<Vec<Key>, SshError> {
    let mut keys = Vec::new();
    for path in scan_public_keys(dir)? {
        match read_key(&path, agent_fingerprints) {
            Ok(key) => keys.push(key),
            Err(e) => tracing::warn!("Skipping {:?}: {}", path, e),
        }
    }
    Ok(keys)
}

/// Load all keys in `dir`, marking the ones loaded in the agent.
///
/// Agent problems are logged and treated as "nothing loaded".
pub async fn load_keys(dir: PathBuf, ssh_add: String) -> Result<Vec<Key>, SshError> {
    tokio::task::spawn_blocking(move || {
        let loaded = if super::agent::is_running() {
            match super::agent::loaded_keys(&ssh_add) {
                Ok(lines) => super::agent::loaded_fingerprints(&lines),
                Err(e) => {
                    tracing::warn!("Could not query ssh-agent: {}", e);
                    HashSet::new()
                }
            }
        } else {
            HashSet::new()
        };

        read_keys(&dir, &loaded)
    })
    .await
    .map_err(|_| SshError::Cancelled)?
}

/// Last modification time of a key file
pub fn key_modified(dir: &Path, filename: &str) -> Option<DateTime<Local>> {
    let modified = fs::metadata(dir.join(filename)).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified))
}

/// Accept `id_ed25519` or `id_ed25519.pub` and return the `.pub` form
pub fn normalize_key_filename(name: &str) -> String {
    let name = name.trim();
    if name.ends_with(".pub") {
        name.to_string()
    } else {
        format!("{}.pub", name)
    }
}

/// Validate a public key file name used for lookups and removal
pub fn validate_key_filename(filename: &str) -> Result<(), SshError> {
    let invalid = || SshError::InvalidKeyName(filename.to_string());

    let stem = filename.strip_suffix(".pub").ok_or_else(invalid)?;
    if stem.is_empty() || stem.starts_with('.') {
        return Err(invalid());
    }
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(invalid());
    }
    Ok(())
}

/// Read the public key line of `filename` in `dir`
pub fn public_key_line(dir: &Path, filename: &str) -> Result<String, SshError> {
    validate_key_filename(filename)?;
    let path = dir.join(filename);
    if !path.is_file() {
        return Err(SshError::KeyNotFound(filename.to_string()));
    }
    Ok(read_key(&path, &HashSet::new())?.public_key)
}

/// Delete a key pair: `<name>.pub` and, if present, the private key `<name>`.
///
/// Returns the paths that were removed.
pub fn remove_key_pair(dir: &Path, filename: &str) -> Result<Vec<PathBuf>, SshError> {
    validate_key_filename(filename)?;

    let public = dir.join(filename);
    if !public.is_file() {
        return Err(SshError::KeyNotFound(filename.to_string()));
    }

    let mut removed = Vec::new();
    fs::remove_file(&public)?;
    removed.push(public);

    if let Some(stem) = filename.strip_suffix(".pub") {
        let private = dir.join(stem);
        if private.is_file() {
            fs::remove_file(&private)?;
            removed.push(private);
        }
    }

    tracing::info!("Removed key pair {} ({} files)", filename, removed.len());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ED25519_LINE: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIMZwp7cmjwuXXCcHxTVCe+wYns3vHFKsGg2pA3+JJwnw alice@example.com";
    const ED25519_FP: &str = "SHA256:ImKaZ9BOykh7ugmlRsVQxMmfNczfELlOmF8H5jRA210";

    fn key_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("id_ed25519.pub"), format!("{}\n", ED25519_LINE)).unwrap();
        fs::write(dir.path().join("id_ed25519"), "private").unwrap();
        fs::write(dir.path().join("broken.pub"), "not a key\n").unwrap();
        fs::write(dir.path().join("known_hosts"), "host data\n").unwrap();
        fs::create_dir(dir.path().join("folder.pub")).unwrap();
        dir
    }

    #[test]
    fn test_scan_only_pub_files_sorted() {
        let dir = key_dir();
        let found: Vec<String> = scan_public_keys(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(found, vec!["broken.pub", "id_ed25519.pub"]);
    }

    #[test]
    fn test_scan_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_public_keys(&missing),
            Err(SshError::KeyDirUnreadable(_))
        ));
    }

    #[test]
    fn test_read_keys_skips_broken_and_marks_active() {
        let dir = key_dir();
        let mut loaded = HashSet::new();
        loaded.insert(ED25519_FP.to_string());

        let keys = read_keys(dir.path(), &loaded).unwrap();
        assert_eq!(keys.len(), 1);
        let key = &keys[0];
        assert_eq!(key.key_pid, ED25519_FP);
        assert_eq!(key.email, "alice@example.com");
        assert_eq!(key.key_type, "ED25519");
        assert_eq!(key.filename, "id_ed25519.pub");
        assert_eq!(key.public_key, ED25519_LINE);
        assert!(key.is_active);

        let keys = read_keys(dir.path(), &HashSet::new()).unwrap();
        assert!(!keys[0].is_active);
    }

    #[test]
    fn test_parse_fingerprint_line() {
        let line = "256 SHA256:ImKaZ9BOykh7ugmlRsVQxMmfNczfELlOmF8H5jRA210 alice@example.com (ED25519)";
        let parsed = parse_fingerprint_line(line).unwrap();
        assert_eq!(parsed.bits, 256);
        assert_eq!(parsed.fingerprint, ED25519_FP);
        assert_eq!(parsed.comment, "alice@example.com");
        assert_eq!(parsed.key_type, "ED25519");
    }

    #[test]
    fn test_parse_fingerprint_line_comment_with_spaces() {
        let parsed = parse_fingerprint_line("3072 SHA256:abc Alice on laptop (RSA)\n").unwrap();
        assert_eq!(parsed.bits, 3072);
        assert_eq!(parsed.comment, "Alice on laptop");
        assert_eq!(parsed.key_type, "RSA");

        let parsed = parse_fingerprint_line("256 SHA256:abc (ED25519)").unwrap();
        assert_eq!(parsed.comment, "");

        assert!(parse_fingerprint_line("The agent has no identities.").is_none());
    }

    #[test]
    fn test_validate_key_filename() {
        assert!(validate_key_filename("id_ed25519.pub").is_ok());
        assert!(validate_key_filename("work key.pub").is_ok());
        assert!(validate_key_filename("id_ed25519").is_err());
        assert!(validate_key_filename(".pub").is_err());
        assert!(validate_key_filename("../id.pub").is_err());
        assert!(validate_key_filename("sub/id.pub").is_err());
        assert!(validate_key_filename("sub\\id.pub").is_err());
    }

    #[test]
    fn test_normalize_key_filename() {
        assert_eq!(normalize_key_filename("id_rsa"), "id_rsa.pub");
        assert_eq!(normalize_key_filename("id_rsa.pub"), "id_rsa.pub");
    }

    #[test]
    fn test_remove_key_pair_deletes_both_files() {
        let dir = key_dir();
        let removed = remove_key_pair(dir.path(), "id_ed25519.pub").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!dir.path().join("id_ed25519.pub").exists());
        assert!(!dir.path().join("id_ed25519").exists());
        // Unrelated files stay
        assert!(dir.path().join("known_hosts").exists());
    }

    #[test]
    fn test_remove_public_only_and_missing() {
        let dir = key_dir();
        let removed = remove_key_pair(dir.path(), "broken.pub").unwrap();
        assert_eq!(removed, vec![dir.path().join("broken.pub")]);

        assert!(matches!(
            remove_key_pair(dir.path(), "broken.pub"),
            Err(SshError::KeyNotFound(_))
        ));
        assert!(matches!(
            remove_key_pair(dir.path(), "../etc.pub"),
            Err(SshError::InvalidKeyName(_))
        ));
    }

    #[test]
    fn test_public_key_line() {
        let dir = key_dir();
        assert_eq!(public_key_line(dir.path(), "id_ed25519.pub").unwrap(), ED25519_LINE);
        assert!(matches!(
            public_key_line(dir.path(), "other.pub"),
            Err(SshError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_key_modified() {
        let dir = key_dir();
        assert!(key_modified(dir.path(), "id_ed25519.pub").is_some());
        assert!(key_modified(dir.path(), "missing.pub").is_none());
    }

    #[test]
    fn test_ssh_dir_override() {
        assert_eq!(ssh_dir(Some("/tmp/keys")).unwrap(), PathBuf::from("/tmp/keys"));
    }

    #[cfg(unix)]
    #[test]
    fn test_describe_file_records_tool_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.pub");
        fs::write(&path, "not a key\n").unwrap();

        // `false` runs but exits non-zero, like ssh-keygen on a junk file
        let info = describe_file("false", &path);
        assert_eq!(info.filename, "bad.pub");
        assert!(info.key_info.starts_with(&format!("Error for {}: ", path.display())));
    }

    #[tokio::test]
    async fn test_describe_keeps_going_without_ssh_keygen() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.pub"), format!("{}\n", ED25519_LINE)).unwrap();
        fs::write(dir.path().join("bad.pub"), "not a key\n").unwrap();

        let infos = describe("/nonexistent/ssh-keygen".to_string(), dir.path().to_path_buf())
            .await
            .unwrap();

        let names: Vec<&str> = infos.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["a.pub", "bad.pub"]);
        let expected = format!(
            "Failed to run ssh-keygen for {}: ",
            dir.path().join("bad.pub").display()
        );
        assert!(infos[1].key_info.starts_with(&expected));
        assert!(infos[0].key_info.starts_with("Failed to run ssh-keygen for "));
    }

    #[tokio::test]
    async fn test_describe_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = describe("ssh-keygen".to_string(), dir.path().join("missing")).await;
        assert!(matches!(result, Err(SshError::KeyDirUnreadable(_))));
    }
}
