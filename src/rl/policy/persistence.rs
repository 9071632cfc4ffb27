//! JSON persistence for the shared Q-table.
//!
//! ```text
//! { "version": 1,
//!   "entries": [ { "observation": "##e@...", "action": "up", "value": -1.5 }, ... ] }
//! ```
//!
//! Observations are stored as their category codes. Entries are written in
//! [`SharedPolicy::entries`] order, so saving the same table twice produces
//! identical bytes.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::table::SharedPolicy;
use crate::rl::observation::{InvalidCode, ObservationKey};
use crate::world::Action;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// Errors raised while reading or writing a policy file.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Policy I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed policy document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported policy format version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    InvalidObservation(#[from] InvalidCode),
}

#[derive(Debug, Serialize, Deserialize)]
struct PolicyDocument {
    version: u32,
    entries: Vec<PolicyEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PolicyEntry {
    observation: String,
    action: Action,
    value: f64,
}

/// Loads a policy from `path`.
///
/// A missing file is not an error: it yields an empty table so that a first
/// run can start from scratch.
pub fn load_policy(path: impl AsRef<Path>) -> Result<SharedPolicy, PolicyError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("No policy at {}, starting from an empty table", path.display());
            return Ok(SharedPolicy::new());
        }
        Err(e) => return Err(e.into()),
    };
    let policy = read_policy(BufReader::new(file))?;
    log::info!("Loaded {} observations from {}", policy.len(), path.display());
    Ok(policy)
}

/// Saves `policy` to `path`, replacing any existing file.
///
/// The document is written to a `.tmp` sibling first and renamed over `path`,
/// so an interrupted save leaves the previous file intact.
pub fn save_policy(path: impl AsRef<Path>, policy: &SharedPolicy) -> Result<(), PolicyError> {
    let path = path.as_ref();
    let tmp = temp_sibling(path);
    let mut writer = BufWriter::new(File::create(&tmp)?);
    write_policy(&mut writer, policy)?;
    writer.flush()?;
    drop(writer);
    fs::rename(&tmp, path)?;
    log::info!("Saved {} observations to {}", policy.len(), path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Parses a policy document from `reader`.
pub fn read_policy<R: Read>(reader: R) -> Result<SharedPolicy, PolicyError> {
    let doc: PolicyDocument = serde_json::from_reader(reader)?;
    if doc.version != FORMAT_VERSION {
        return Err(PolicyError::UnsupportedVersion(doc.version));
    }
    let mut policy = SharedPolicy::new();
    for entry in doc.entries {
        let key: ObservationKey = entry.observation.parse()?;
        policy.set(key, entry.action, entry.value);
    }
    Ok(policy)
}

/// Writes `policy` as a policy document to `writer`.
pub fn write_policy<W: Write>(writer: W, policy: &SharedPolicy) -> Result<(), PolicyError> {
    let doc = PolicyDocument {
        version: FORMAT_VERSION,
        entries: policy
            .entries()
            .into_iter()
            .map(|(key, action, value)| PolicyEntry {
                observation: key.to_string(),
                action,
                value,
            })
            .collect(),
    };
    serde_json::to_writer(writer, &doc)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(codes: &str) -> ObservationKey {
        codes.parse().unwrap()
    }

    fn sample() -> SharedPolicy {
        let mut policy = SharedPolicy::new();
        policy.set(key("##e#@e.*m"), Action::Up, 0.1 + 0.2);
        policy.set(key("##e#@e.*m"), Action::Right, -1.0 / 3.0);
        policy.set(key("AAA.@.***"), Action::Left, 1e-300);
        policy.set(key("eeeee@eee"), Action::Down, 12345.678901234567);
        policy
    }

    #[test]
    fn roundtrip_is_bit_exact() {
        let policy = sample();
        let mut buf = Vec::new();
        write_policy(&mut buf, &policy).unwrap();
        let back = read_policy(buf.as_slice()).unwrap();
        for (k, a, v) in policy.entries() {
            assert_eq!(back.value(&k, a).to_bits(), v.to_bits());
        }
        assert_eq!(back, policy);
    }

    #[test]
    fn output_is_deterministic() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_policy(&mut a, &sample()).unwrap();
        write_policy(&mut b, &sample().clone()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn document_layout() {
        let mut policy = SharedPolicy::new();
        policy.set(key("@"), Action::Left, 2.5);
        let mut buf = Vec::new();
        write_policy(&mut buf, &policy).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(r#"{"version":1,"entries":["#));
        assert!(text.contains(r#"{"observation":"@","action":"left","value":2.5}"#));
    }

    #[test]
    fn unsupported_version_rejected() {
        let doc = r#"{"version":2,"entries":[]}"#;
        assert!(matches!(
            read_policy(doc.as_bytes()),
            Err(PolicyError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn invalid_code_rejected() {
        let doc = r#"{"version":1,"entries":[{"observation":"@?","action":"up","value":1.0}]}"#;
        assert!(matches!(
            read_policy(doc.as_bytes()),
            Err(PolicyError::InvalidObservation(InvalidCode('?')))
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            read_policy("not json".as_bytes()),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_loads_empty_table() {
        let path = std::env::temp_dir().join("prospector-missing-policy-7f3a.json");
        let _ = std::fs::remove_file(&path);
        let policy = load_policy(&path).unwrap();
        assert!(policy.is_empty());
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "prospector-policy-{}.json",
            std::process::id()
        ));
        let policy = sample();
        save_policy(&path, &policy).unwrap();
        let back = load_policy(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn save_replaces_existing_file_without_leftovers() {
        let path = std::env::temp_dir().join(format!(
            "prospector-overwrite-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "stale contents").unwrap();

        let mut policy = SharedPolicy::new();
        policy.set(key("e@e"), Action::Right, 4.0);
        save_policy(&path, &policy).unwrap();

        let back = load_policy(&path).unwrap();
        let tmp_exists = temp_sibling(&path).exists();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, policy);
        assert!(!tmp_exists);
    }
}
