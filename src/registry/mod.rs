//! Deletion of registry keys left behind by the application

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        use self::windows as platform;
    } else {
        mod unsupported;
        use self::unsupported as platform;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hive {
    #[serde(rename = "HKLM")]
    LocalMachine,
    #[serde(rename = "HKCU")]
    CurrentUser,
    #[serde(rename = "HKCR")]
    ClassesRoot,
    #[serde(rename = "HKU")]
    Users,
}

impl Hive {
    pub fn name(self) -> &'static str {
        match self {
            Hive::LocalMachine => "HKEY_LOCAL_MACHINE",
            Hive::CurrentUser => "HKEY_CURRENT_USER",
            Hive::ClassesRoot => "HKEY_CLASSES_ROOT",
            Hive::Users => "HKEY_USERS",
        }
    }
}

/// A key to delete. When `subkey` is set, `path` is opened and `subkey` is deleted beneath it,
/// otherwise `path` itself is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryKey {
    pub hive: Hive,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subkey: Option<String>,
}

impl Display for RegistryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\\{}", self.hive.name(), self.path)?;
        if let Some(subkey) = &self.subkey {
            write!(f, "\\{}", subkey)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Permission denied deleting {0}, run as administrator")]
    PermissionDenied(RegistryKey),
    #[error("Unable to delete {key}: error code {code}")]
    Os { key: RegistryKey, code: u32 },
    #[error("Registry is not available on this platform")]
    Unsupported,
}

/// Deletes the registry key described by `key`
pub fn delete_key(key: &RegistryKey) -> Result<RegistryOutcome, RegistryError> {
    log::info!("Deleting registry key {}", key);
    let outcome = platform::delete_key(key)?;
    if outcome == RegistryOutcome::NotFound {
        log::debug!("Registry key {} does not exist", key);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radar() -> RegistryKey {
        RegistryKey {
            hive: Hive::LocalMachine,
            path: r"SOFTWARE\Microsoft\RADAR\HeapLeakDetection\DiagnosedApplications".to_owned(),
            subkey: Some("Kiro.exe".to_owned()),
        }
    }

    #[test]
    fn display() {
        assert_eq!(
            radar().to_string(),
            r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\RADAR\HeapLeakDetection\DiagnosedApplications\Kiro.exe"
        );
        let key = RegistryKey {
            hive: Hive::CurrentUser,
            path: r"Software\Kiro".to_owned(),
            subkey: None,
        };
        assert_eq!(key.to_string(), r"HKEY_CURRENT_USER\Software\Kiro");
    }

    #[test]
    fn hive_short_names() {
        let key: RegistryKey =
            serde_json::from_str(r#"{"hive": "HKCU", "path": "Software\\Kiro"}"#).unwrap();
        assert_eq!(key.hive, Hive::CurrentUser);
        assert_eq!(key.subkey, None);
        let json = serde_json::to_string(&radar()).unwrap();
        assert!(json.contains(r#""hive":"HKLM""#));
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_platform() {
        assert!(matches!(
            delete_key(&radar()),
            Err(RegistryError::Unsupported)
        ));
    }
}
