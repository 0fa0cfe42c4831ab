//! The cleaning tasks offered by the menu and CLI, each reported as one line per step

use crate::config::CleanerConfig;
use crate::folders::{delete_folder, FolderOutcome};
use crate::registry::{delete_key, RegistryOutcome};
use crate::reset::{apply_reset, ResetOutcome};
use enum_iterator::Sequence;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Success,
    Warning,
    Failure,
}

impl StepStatus {
    pub fn symbol(self) -> &'static str {
        match self {
            StepStatus::Success => "[✓]",
            StepStatus::Warning => "[!]",
            StepStatus::Failure => "[x]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub status: StepStatus,
    pub message: String,
}

impl StepReport {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Success,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Warning,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Failure,
            message: message.into(),
        }
    }
}

impl Display for StepReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.symbol(), self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence)]
pub enum Task {
    Uninstall,
    CleanRegistry,
    ResetMachineId,
    RunAll,
}

impl Task {
    pub fn title(self) -> &'static str {
        match self {
            Task::Uninstall => "Uninstall (delete folders)",
            Task::CleanRegistry => "Clean registry keys",
            Task::ResetMachineId => "Reset Machine ID in storage.json",
            Task::RunAll => "Do everything in sequence",
        }
    }
}

/// Everything the tasks need to know about the target application
#[derive(Debug, Clone)]
pub struct Tasks {
    config: CleanerConfig,
    storage_file: PathBuf,
}

impl Tasks {
    pub fn new(config: CleanerConfig) -> Self {
        let storage_file = config.storage_file();
        Self {
            config,
            storage_file,
        }
    }

    /// Overrides the storage.json location from the config
    pub fn with_storage_file(mut self, path: PathBuf) -> Self {
        self.storage_file = path;
        self
    }

    /// Display name of the application being cleaned
    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn run(&self, task: Task) -> Vec<StepReport> {
        log::debug!("Running task {:?}", task);
        match task {
            Task::Uninstall => uninstall(&self.config.folder_paths()),
            Task::CleanRegistry => clean_registry(&self.config),
            Task::ResetMachineId => reset_machine_id(&self.storage_file),
            Task::RunAll => enum_iterator::all::<Task>()
                .filter(|t| *t != Task::RunAll)
                .flat_map(|t| self.run(t))
                .collect(),
        }
    }
}

pub fn uninstall(folders: &[PathBuf]) -> Vec<StepReport> {
    folders
        .iter()
        .map(|folder| match delete_folder(folder) {
            Ok(FolderOutcome::Deleted) => {
                StepReport::success(format!("Folder deleted: {}", folder.display()))
            }
            Ok(FolderOutcome::NotFound) => {
                StepReport::warning(format!("Folder not found: {}", folder.display()))
            }
            Err(e) => {
                log::error!("{:#}", e);
                StepReport::failure(e.to_string())
            }
        })
        .collect()
}

pub fn clean_registry(config: &CleanerConfig) -> Vec<StepReport> {
    config
        .registry_keys
        .iter()
        .map(|key| match delete_key(key) {
            Ok(RegistryOutcome::Deleted) => StepReport::success(format!("Key deleted: {}", key)),
            Ok(RegistryOutcome::NotFound) => {
                StepReport::warning(format!("Key not found: {}", key))
            }
            Err(e) => {
                log::error!("{:#}", e);
                StepReport::failure(e.to_string())
            }
        })
        .collect()
}

pub fn reset_machine_id(storage_file: &Path) -> Vec<StepReport> {
    let mut reports = vec![];
    let outcome = match apply_reset(storage_file) {
        Ok(o) => o,
        Err(e) => {
            log::error!("{:#}", e);
            reports.push(StepReport::failure(e.to_string()));
            return reports;
        }
    };
    reports.push(match outcome.backup() {
        Some(backup) => StepReport::success(format!("Backup created: {}", backup.display())),
        None => StepReport::warning("Backup could not be created"),
    });
    reports.push(match &outcome {
        ResetOutcome::Updated { keys, .. } => StepReport::success(format!(
            "{} updated with: {}",
            storage_file.display(),
            keys.join(", ")
        )),
        ResetOutcome::NoTargetKeysFound { .. } => StepReport::warning(format!(
            "No target keys found in {}",
            storage_file.display()
        )),
    });
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::MACHINE_ID;
    use tempfile::tempdir;

    #[test]
    fn report_display() {
        assert_eq!(StepReport::success("done").to_string(), "[✓] done");
        assert_eq!(StepReport::warning("hmm").to_string(), "[!] hmm");
        assert_eq!(StepReport::failure("bad").to_string(), "[x] bad");
    }

    #[test]
    fn uninstall_reports_each_folder() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present");
        std::fs::create_dir(&present).unwrap();
        let reports = uninstall(&[present.clone(), dir.path().join("absent")]);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].status, StepStatus::Success);
        assert_eq!(reports[1].status, StepStatus::Warning);
        assert!(!present.exists());
    }

    #[test]
    fn reset_missing_storage_file() {
        let dir = tempdir().unwrap();
        let reports = reset_machine_id(&dir.path().join("storage.json"));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, StepStatus::Failure);
    }

    #[test]
    fn reset_reports_backup_and_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"telemetry.machineId": "old"}"#).unwrap();
        let reports = reset_machine_id(&path);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].status, StepStatus::Success);
        assert!(reports[0].message.starts_with("Backup created"));
        assert_eq!(reports[1].status, StepStatus::Success);
        assert!(reports[1].message.ends_with(MACHINE_ID));
    }

    #[test]
    fn reset_without_target_keys_warns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"other": true}"#).unwrap();
        let reports = reset_machine_id(&path);
        assert_eq!(reports[1].status, StepStatus::Warning);
    }

    #[test]
    fn app_name_comes_from_config() {
        let config = CleanerConfig {
            app_name: "Editor".to_owned(),
            ..Default::default()
        };
        assert_eq!(Tasks::new(config).app_name(), "Editor");
        assert_eq!(Tasks::new(CleanerConfig::default()).app_name(), "Kiro");
    }

    #[test]
    fn run_all_continues_after_failures() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("Kiro");
        std::fs::create_dir(&folder).unwrap();
        let config = CleanerConfig {
            folders: vec![folder.to_string_lossy().into_owned()],
            registry_keys: vec![],
            ..Default::default()
        };
        let tasks = Tasks::new(config).with_storage_file(dir.path().join("missing.json"));
        let reports = tasks.run(Task::RunAll);
        // one folder, no registry keys, one failed reset
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].status, StepStatus::Success);
        assert_eq!(reports[1].status, StepStatus::Failure);
        assert!(!folder.exists());
    }
}
