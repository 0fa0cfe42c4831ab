use crate::registry::{Hive, RegistryError, RegistryKey, RegistryOutcome};
use crate::wide::WideString;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND, ERROR_SUCCESS, WIN32_ERROR,
};
use windows::Win32::System::Registry::{
    RegCloseKey, RegDeleteKeyW, RegOpenKeyExW, HKEY, HKEY_CLASSES_ROOT, HKEY_CURRENT_USER,
    HKEY_LOCAL_MACHINE, HKEY_USERS, KEY_ALL_ACCESS,
};

// Closes the handle when dropped
struct OpenKey(HKEY);

impl Drop for OpenKey {
    fn drop(&mut self) {
        unsafe {
            RegCloseKey(self.0);
        }
    }
}

fn predefined(hive: Hive) -> HKEY {
    match hive {
        Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        Hive::CurrentUser => HKEY_CURRENT_USER,
        Hive::ClassesRoot => HKEY_CLASSES_ROOT,
        Hive::Users => HKEY_USERS,
    }
}

fn open_key(root: HKEY, path: &str) -> Result<OpenKey, WIN32_ERROR> {
    let path = path.to_wide();
    let mut handle = HKEY::default();
    let status = unsafe {
        RegOpenKeyExW(
            root,
            PCWSTR::from_raw(path.as_ptr()),
            0,
            KEY_ALL_ACCESS,
            &mut handle,
        )
    };
    if status == ERROR_SUCCESS {
        Ok(OpenKey(handle))
    } else {
        Err(status)
    }
}

fn delete_under(parent: HKEY, name: &str) -> WIN32_ERROR {
    let name = name.to_wide();
    unsafe { RegDeleteKeyW(parent, PCWSTR::from_raw(name.as_ptr())) }
}

pub(super) fn delete_key(key: &RegistryKey) -> Result<RegistryOutcome, RegistryError> {
    let root = predefined(key.hive);
    let status = match &key.subkey {
        Some(subkey) => match open_key(root, &key.path) {
            Ok(parent) => delete_under(parent.0, subkey),
            Err(status) => status,
        },
        None => delete_under(root, &key.path),
    };
    match status {
        ERROR_SUCCESS => Ok(RegistryOutcome::Deleted),
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => Ok(RegistryOutcome::NotFound),
        ERROR_ACCESS_DENIED => Err(RegistryError::PermissionDenied(key.clone())),
        other => Err(RegistryError::Os {
            key: key.clone(),
            code: other.0,
        }),
    }
}
