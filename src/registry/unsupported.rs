use crate::registry::{RegistryError, RegistryKey, RegistryOutcome};

pub(super) fn delete_key(_key: &RegistryKey) -> Result<RegistryOutcome, RegistryError> {
    Err(RegistryError::Unsupported)
}
