//! Generation of the telemetry identifiers written into `storage.json`

use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::{Builder, Uuid};

pub const DEV_DEVICE_ID: &str = "telemetry.devDeviceId";
pub const MAC_MACHINE_ID: &str = "telemetry.macMachineId";
pub const MACHINE_ID: &str = "telemetry.machineId";
pub const SQM_ID: &str = "telemetry.sqmId";
pub const SERVICE_MACHINE_ID: &str = "storage.serviceMachineId";

/// Every key an [IdentifierSet] may replace, in the order they are applied
pub const TARGET_KEYS: [&str; 5] = [
    DEV_DEVICE_ID,
    MAC_MACHINE_ID,
    MACHINE_ID,
    SQM_ID,
    SERVICE_MACHINE_ID,
];

/// A freshly generated set of identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSet {
    pub dev_device_id: String,
    pub mac_machine_id: String,
    pub machine_id: String,
    pub sqm_id: String,
    pub service_machine_id: String,
}

impl IdentifierSet {
    /// The values paired with their configuration keys, in [TARGET_KEYS] order
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            (DEV_DEVICE_ID, self.dev_device_id.as_str()),
            (MAC_MACHINE_ID, self.mac_machine_id.as_str()),
            (MACHINE_ID, self.machine_id.as_str()),
            (SQM_ID, self.sqm_id.as_str()),
            (SERVICE_MACHINE_ID, self.service_machine_id.as_str()),
        ]
    }
}

fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Generates a new [IdentifierSet] using the supplied random source.
///
/// The service machine id reuses the device id value. The mac machine id is the SHA-256 of an
/// undashed UUID.
pub fn generate_identifier_set<R: Rng>(rng: &mut R) -> IdentifierSet {
    let dev_device_id = random_uuid(rng).hyphenated().to_string();
    let machine_id = random_uuid(rng).hyphenated().to_string();
    let sqm_id = format!(
        "{{{}}}",
        random_uuid(rng).hyphenated().to_string().to_uppercase()
    );
    let raw = random_uuid(rng).simple().to_string();
    let mac_machine_id = hex::encode(Sha256::digest(raw.as_bytes()));
    IdentifierSet {
        service_machine_id: dev_device_id.clone(),
        dev_device_id,
        mac_machine_id,
        machine_id,
        sqm_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn value_of<'a>(ids: &'a IdentifierSet, key: &str) -> Option<&'a str> {
        ids.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    fn is_canonical_uuid(s: &str) -> bool {
        Uuid::parse_str(s).is_ok() && s.len() == 36 && s.matches('-').count() == 4
    }

    #[test]
    fn all_values_present() {
        let ids = generate_identifier_set(&mut StdRng::seed_from_u64(1));
        for (key, value) in ids.entries() {
            assert!(!value.is_empty(), "{} was empty", key);
        }
    }

    #[test]
    fn device_and_service_ids_match() {
        let ids = generate_identifier_set(&mut rand::rng());
        assert_eq!(ids.dev_device_id, ids.service_machine_id);
    }

    #[test]
    fn uuid_formats() {
        let ids = generate_identifier_set(&mut StdRng::seed_from_u64(7));
        assert!(is_canonical_uuid(&ids.dev_device_id));
        assert_eq!(ids.dev_device_id, ids.dev_device_id.to_lowercase());
        assert!(is_canonical_uuid(&ids.machine_id));
        assert_eq!(ids.machine_id, ids.machine_id.to_lowercase());
        assert_ne!(ids.dev_device_id, ids.machine_id);
        let parsed = Uuid::parse_str(&ids.dev_device_id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn sqm_id_is_braced_upper_case() {
        let ids = generate_identifier_set(&mut StdRng::seed_from_u64(3));
        assert!(ids.sqm_id.starts_with('{'));
        assert!(ids.sqm_id.ends_with('}'));
        let inner = &ids.sqm_id[1..ids.sqm_id.len() - 1];
        assert!(is_canonical_uuid(inner));
        assert_eq!(inner, inner.to_uppercase());
    }

    #[test]
    fn mac_machine_id_is_sha256_hex() {
        let ids = generate_identifier_set(&mut StdRng::seed_from_u64(11));
        assert_eq!(ids.mac_machine_id.len(), 64);
        assert!(ids
            .mac_machine_id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate_identifier_set(&mut StdRng::seed_from_u64(42));
        let b = generate_identifier_set(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        let c = generate_identifier_set(&mut StdRng::seed_from_u64(43));
        assert_ne!(a, c);
    }

    #[test]
    fn successive_calls_differ() {
        let mut rng = rand::rng();
        let a = generate_identifier_set(&mut rng);
        let b = generate_identifier_set(&mut rng);
        for key in TARGET_KEYS {
            assert_ne!(value_of(&a, key), value_of(&b, key));
        }
    }

    #[test]
    fn entries_follow_target_key_order() {
        let ids = generate_identifier_set(&mut StdRng::seed_from_u64(5));
        let keys: Vec<_> = ids.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, TARGET_KEYS);
        assert_eq!(value_of(&ids, SQM_ID), Some(ids.sqm_id.as_str()));
        assert_eq!(value_of(&ids, "unrelated"), None);
    }
}
