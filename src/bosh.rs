use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::SpecError;

pub const DEFAULT_SPEC_PATH: &str = "/var/vcap/bosh/spec.json";

/// Identity of the BOSH instance this exporter runs on, from `spec.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstanceSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub deployment: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub az: String,
}

/// A JSON `null` reads as the field's default, e.g. `"az": null` on
/// deployments without availability zones.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn load_instance_spec(path: &Path) -> Result<InstanceSpec, SpecError> {
    let data = std::fs::read(path).map_err(|source| SpecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_instance_spec(&data, path)
}

pub fn parse_instance_spec(data: &[u8], path: &Path) -> Result<InstanceSpec, SpecError> {
    serde_json::from_slice(data).map_err(|source| SpecError::Parse {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spec_and_ignores_extra_keys() {
        let data = br#"{
	"deployment": "test-dev",
	"name": "exporters",
	"index": 0,
	"id": "b36ca4c9-80ce-426a-998e-8b23fd50efe3",
	"az": "z2",
	"other_field": "x"
}"#;
        let spec = parse_instance_spec(data, Path::new("spec.json")).unwrap();
        assert_eq!(spec.deployment, "test-dev");
        assert_eq!(spec.name, "exporters");
        assert_eq!(spec.index, 0);
        assert_eq!(spec.id, "b36ca4c9-80ce-426a-998e-8b23fd50efe3");
        assert_eq!(spec.az, "z2");
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let data = br#"{"deployment":"d","name":"n","index":null,"id":"x","az":null}"#;
        let spec = parse_instance_spec(data, Path::new("spec.json")).unwrap();
        assert_eq!(spec.deployment, "d");
        assert_eq!(spec.index, 0);
        assert_eq!(spec.az, "");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_instance_spec(Path::new("/nonexistent/spec.json")).unwrap_err();
        assert!(matches!(err, SpecError::Read { .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, "not json").unwrap();
        let err = load_instance_spec(&path).unwrap_err();
        assert!(matches!(err, SpecError::Parse { .. }));
    }
}
