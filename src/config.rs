//! Configuration file loading.
//!
//! `tsbindgen.json` carries the policy knobs plus run-level settings.
//! Unknown keys fail the load - a typoed knob silently falling back to
//! its default is worse than an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tsbind_common::policy::Policy;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct BindgenConfig {
    pub policy: Policy,
    /// Output directory for emitted artifacts and diagnostics.
    pub out_dir: Option<PathBuf>,
    /// Symbol-graph dumps to ingest, relative to the config file.
    pub assemblies: Vec<PathBuf>,
}

/// Load and parse a config file. Paths in `assemblies` are rebased
/// onto the config file's directory.
pub fn load_config(path: &Path) -> Result<BindgenConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config `{}`", path.display()))?;
    let mut config: BindgenConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config `{}`", path.display()))?;
    if let Some(dir) = path.parent() {
        config.assemblies = config
            .assemblies
            .into_iter()
            .map(|p| if p.is_absolute() { p } else { dir.join(p) })
            .collect();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_parses_policy_and_rebases_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tsbindgen.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "policy": {{"emission": {{"nameTransform": "camelCase"}}}},
                "outDir": "out",
                "assemblies": ["dumps/core.json"]
            }}"#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.policy.emission.name_transform,
            tsbind_common::policy::NameTransform::CamelCase
        );
        assert_eq!(config.assemblies[0], dir.path().join("dumps/core.json"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tsbindgen.json");
        std::fs::write(&path, r#"{"policies": {}}"#).unwrap();
        assert!(load_config(&path).is_err());
    }
}
