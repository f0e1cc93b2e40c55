use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "countup-scenarios")]
    scenarios: HashMap<String, FixtureEntry>,
    #[serde(rename = "format-tables", default)]
    format_tables: HashMap<String, FixtureEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureEntry {
    Path(String),
    Detailed {
        path: String,
        #[allow(dead_code)]
        #[serde(default)]
        description: Option<String>,
    },
}

impl FixtureEntry {
    fn as_path(&self) -> &str {
        match self {
            FixtureEntry::Path(path) => path,
            FixtureEntry::Detailed { path, .. } => path,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

fn sorted_keys<T>(map: &HashMap<String, T>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Scripted animator runs: a config plus a sequence of commands and ticks with
/// the display text expected after each step.
pub mod scenarios {
    use super::*;

    pub fn keys() -> Vec<String> {
        sorted_keys(&MANIFEST.scenarios)
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.scenarios, "count-up scenario", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.scenarios, "count-up scenario", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.scenarios, "count-up scenario", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}

/// Tables of `(value, options) -> expected text` cases for the formatter.
pub mod format_tables {
    use super::*;

    pub fn keys() -> Vec<String> {
        sorted_keys(&MANIFEST.format_tables)
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.format_tables, "format table", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.format_tables, "format table", name)?;
        super::load_json(entry.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_resolves() {
        for key in scenarios::keys() {
            let path = scenarios::path(&key).unwrap();
            assert!(path.exists(), "missing scenario fixture {}", path.display());
        }
        for key in format_tables::keys() {
            format_tables::json(&key).unwrap();
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        let err = scenarios::json("does-not-exist").unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
    }
}
