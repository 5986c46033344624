//! Access to the package descriptor (`package.json`).

use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{DistPublishError, Result};
use crate::fs::{read_json, write_json};

/// `repository` / `distRepository` as npm allows them: a bare string or an
/// object with a `url`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RepositoryField {
    Url(String),
    Detailed { url: String },
}

impl RepositoryField {
    pub fn url(&self) -> &str {
        match self {
            RepositoryField::Url(url) | RepositoryField::Detailed { url } => url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    name: Option<String>,
    version: Option<String>,
    repository: Option<RepositoryField>,
    dist_repository: Option<RepositoryField>,
    files: Option<Vec<String>>,
}

/// The fields of `package.json` the publish workflow relies on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub path: PathBuf,
    pub name: Option<String>,
    pub version: Option<Version>,
    pub repository: Option<RepositoryField>,
    pub dist_repository: Option<RepositoryField>,
    pub files: Option<Vec<String>>,
}

impl PackageDescriptor {
    pub const FILE_NAME: &'static str = "package.json";

    /// Read `package.json` from `dir`
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::FILE_NAME);
        if !path.is_file() {
            return Err(DistPublishError::package(format!(
                "{} not found",
                path.display()
            )));
        }

        let raw: RawDescriptor = read_json(&path)?;
        let version = raw
            .version
            .as_deref()
            .map(|v| {
                Version::parse(v).map_err(|e| {
                    DistPublishError::package(format!("invalid version '{}': {}", v, e))
                })
            })
            .transpose()?;

        Ok(PackageDescriptor {
            path,
            name: raw.name,
            version,
            repository: raw.repository,
            dist_repository: raw.dist_repository,
            files: raw.files,
        })
    }

    /// Like [`read`](Self::read) but a missing file is `None`
    pub fn read_optional(dir: &Path) -> Result<Option<Self>> {
        if dir.join(Self::FILE_NAME).is_file() {
            Self::read(dir).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.repository.as_ref().map(RepositoryField::url)
    }

    pub fn dist_repository_url(&self) -> Option<&str> {
        self.dist_repository.as_ref().map(RepositoryField::url)
    }
}

/// Point the descriptor at `path` to the destination repository.
///
/// Only `name` and `repository.url` change; every other field and the key
/// order are preserved.
pub fn rewrite_for_destination(path: &Path, name: &str, url: &str) -> Result<()> {
    let mut value: Value = read_json(path)?;
    let object = value.as_object_mut().ok_or_else(|| {
        DistPublishError::package(format!("{} is not a JSON object", path.display()))
    })?;

    object.insert("name".to_string(), Value::String(name.to_string()));

    match object.get_mut("repository") {
        Some(Value::Object(repository)) => {
            repository.insert("url".to_string(), Value::String(url.to_string()));
        }
        _ => {
            let mut repository = Map::new();
            repository.insert("type".to_string(), Value::String("git".to_string()));
            repository.insert("url".to_string(), Value::String(url.to_string()));
            object.insert("repository".to_string(), Value::Object(repository));
        }
    }

    write_json(path, &value)
}
