use std::collections::HashMap;
use std::path::PathBuf;

/// What a packaging command needs to know about the run
#[derive(Debug, Clone)]
pub struct PackContext {
    /// Working tree of the destination clone
    pub target: PathBuf,
    /// Working tree of the development repository
    pub source: PathBuf,
    /// Package name from the descriptor
    pub package: String,
    /// Package version from the descriptor
    pub version: String,
}

impl PackContext {
    /// Convert context to environment variables for the packaging command
    ///
    /// Maps context fields to DIST_PUBLISH_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert(
            "DIST_PUBLISH_TARGET".to_string(),
            self.target.display().to_string(),
        );
        env.insert(
            "DIST_PUBLISH_SOURCE".to_string(),
            self.source.display().to_string(),
        );
        env.insert("DIST_PUBLISH_PACKAGE".to_string(), self.package.clone());
        env.insert("DIST_PUBLISH_VERSION".to_string(), self.version.clone());

        env
    }
}
