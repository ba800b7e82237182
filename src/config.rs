/// Workspace configuration.
///
/// Two optional files at the workspace root shape what gets indexed:
///
/// - `project.yaml`: the mod project description shared with the build
///   tooling.  Only the fields that locate script sources are read here:
///
///   ```yaml
///   name: MyMod
///   mods: C:/Games/Skyrim/Mods
///   game: sse
///   scripts: "{mods}/MyMod/Scripts/Source"
///   dependencies:
///     skse: "{mods}/SKSE/Scripts/Source"
///   ```
///
///   Path values may use the `{mods}`, `{scripts}`, `{game}` and `{name}`
///   placeholders.
///
/// - `.scribe.toml`: server settings (source extension, extra roots).
///
/// A missing file is not an error; a malformed one is reported as a
/// [`ConfigError`] and the caller falls back to defaults.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

/// File name of the project description.
pub const PROJECT_FILE: &str = "project.yaml";

/// File name of the server settings.
pub const SETTINGS_FILE: &str = ".scribe.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file {}: {source}", path.display())]
    Project {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// The parts of `project.yaml` the indexer cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub mods: String,
    pub game: String,
    /// Script source directory of the project itself.
    pub scripts: String,
    /// Dependency name → script source directory.
    #[serde(deserialize_with = "null_as_default")]
    pub dependencies: BTreeMap<String, String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Unknown Mod".to_string(),
            mods: String::new(),
            game: "sse".to_string(),
            scripts: String::new(),
            dependencies: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Substitute the `{mods}`, `{scripts}`, `{game}` and `{name}`
    /// placeholders in `template`.
    pub fn resolve_path(&self, template: &str) -> String {
        template
            .replace("{mods}", &self.mods)
            .replace("{scripts}", &self.scripts)
            .replace("{game}", &self.game)
            .replace("{name}", &self.name)
    }

    /// The directories to index: the project's own scripts first (when
    /// set), then every dependency.  Relative paths are taken relative to
    /// `workspace_root`.
    pub fn index_roots(&self, workspace_root: &Path) -> Vec<PathBuf> {
        let own = (!self.scripts.is_empty()).then_some(self.scripts.as_str());

        own.into_iter()
            .chain(self.dependencies.values().map(String::as_str))
            .map(|template| workspace_root.join(self.resolve_path(template)))
            .collect()
    }
}

/// Load `project.yaml` from `workspace_root`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_project_config(workspace_root: &Path) -> Result<Option<ProjectConfig>, ConfigError> {
    let path = workspace_root.join(PROJECT_FILE);
    let Some(content) = read_optional(&path)? else {
        return Ok(None);
    };

    // An empty document deserialises as unit; treat it as all defaults.
    if content.trim().is_empty() {
        return Ok(Some(ProjectConfig::default()));
    }

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Project { path, source })
}

/// Server settings from `.scribe.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Source file extension, with or without the leading dot.
    pub extension: String,
    /// Additional directories to index, relative to the workspace root.
    pub extra_roots: Vec<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            extension: crate::indexer::DEFAULT_EXTENSION.to_string(),
            extra_roots: Vec::new(),
        }
    }
}

impl ServerSettings {
    /// The extension without a leading dot.
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    pub fn index_roots(&self, workspace_root: &Path) -> Vec<PathBuf> {
        self.extra_roots
            .iter()
            .map(|root| workspace_root.join(root))
            .collect()
    }
}

/// Load `.scribe.toml` from `workspace_root`, or defaults when absent.
pub fn load_settings(workspace_root: &Path) -> Result<ServerSettings, ConfigError> {
    let path = workspace_root.join(SETTINGS_FILE);
    match read_optional(&path)? {
        Some(content) => {
            toml::from_str(&content).map_err(|source| ConfigError::Settings { path, source })
        }
        None => Ok(ServerSettings::default()),
    }
}

/// Every directory the workspace asks to be indexed: project roots
/// followed by the extra roots from the settings.
pub fn workspace_roots(
    workspace_root: &Path,
    project: Option<&ProjectConfig>,
    settings: &ServerSettings,
) -> Vec<PathBuf> {
    let mut roots = project
        .map(|p| p.index_roots(workspace_root))
        .unwrap_or_default();
    for root in settings.index_roots(workspace_root) {
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// `dependencies:` with no entries parses as null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
