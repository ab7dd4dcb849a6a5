use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use log::debug;

use crate::error::{BkwatchError, Result};

/// Local dotenv-style file checked first.
pub const LOCAL_ENV_FILE: &str = ".env";
/// Per-user config file checked second, relative to the home directory.
pub const USER_CONFIG_FILE: &str = ".bkwatch";

const TOKEN_VAR: &str = "BUILDKITE_API_TOKEN";
const ORG_VAR: &str = "BUILDKITE_ORG";

/// Resolved configuration, built once at startup and passed down to the
/// client and reporter.
///
/// Each variable is looked up in order: local `.env` file, then
/// `~/.bkwatch`, then the ambient environment - first match wins.
#[derive(Debug, Clone)]
pub struct Config {
    /// Buildkite API access token
    pub token: String,
    /// Buildkite organization slug
    pub org: String,
}

impl Config {
    /// Resolve configuration from the standard discovery chain.
    ///
    /// Fails with [`BkwatchError::MissingConfig`] naming every absent
    /// variable when the chain yields no value for it.
    pub fn load() -> Result<Self> {
        let mut sources = Vec::new();

        if let Some(vars) = read_env_file(Path::new(LOCAL_ENV_FILE))? {
            debug!("Loaded {} variables from {}", vars.len(), LOCAL_ENV_FILE);
            sources.push(vars);
        }

        if let Some(path) = dirs::home_dir().map(|home| home.join(USER_CONFIG_FILE)) {
            if let Some(vars) = read_env_file(&path)? {
                debug!("Loaded {} variables from {}", vars.len(), path.display());
                sources.push(vars);
            }
        }

        Self::from_sources(&sources, |key| std::env::var(key).ok())
    }

    /// Resolve from explicit file sources plus an environment lookup.
    /// Sources take precedence in the order given; the environment is
    /// consulted last.
    fn from_sources(
        sources: &[HashMap<String, String>],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |key: &str| {
            sources
                .iter()
                .find_map(|vars| vars.get(key).cloned())
                .or_else(|| env(key))
        };

        let token = lookup(TOKEN_VAR);
        let org = lookup(ORG_VAR);

        let missing: Vec<&str> = [(TOKEN_VAR, &token), (ORG_VAR, &org)]
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(BkwatchError::MissingConfig(missing.join(", ")));
        }

        Ok(Self {
            token: token.unwrap_or_default(),
            org: org.unwrap_or_default(),
        })
    }

    /// Render a reusable configuration template with the resolved values,
    /// printed by the `config` command.
    pub fn render_template(&self) -> String {
        let user_config = dirs::home_dir()
            .map(|home| home.join(USER_CONFIG_FILE).display().to_string())
            .unwrap_or_else(|| format!("~/{USER_CONFIG_FILE}"));

        let mut out = String::new();
        let _ = writeln!(
            out,
            "# place and fill if needed these lines in a local file called {LOCAL_ENV_FILE}"
        );
        let _ = writeln!(out, "# or in your home dir as {user_config}");
        let _ = writeln!(out, "# or find a way to set it as environment variables");
        let _ = writeln!(
            out,
            "# local {LOCAL_ENV_FILE} takes precedence over the home file, either overrides already set environment variables"
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{ORG_VAR}={}", self.org);
        let _ = writeln!(out, "{TOKEN_VAR}={}", self.token);
        out
    }
}

/// Parse a dotenv-style file into a variable map.
///
/// Returns `Ok(None)` when the file does not exist. Blank lines and `#`
/// comments are skipped; an optional `export ` prefix and surrounding
/// quotes around the value are tolerated.
fn read_env_file(path: &Path) -> Result<Option<HashMap<String, String>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    let mut vars = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            vars.insert(key.trim().to_string(), value.to_string());
        }
    }

    Ok(Some(vars))
}
