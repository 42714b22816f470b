//! Boot document loader and override resolution
//!
//! Resolution runs once per boot:
//! 1. Read the document and expand `${VAR}` placeholders
//! 2. Parse it (YAML, or TOML for `.toml` files) into a [`Node`]
//! 3. Merge environment overrides (`<PREFIX>_*`)
//! 4. Merge flag overrides (`--rkset`), which win over the environment

use super::decode::decode;
use super::env::{env_overrides_from_process, EnvOverrides, OverrideRecord, DEFAULT_ENV_PREFIX};
use super::merge::merge;
use super::overrides::{build_overrides, parse_assignments};
use super::schema::BootConfig;
use crate::domain::errors::BootError;
use crate::domain::node::Node;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default boot document path
pub const DEFAULT_BOOT_PATH: &str = "boot.yaml";

/// Boot document syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Picks the format from the file extension; anything but `.toml` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Inputs of the override stage
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Environment prefix, `RK` by default
    pub env_prefix: String,
    /// Raw `--rkset` value
    pub flag_overrides: Option<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            flag_overrides: None,
        }
    }
}

/// A boot document with every override applied
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Merged document
    pub node: Node,
    /// Environment overrides that were recognized
    pub env_records: Vec<OverrideRecord>,
    /// Flag assignments, rendered back as `path=value`
    pub flag_assignments: Vec<String>,
}

impl ResolvedDocument {
    /// Decodes and validates the core sections
    pub fn boot_config(&self) -> Result<BootConfig> {
        let config: BootConfig = decode(&self.node)?;
        config
            .validate()
            .map_err(|e| BootError::Configuration(format!("Configuration validation failed: {e}")))?;
        Ok(config)
    }
}

/// Loads a boot document and resolves overrides against it
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - A `${VAR}` placeholder references an unset variable
/// - The document can't be parsed
/// - The flag override string is malformed
///
/// # Examples
///
/// ```no_run
/// use rkboot::config::loader::{load_config, ResolveOptions};
///
/// let resolved = load_config("boot.yaml", &ResolveOptions::default()).expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>, options: &ResolveOptions) -> Result<ResolvedDocument> {
    let document = load_document(path)?;
    resolve_document(document, options)
}

/// Reads and parses a boot document without applying overrides
pub fn load_document(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BootError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BootError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_document(&contents, DocumentFormat::from_path(path))
}

/// Parses document text, expanding `${VAR}` placeholders first
///
/// An empty document parses to an empty mapping. The top level must be a
/// mapping.
pub fn parse_document(contents: &str, format: DocumentFormat) -> Result<Node> {
    let contents = substitute_env_vars(contents)?;

    let node = match format {
        DocumentFormat::Yaml => Node::from(serde_yaml::from_str::<serde_yaml::Value>(&contents)?),
        DocumentFormat::Toml => Node::from(toml::from_str::<toml::Value>(&contents)?),
    };

    match node {
        Node::Null => Ok(Node::map()),
        node @ Node::Map(_) => Ok(node),
        other => Err(BootError::Configuration(format!(
            "Boot document must be a mapping at the top level, found a {}",
            other.kind()
        ))),
    }
}

/// Applies environment then flag overrides read from the process
pub fn resolve_document(document: Node, options: &ResolveOptions) -> Result<ResolvedDocument> {
    let env = env_overrides_from_process(&options.env_prefix);
    resolve_with(document, &env, options.flag_overrides.as_deref().unwrap_or(""))
}

/// Applies the given overrides: environment first, then flags
///
/// # Errors
///
/// A malformed flag string is fatal: the operator asked for something that
/// can't be honored.
pub fn resolve_with(mut document: Node, env: &EnvOverrides, flags: &str) -> Result<ResolvedDocument> {
    let assignments = parse_assignments(flags)?;
    let flag_assignments = assignments
        .iter()
        .map(|a| {
            format!(
                "{}={}",
                a.path,
                a.value.scalar_text().unwrap_or_else(|| "null".to_string())
            )
        })
        .collect();
    let flag_node = build_overrides(assignments)?;

    merge(&mut document, &env.node);
    merge(&mut document, &flag_node);

    for record in &env.records {
        tracing::info!(env_key = %record.env_key, path = %record.path, "Applied environment override");
    }

    Ok(ResolvedDocument {
        node: document,
        env_records: env.records.clone(),
        flag_assignments,
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BootError::Other(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BootError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}
