//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/qf/config.toml.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use qfilter::config::RecognizerConfig;
use qfilter::json::JsonTester;
use qfilter::FilterParser;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# qf - query filter configuration

# Config schema version (do not modify)
version = 1

# Fields tested by values without a key
# default_fields = ["name", "id", "title"]

# Output preferences
[output]
# color = true              # Enable colors (respects NO_COLOR env)

# Keys each recognizer claims; omit to keep the built-in ones
[recognizers.date]
# keys = ["date", "added", "created", "modified", "updated"]

[recognizers.distance]
# keys = ["length", "len", "distance"]

[recognizers.size]
# keys = ["size", "filesize"]

[recognizers.duration]
# keys = ["time", "duration", "laptime", "age"]
# default_unit = "s"        # Unit of bare numbers

# Extra unit recognizers: distance, speed, power, torque or weight
# [[recognizers.unit]]
# kind = "speed"
# keys = ["speed", "topspeed"]
"#;

/// Configuration file structure.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Fields tested by keyless values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_fields: Option<Vec<String>>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Recognizer settings.
    #[serde(default)]
    pub recognizers: RecognizerConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_fields: None,
            output: OutputConfig::default(),
            recognizers: RecognizerConfig::default(),
        }
    }
}

impl Config {
    /// Builds a parser using the configured recognizers.
    pub fn parser(&self) -> FilterParser {
        FilterParser::new(self.recognizers.build())
    }

    /// Builds a JSON tester, preferring `fields` over the configured default fields.
    pub fn tester(&self, fields: &[String]) -> JsonTester {
        if !fields.is_empty() {
            return JsonTester::new(fields.iter().cloned());
        }
        match &self.default_fields {
            Some(configured) => JsonTester::new(configured.iter().cloned()),
            None => JsonTester::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Resolves the config file path from its sources, highest priority first:
/// `QF_CONFIG`, `XDG_CONFIG_HOME`, then the home directory.
fn resolve_config_path(
    override_path: Option<PathBuf>,
    xdg_config: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(xdg_config) = xdg_config {
        return Some(xdg_config.join("qf").join("config.toml"));
    }
    home.map(|home| home.join(".config").join("qf").join("config.toml"))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    let override_path = env::var_os("QF_CONFIG").map(PathBuf::from);
    let xdg_config = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

    resolve_config_path(override_path, xdg_config, home).ok_or_else(|| {
        CommandError::Config("Could not determine config directory".to_string())
    })
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

/// Loads the configuration from `path`, falling back to defaults when it is missing.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Writes the default config file to `path`.
fn write_default_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(true)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    let config = load_config_from(&path)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            let content = toml::to_string_pretty(&config).map_err(|e| {
                CommandError::Config(format!("Failed to serialize config: {}", e))
            })?;
            print!("{content}");
        } else {
            println!("(No config file exists. Run 'qf config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;
    let created = write_default_config(&path, force)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if created { "created" } else { "exists" },
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if created {
            println!("Created default config at: {}", path.display());
        } else {
            println!(
                "Config already exists at: {} (use --force to overwrite)",
                path.display()
            );
        }
    }

    Ok(())
}
