use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".l10nifyrc.json";

/// Files the rewriter must never touch: code generators and the l10n output.
pub const GENERATED_FILE_PATTERNS: &[&str] = &[
    "**/*.g.dart",
    "**/*.freezed.dart",
    "**/*.gr.dart",
    "**/*.mocks.dart",
    "**/l10n/**",
    "**/generated/**",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_arb_dir")]
    pub arb_dir: String,
    #[serde(default = "default_template_arb")]
    pub template_arb: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_arb: Option<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,
    #[serde(default = "default_lookup_accessor")]
    pub lookup_accessor: String,
    #[serde(default = "default_localizations_module")]
    pub localizations_module: String,
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
}

fn default_source_root() -> String {
    "lib".to_string()
}

fn default_arb_dir() -> String {
    "lib/l10n".to_string()
}

fn default_template_arb() -> String {
    "app_en.arb".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["dart".to_string()]
}

fn default_ignores() -> Vec<String> {
    GENERATED_FILE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_min_text_length() -> usize {
    2
}

fn default_lookup_accessor() -> String {
    "AppLocalizations.of(context)".to_string()
}

fn default_localizations_module() -> String {
    "l10n/app_localizations.dart".to_string()
}

fn default_report_dir() -> String {
    ".".to_string()
}

fn default_backup_dir() -> String {
    ".l10nify_backup".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            arb_dir: default_arb_dir(),
            template_arb: default_template_arb(),
            target_arb: None,
            extensions: default_extensions(),
            ignores: default_ignores(),
            ignore_texts: Vec::new(),
            min_text_length: default_min_text_length(),
            lookup_accessor: default_lookup_accessor(),
            localizations_module: default_localizations_module(),
            report_dir: default_report_dir(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `ignores`, an empty
    /// lookup accessor, or an empty extension list.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        if self.lookup_accessor.trim().is_empty() {
            bail!("'lookupAccessor' must not be empty");
        }
        if self.extensions.is_empty() {
            bail!("'extensions' must list at least one file extension");
        }
        if self.localizations_module.trim().is_empty() {
            bail!("'localizationsModule' must not be empty");
        }
        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
