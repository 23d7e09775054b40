use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{backup::Backup, dictionary::Dictionary, file_scanner::scan_files},
};

/// Everything a command needs to know about the project.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g., `--arb-dir lib/i18n`)
/// 2. `.l10nifyrc.json` config file
/// 3. Built-in defaults
pub struct RunContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory (for resolving relative paths).
    pub root_dir: PathBuf,

    /// Project-relative source files in sorted order, after `--max-files`.
    pub files: Vec<String>,

    /// Number of paths that could not be read while scanning.
    pub skipped_count: usize,

    pub verbose: bool,
}

impl RunContext {
    /// Loads the configuration and collects the source files.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is invalid or the project or source
    /// root does not exist.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let root_dir = common_args
            .project_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        if !root_dir.is_dir() {
            bail!("Project root not found: {}", root_dir.display());
        }

        let config_result = load_config(&root_dir)?;
        if !config_result.from_file {
            tracing::debug!("No {} found, using default configuration", CONFIG_FILE_NAME);
        }

        let mut config = config_result.config;
        if let Some(ref source_root) = common_args.source_root {
            config.source_root = source_root.clone();
        }
        if let Some(ref arb_dir) = common_args.arb_dir {
            config.arb_dir = arb_dir.clone();
        }
        if let Some(ref template_arb) = common_args.template_arb {
            config.template_arb = template_arb.clone();
        }
        if let Some(ref target_arb) = common_args.target_arb {
            config.target_arb = Some(target_arb.clone());
        }

        let source_dir = project_path(&root_dir, &config.source_root);
        if !source_dir.is_dir() {
            bail!("Source root not found: {}", source_dir.display());
        }

        // Backed-up originals are never sources.
        let mut ignores = config.ignores.clone();
        ignores.push(config.backup_dir.trim_start_matches("./").to_string());
        let scan = scan_files(&root_dir, &config.source_root, &config.extensions, &ignores);
        let mut files = scan.files;
        if let Some(max_files) = common_args.max_files
            && files.len() > max_files
        {
            tracing::debug!("Limiting run to the first {} of {} files", max_files, files.len());
            files.truncate(max_files);
        }

        Ok(Self {
            config,
            root_dir,
            files,
            skipped_count: scan.skipped_count,
            verbose: common_args.verbose,
        })
    }

    /// Path of a project-relative file, kept relative when the project root
    /// is the current directory.
    pub fn path(&self, relative: &str) -> PathBuf {
        project_path(&self.root_dir, relative)
    }

    pub fn template_arb_path(&self) -> PathBuf {
        self.path(&self.config.arb_dir).join(&self.config.template_arb)
    }

    pub fn target_arb_path(&self) -> Option<PathBuf> {
        self.config
            .target_arb
            .as_ref()
            .map(|target| self.path(&self.config.arb_dir).join(target))
    }

    /// Loads the template ARB file. Any failure is fatal.
    pub fn load_dictionary(&self) -> Result<Dictionary> {
        let path = self.template_arb_path();
        if !path.is_file() {
            bail!("Template ARB file not found: {}", path.display());
        }
        Dictionary::load(&path)
    }

    /// Loads the target-language ARB file if one is configured. A missing
    /// file is only a warning; an unparsable one is fatal.
    pub fn load_target_dictionary(&self) -> Result<Option<Dictionary>> {
        let Some(path) = self.target_arb_path() else {
            return Ok(None);
        };
        if !path.is_file() {
            tracing::warn!(
                "Target ARB file not found: {}; skipping translation check",
                path.display()
            );
            return Ok(None);
        }
        Dictionary::load(&path).map(Some)
    }

    pub fn report_dir(&self) -> PathBuf {
        self.path(&self.config.report_dir)
    }

    pub fn backup(&self) -> Backup {
        Backup::new(&self.root_dir, &self.config.backup_dir)
    }
}

fn project_path(root_dir: &Path, relative: &str) -> PathBuf {
    let path = Path::new(relative);
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if path.is_absolute() || is_cur_dir {
        path.to_path_buf()
    } else {
        let rel = path.strip_prefix(Path::new(".")).unwrap_or(path);
        root_dir.join(rel)
    }
}
