//! Collaborator configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use eduflex_core::catalog::{LocalCatalog, DEFAULT_COURSE_LIMIT};
use eduflex_core::difficulty::{DifficultyPolicy, ScoreBands};
use eduflex_core::parser::{load_question_bank, parse_catalog, starter_catalog, starter_question_bank};
use eduflex_core::service::QuizService;
use eduflex_core::traits::{CourseCatalog, QuestionBank};
use eduflex_core::weakness::DEFAULT_WEAKNESS_THRESHOLD;

use crate::backend::{HttpBackend, DEFAULT_BACKEND_URL};
use crate::firebase::{FirebaseCatalog, FirebaseQuestionBank};

/// Where questions come from.
///
/// Note: Custom Debug impl masks auth tokens to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionBankConfig {
    /// TOML file or directory; the bundled starter bank when no path is given.
    Local {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Http {
        #[serde(default = "default_backend_url")]
        base_url: String,
    },
    Firebase {
        database_url: String,
        #[serde(default)]
        root: String,
        #[serde(default)]
        auth_token: Option<String>,
    },
}

/// Where courses come from.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogConfig {
    Local {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Firebase {
        database_url: String,
        #[serde(default = "default_catalog_path")]
        path: String,
        #[serde(default)]
        auth_token: Option<String>,
    },
}

fn mask(token: &Option<String>) -> Option<&'static str> {
    token.as_ref().map(|_| "***")
}

impl std::fmt::Debug for QuestionBankConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionBankConfig::Local { path } => {
                f.debug_struct("Local").field("path", path).finish()
            }
            QuestionBankConfig::Http { base_url } => {
                f.debug_struct("Http").field("base_url", base_url).finish()
            }
            QuestionBankConfig::Firebase {
                database_url,
                root,
                auth_token,
            } => f
                .debug_struct("Firebase")
                .field("database_url", database_url)
                .field("root", root)
                .field("auth_token", &mask(auth_token))
                .finish(),
        }
    }
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogConfig::Local { path } => f.debug_struct("Local").field("path", path).finish(),
            CatalogConfig::Firebase {
                database_url,
                path,
                auth_token,
            } => f
                .debug_struct("Firebase")
                .field("database_url", database_url)
                .field("path", path)
                .field("auth_token", &mask(auth_token))
                .finish(),
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_catalog_path() -> String {
    "/".to_string()
}

impl Default for QuestionBankConfig {
    fn default() -> Self {
        QuestionBankConfig::Local { path: None }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig::Local { path: None }
    }
}

/// Top-level eduflex configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EduflexConfig {
    #[serde(default)]
    pub question_bank: QuestionBankConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Base URL of the quiz backend for remote grading and gradesheet uploads.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default)]
    pub difficulty: ScoreBands,
    /// Scores strictly below this count as weak.
    #[serde(default = "default_weakness_threshold")]
    pub weakness_threshold: f64,
    /// Most courses recommended per subject.
    #[serde(default = "default_max_courses")]
    pub max_courses: usize,
    /// HTTP timeout for remote collaborators.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Where quiz reports are saved.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_weakness_threshold() -> f64 {
    DEFAULT_WEAKNESS_THRESHOLD
}
fn default_max_courses() -> usize {
    DEFAULT_COURSE_LIMIT
}
fn default_timeout() -> u64 {
    30
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./eduflex-reports")
}

impl Default for EduflexConfig {
    fn default() -> Self {
        Self {
            question_bank: QuestionBankConfig::default(),
            catalog: CatalogConfig::default(),
            backend_url: default_backend_url(),
            difficulty: ScoreBands::default(),
            weakness_threshold: default_weakness_threshold(),
            max_courses: default_max_courses(),
            timeout_secs: default_timeout(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        // Substituted text is never rescanned.
        cursor = start + value.len();
    }
    result
}

fn resolve_token(token: &Option<String>) -> Option<String> {
    token
        .as_deref()
        .map(resolve_env_vars)
        .filter(|t| !t.is_empty())
}

impl EduflexConfig {
    /// Expand `${VAR}` references and apply environment overrides.
    ///
    /// `EDUFLEX_BACKEND_URL` replaces the backend URL (and an `http` bank's URL);
    /// `EDUFLEX_FIREBASE_TOKEN` replaces every Firebase auth token.
    fn resolve(mut self) -> Self {
        self.backend_url = resolve_env_vars(&self.backend_url);
        let backend_override = std::env::var("EDUFLEX_BACKEND_URL").ok();
        let token_override = std::env::var("EDUFLEX_FIREBASE_TOKEN").ok();
        if let Some(url) = &backend_override {
            self.backend_url = url.clone();
        }

        self.question_bank = match self.question_bank {
            QuestionBankConfig::Http { base_url } => QuestionBankConfig::Http {
                base_url: backend_override
                    .clone()
                    .unwrap_or_else(|| resolve_env_vars(&base_url)),
            },
            QuestionBankConfig::Firebase {
                database_url,
                root,
                auth_token,
            } => QuestionBankConfig::Firebase {
                database_url: resolve_env_vars(&database_url),
                root,
                auth_token: token_override.clone().or_else(|| resolve_token(&auth_token)),
            },
            local => local,
        };

        self.catalog = match self.catalog {
            CatalogConfig::Firebase {
                database_url,
                path,
                auth_token,
            } => CatalogConfig::Firebase {
                database_url: resolve_env_vars(&database_url),
                path,
                auth_token: token_override.or_else(|| resolve_token(&auth_token)),
            },
            local => local,
        };

        self
    }

    /// Reject values the core would refuse later.
    pub fn validate(&self) -> Result<()> {
        self.difficulty
            .validate()
            .context("invalid [difficulty] section")?;
        if !(0.0..=100.0).contains(&self.weakness_threshold) {
            anyhow::bail!(
                "weakness_threshold must be within 0..=100, got {}",
                self.weakness_threshold
            );
        }
        if self.max_courses == 0 {
            anyhow::bail!("max_courses must be positive");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be positive");
        }
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `eduflex.toml` in the current directory
/// 2. `~/.config/eduflex/config.toml`
///
/// Environment variable overrides: `EDUFLEX_BACKEND_URL`, `EDUFLEX_FIREBASE_TOKEN`.
pub fn load_config() -> Result<EduflexConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EduflexConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("eduflex.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<EduflexConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => EduflexConfig::default(),
    };

    let config = config.resolve();
    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("eduflex"))
}

/// Create the configured question bank.
pub fn create_question_bank(
    config: &QuestionBankConfig,
    timeout_secs: u64,
) -> Result<Arc<dyn QuestionBank>> {
    match config {
        QuestionBankConfig::Local { path: Some(path) } => Ok(Arc::new(
            load_question_bank(path)
                .with_context(|| format!("failed to load question bank from {}", path.display()))?,
        )),
        QuestionBankConfig::Local { path: None } => Ok(Arc::new(starter_question_bank()?)),
        QuestionBankConfig::Http { base_url } => {
            Ok(Arc::new(HttpBackend::new(base_url, timeout_secs)?))
        }
        QuestionBankConfig::Firebase {
            database_url,
            root,
            auth_token,
        } => Ok(Arc::new(FirebaseQuestionBank::new(
            database_url,
            root,
            auth_token.clone(),
            timeout_secs,
        )?)),
    }
}

/// Create the configured course catalog, returning at most `max_courses` per query.
pub fn create_catalog(
    config: &CatalogConfig,
    timeout_secs: u64,
    max_courses: usize,
) -> Result<Arc<dyn CourseCatalog>> {
    match config {
        CatalogConfig::Local { path: Some(path) } => {
            let catalog: LocalCatalog = parse_catalog(path)?;
            Ok(Arc::new(catalog.with_limit(max_courses)))
        }
        CatalogConfig::Local { path: None } => {
            Ok(Arc::new(starter_catalog()?.with_limit(max_courses)))
        }
        CatalogConfig::Firebase {
            database_url,
            path,
            auth_token,
        } => Ok(Arc::new(
            FirebaseCatalog::new(database_url, path, auth_token.clone(), timeout_secs)?
                .with_limit(max_courses),
        )),
    }
}

/// The configured difficulty policy.
pub fn create_policy(config: &EduflexConfig) -> Result<Arc<dyn DifficultyPolicy>> {
    let bands = ScoreBands::new(
        config.difficulty.intermediate_min,
        config.difficulty.advanced_min,
    )?;
    Ok(Arc::new(bands))
}

/// Wire a [`QuizService`] from configuration.
pub fn create_service(config: &EduflexConfig) -> Result<QuizService> {
    let bank = create_question_bank(&config.question_bank, config.timeout_secs)?;
    let catalog = create_catalog(&config.catalog, config.timeout_secs, config.max_courses)?;
    Ok(QuizService::new(bank, catalog)
        .with_policy(create_policy(config)?)
        .with_weakness_threshold(Some(config.weakness_threshold)))
}

/// Client for the configured quiz backend.
pub fn create_backend(config: &EduflexConfig) -> Result<HttpBackend> {
    Ok(HttpBackend::new(&config.backend_url, config.timeout_secs)?)
}
