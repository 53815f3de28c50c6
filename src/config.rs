use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::selection::keywords::DEFAULT_DETECT_LIMIT;
use crate::selection::{SelectionParams, DEFAULT_CONTEXT_WINDOW};
use crate::summary::{LLMConfig, LLMProvider};

/// Largest number of highlight cards a run may request
pub const MAX_TARGET_COUNT: usize = 20;

/// Number of recently used keywords remembered between runs
pub const RECENT_KEYWORDS_LIMIT: usize = 50;

/// Recent keywords reused when a run names no keywords of its own
pub const RECENT_FALLBACK_COUNT: usize = 5;

/// Configuration for the highlight card generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Segment selection settings
    pub selection: SelectionConfig,

    /// Summary generation settings
    pub summary: SummaryConfig,

    /// LLM provider settings used for summaries
    pub llm: LLMConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Keywords that mark interesting cues
    pub keywords: Vec<String>,

    /// Number of highlight cards to produce
    pub target_count: usize,

    /// Neighbouring cues included on each side of a keyword match
    pub context_window: usize,

    /// Detect keywords from the transcript when none are given
    pub auto_keywords: bool,

    /// Number of keywords kept by auto-detection
    pub auto_keyword_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Try the configured LLM before falling back to extractive summaries
    pub enable_llm: bool,

    /// Character budget for extractive summaries
    pub max_chars: usize,

    /// Summaries requested concurrently
    pub max_concurrent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the card deck
    pub base_dir: PathBuf,

    /// File name of the JSON card deck
    pub cards_file: String,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    /// Where recently used keywords are stored (None disables it)
    pub recent_keywords_file: Option<PathBuf>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["introduction".to_string(), "conclusion".to_string()],
            target_count: 4,
            context_window: DEFAULT_CONTEXT_WINDOW,
            auto_keywords: false,
            auto_keyword_limit: DEFAULT_DETECT_LIMIT,
        }
    }
}

impl SelectionConfig {
    pub fn params(&self) -> SelectionParams {
        SelectionParams {
            target_count: self.target_count,
            context_window: self.context_window,
        }
    }

    /// Configured keywords, or the most recent ones when none are configured
    /// and auto-detection is off
    pub fn resolve_keywords(&self, recent: &RecentKeywords) -> Vec<String> {
        if !self.keywords.is_empty() || self.auto_keywords {
            return self.keywords.clone();
        }
        recent.recent(RECENT_FALLBACK_COUNT).to_vec()
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enable_llm: true,
            max_chars: 160,
            max_concurrent: 4,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./output"),
            cards_file: "cards.json".to_string(),
            log_level: "info".to_string(),
            recent_keywords_file: user_config_dir().map(|dir| dir.join("recent_keywords.json")),
        }
    }
}

/// `$HOME/.config/highlight-cards`, when a home directory is known
pub fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("highlight-cards"))
}

impl Config {
    /// Load configuration from the first config file found, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config_paths = vec![
            PathBuf::from("highlight-cards.toml"),
            PathBuf::from("config/highlight-cards.toml"),
        ];
        if let Some(dir) = user_config_dir() {
            config_paths.push(dir.join("config.toml"));
        }

        for path in &config_paths {
            if path.exists() {
                return Self::load_with_env(path);
            }
        }

        Self::from_env()
    }

    /// Load a named config file and apply environment overrides
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Failed to parse config {}: {}", path.display(), e))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Default configuration with environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(count) = std::env::var("HIGHLIGHT_CARDS_COUNT") {
            match count.parse() {
                Ok(count) => self.selection.target_count = count,
                Err(_) => tracing::warn!("Ignoring invalid HIGHLIGHT_CARDS_COUNT: {}", count),
            }
        }

        if let Ok(keywords) = std::env::var("HIGHLIGHT_CARDS_KEYWORDS") {
            self.selection.keywords = keywords
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }

        if let Ok(window) = std::env::var("HIGHLIGHT_CARDS_CONTEXT_WINDOW") {
            match window.parse() {
                Ok(window) => self.selection.context_window = window,
                Err(_) => tracing::warn!("Ignoring invalid HIGHLIGHT_CARDS_CONTEXT_WINDOW: {}", window),
            }
        }

        if let Ok(api_key) = std::env::var("HIGHLIGHT_CARDS_LLM_API_KEY") {
            self.llm.api_key = Some(api_key);
        }

        if let Ok(endpoint) = std::env::var("HIGHLIGHT_CARDS_LLM_ENDPOINT") {
            self.llm.endpoint = Some(endpoint);
        }

        if let Ok(output_dir) = std::env::var("HIGHLIGHT_CARDS_OUTPUT_DIR") {
            self.output.base_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("HIGHLIGHT_CARDS_LOG_LEVEL") {
            self.output.log_level = log_level;
        }
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let count = self.selection.target_count;
        if count == 0 || count > MAX_TARGET_COUNT {
            return Err(anyhow!(
                "target_count must be between 1 and {}, got {}",
                MAX_TARGET_COUNT,
                count
            ));
        }

        if self.summary.max_concurrent == 0 {
            return Err(anyhow!("max_concurrent must be greater than 0"));
        }

        if self.summary.enable_llm {
            match self.llm.provider {
                LLMProvider::OpenAI if self.llm.api_key.is_none() => {
                    return Err(anyhow!("API key required for the OpenAI provider"));
                }
                LLMProvider::LMStudio if self.llm.endpoint.is_none() => {
                    return Err(anyhow!("Endpoint required for the LMStudio provider"));
                }
                _ => {}
            }
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Highlight Cards Configuration:\n\
            - Keywords: {}\n\
            - Cards: {}\n\
            - Context Window: {} cues\n\
            - LLM Summaries: {} ({:?})\n\
            - Output Directory: {}",
            if self.selection.keywords.is_empty() {
                "(none)".to_string()
            } else {
                self.selection.keywords.join(", ")
            },
            self.selection.target_count,
            self.selection.context_window,
            self.summary.enable_llm,
            self.llm.provider,
            self.output.base_dir.display(),
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_keywords<S: AsRef<str>>(mut self, keywords: &[S]) -> Self {
        self.config.selection.keywords = keywords.iter().map(|k| k.as_ref().to_string()).collect();
        self
    }

    pub fn with_target_count(mut self, count: usize) -> Self {
        self.config.selection.target_count = count;
        self
    }

    pub fn with_context_window(mut self, window: usize) -> Self {
        self.config.selection.context_window = window;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.base_dir = dir;
        self
    }

    pub fn enable_llm(mut self, enable: bool) -> Self {
        self.config.summary.enable_llm = enable;
        self
    }

    pub fn with_llm_provider(mut self, provider: LLMProvider) -> Self {
        self.config.llm.provider = provider;
        self
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Most-recent-first list of keywords used in earlier runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentKeywords {
    keywords: Vec<String>,
}

impl RecentKeywords {
    /// Load the list, treating a missing or unreadable file as empty
    pub async fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable keyword history {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_string_pretty(self)?).await?;
        Ok(())
    }

    /// Move `keywords` to the front, keeping their order and the size cap
    pub fn record<S: AsRef<str>>(&mut self, keywords: &[S]) {
        for keyword in keywords.iter().rev() {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() {
                continue;
            }
            self.keywords.retain(|k| k != keyword);
            self.keywords.insert(0, keyword.to_string());
        }
        self.keywords.truncate(RECENT_KEYWORDS_LIMIT);
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn recent(&self, limit: usize) -> &[String] {
        &self.keywords[..limit.min(self.keywords.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.selection.target_count, 4);
        assert_eq!(config.selection.context_window, 5);
        assert_eq!(config.selection.keywords, vec!["introduction", "conclusion"]);
        assert!(config.summary.enable_llm);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_keywords(&["results"])
            .with_target_count(8)
            .with_context_window(2)
            .enable_llm(false)
            .build();

        assert_eq!(config.selection.keywords, vec!["results"]);
        assert_eq!(config.selection.target_count, 8);
        assert_eq!(config.selection.context_window, 2);
        assert!(!config.summary.enable_llm);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());
        assert!(ConfigBuilder::new().with_target_count(0).build().validate().is_err());
        assert!(ConfigBuilder::new().with_target_count(21).build().validate().is_err());
        assert!(ConfigBuilder::new()
            .with_llm_provider(LLMProvider::OpenAI)
            .build()
            .validate()
            .is_err());
        assert!(ConfigBuilder::new()
            .with_llm_provider(LLMProvider::OpenAI)
            .enable_llm(false)
            .build()
            .validate()
            .is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            "[selection]\nkeywords = [\"results\"]\ntarget_count = 6\n\n[llm]\nprovider = \"OpenAI\"\nendpoint = \"https://example.com/v1/chat/completions\"\nmodel = \"gpt-4o-mini\"\nmax_tokens = 100\ntemperature = 0.0\ntimeout_seconds = 10\n",
        )
        .unwrap();

        assert_eq!(config.selection.keywords, vec!["results"]);
        assert_eq!(config.selection.target_count, 6);
        assert_eq!(config.selection.context_window, 5);
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.output.cards_file, "cards.json");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("highlight-cards.toml");

        let config = ConfigBuilder::new().with_target_count(7).build();
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.selection.target_count, 7);
        assert!(Config::load_from(temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_recent_keywords_order_and_cap() {
        let mut recent = RecentKeywords::default();
        recent.record(&["a", "b"]);
        recent.record(&["c", "a"]);
        assert_eq!(recent.recent(10), ["c", "a", "b"]);
        assert_eq!(recent.recent(1), ["c"]);

        let many: Vec<String> = (0..60).map(|i| format!("k{}", i)).collect();
        recent.record(&many);
        assert_eq!(recent.recent(100).len(), RECENT_KEYWORDS_LIMIT);
        assert_eq!(recent.recent(1), ["k0"]);
    }

    #[test]
    fn test_explicit_config_errors_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let broken = temp_dir.path().join("broken.toml");
        std::fs::write(&broken, "[selection\ntarget_count = ").unwrap();

        assert!(Config::load_with_env(&broken).is_err());
        assert!(Config::load_with_env(temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_recent_keywords_fill_in_for_missing_keywords() {
        let mut recent = RecentKeywords::default();
        recent.record(&["a", "b", "c", "d", "e", "f"]);

        let configured = ConfigBuilder::new().with_keywords(&["intro"]).build();
        assert_eq!(configured.selection.resolve_keywords(&recent), vec!["intro"]);

        let empty = ConfigBuilder::new().with_keywords(&Vec::<String>::new()).build();
        assert_eq!(
            empty.selection.resolve_keywords(&recent),
            vec!["a", "b", "c", "d", "e"]
        );
        assert!(empty.selection.resolve_keywords(&RecentKeywords::default()).is_empty());

        let mut auto = empty.clone();
        auto.selection.auto_keywords = true;
        assert!(auto.selection.resolve_keywords(&recent).is_empty());
    }

    #[tokio::test]
    async fn test_recent_keywords_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("recent.json");

        assert_eq!(RecentKeywords::load(&path).await, RecentKeywords::default());

        let mut recent = RecentKeywords::default();
        recent.record(&["intro"]);
        recent.save(&path).await.unwrap();

        let loaded = RecentKeywords::load(&path).await;
        assert_eq!(loaded.recent(5), ["intro"]);
    }
}
