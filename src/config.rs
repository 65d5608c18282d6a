// ABOUTME: Process configuration - defaults, environment loading and policies.
// ABOUTME: Binaries layer command-line flags on top of RelayConfig::from_env().

use std::path::PathBuf;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::error::ConfigError;

/// What happens to a running mission when its connection closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DisconnectPolicy {
    /// Cancel the mission as soon as the connection is gone.
    #[default]
    Cancel,
    /// Let the mission run to completion and discard its output.
    Continue,
}

/// How the compiler treats two agents with the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DuplicateAgentPolicy {
    /// Fail compilation.
    #[default]
    Reject,
    /// The later agent replaces the earlier one in name lookups.
    LastWins,
}

/// Settings for the built-in tools.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    pub serper_api_key: Option<String>,
    pub serper_base_url: String,
    pub documents_url: String,
    pub output_dir: PathBuf,
    pub search_results: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            serper_api_key: None,
            serper_base_url: "https://google.serper.dev".to_string(),
            documents_url: "http://memento.process-gpt.io/retrieve".to_string(),
            output_dir: PathBuf::from("output"),
            search_results: 4,
        }
    }
}

/// Top-level configuration of the relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen_addr: String,
    pub planner_model: String,
    pub agent_model: String,
    /// Language every task result must be written in.
    pub language: String,
    pub max_iterations: usize,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub on_disconnect: DisconnectPolicy,
    pub duplicate_agents: DuplicateAgentPolicy,
    /// Capacity of each connection's outbound event queue.
    pub outbound_buffer: usize,
    pub tools: ToolsConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:6789".to_string(),
            planner_model: "gpt-3.5-turbo".to_string(),
            agent_model: "gpt-3.5-turbo".to_string(),
            language: "Korean".to_string(),
            max_iterations: 15,
            max_tokens: 4096,
            temperature: None,
            on_disconnect: DisconnectPolicy::default(),
            duplicate_agents: DuplicateAgentPolicy::default(),
            outbound_buffer: 256,
            tools: ToolsConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Defaults overridden by `CREW_RELAY_*`, `SERPER_API_KEY` and friends.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("CREW_RELAY_LISTEN") {
            config.listen_addr = v;
        }
        if let Some(v) = var("CREW_RELAY_PLANNER_MODEL") {
            config.planner_model = v;
        }
        if let Some(v) = var("CREW_RELAY_AGENT_MODEL") {
            config.agent_model = v;
        }
        if let Some(v) = var("CREW_RELAY_LANGUAGE") {
            config.language = v;
        }
        if let Some(v) = var("CREW_RELAY_MAX_ITERATIONS") {
            config.max_iterations = parse("CREW_RELAY_MAX_ITERATIONS", &v)?;
        }
        if let Some(v) = var("CREW_RELAY_TEMPERATURE") {
            config.temperature = Some(parse("CREW_RELAY_TEMPERATURE", &v)?);
        }
        if let Some(v) = var("CREW_RELAY_ON_DISCONNECT") {
            config.on_disconnect = parse("CREW_RELAY_ON_DISCONNECT", &v)?;
        }
        if let Some(v) = var("CREW_RELAY_DUPLICATE_AGENTS") {
            config.duplicate_agents = parse("CREW_RELAY_DUPLICATE_AGENTS", &v)?;
        }

        config.tools.serper_api_key = var("SERPER_API_KEY");
        if let Some(v) = var("CREW_RELAY_DOCUMENTS_URL") {
            config.tools.documents_url = v;
        }
        if let Some(v) = var("CREW_RELAY_OUTPUT_DIR") {
            config.tools.output_dir = PathBuf::from(v);
        }
        if let Some(v) = var("CREW_RELAY_SEARCH_RESULTS") {
            config.tools.search_results = parse("CREW_RELAY_SEARCH_RESULTS", &v)?;
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}
