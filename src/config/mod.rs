use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索/抓取服务配置
    pub search: SearchConfig,

    /// 调研流水线配置
    pub research: ResearchConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
///
/// 每个阶段角色绑定独立的模型，映射关系由`llm::router::ModelRouter`
/// 显式注入流水线，测试时可替换为确定性桩模型。
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 策略员角色模型，低温度、倾向确定性JSON输出
    pub model_strategist: String,

    /// 分析员角色模型，用于数据结构化与推断任务
    pub model_analyst: String,

    /// 调研员角色模型，容忍更广的探索性输出
    pub model_researcher: String,

    /// 最大tokens
    pub max_tokens: u32,
}

/// 搜索/抓取服务配置
///
/// API KEY为空视为未配置，依赖该服务的阶段整体降级为空操作。
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 搜索API KEY
    pub api_key: String,

    /// 搜索API基地址（Serper风格的JSON搜索接口）
    pub api_base_url: String,

    /// 单次搜索返回的结果条数
    pub num_results: usize,

    /// HTTP客户端超时（秒）
    pub timeout_seconds: u64,
}

impl SearchConfig {
    /// 搜索能力是否可用
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// 调研流水线配置
///
/// 阈值、上限与超时等魔法数字在此集中为具名的可调常量。数值是对外
/// 行为的一部分，调整任何一项都是行为变更。
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 数据质量阈值，低于该值触发竞争对手兜底调研
    pub quality_threshold: u8,

    /// 深度调研阶段消费的策略查询数量上限
    pub max_strategy_queries: usize,

    /// 竞争对手候选数量上限
    pub competitor_candidate_limit: usize,

    /// 模型调用的阶段级超时（秒）
    pub model_timeout_seconds: u64,

    /// 社交档案富化的最大并发数
    pub enrichment_parallels: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("PRESCOUT_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model_strategist: String::from("gpt-4o-mini"),
            model_analyst: String::from("gpt-4o"),
            model_researcher: String::from("gpt-4o"),
            max_tokens: 8192,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("PRESCOUT_SEARCH_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://google.serper.dev"),
            num_results: 10,
            timeout_seconds: 10,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            quality_threshold: 40,
            max_strategy_queries: 5,
            competitor_candidate_limit: 5,
            model_timeout_seconds: 30,
            enrichment_parallels: 3,
        }
    }
}
