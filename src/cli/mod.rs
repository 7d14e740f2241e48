use crate::config::{Config, LLMProvider};
use crate::types::request::ResearchRequest;
use clap::Parser;
use std::path::PathBuf;

/// PresenceScout - AI驱动的企业在线形象调研引擎
#[derive(Parser, Debug)]
#[command(name = "prescout")]
#[command(
    about = "AI-powered online presence research engine for local trade-service businesses. It orchestrates chained model calls and web search to build a structured company profile with confidence and data-quality scoring."
)]
#[command(version)]
pub struct Args {
    /// 公司网站地址
    #[arg(short, long)]
    pub website: Option<String>,

    /// 公司名称
    #[arg(short = 'n', long)]
    pub company_name: Option<String>,

    /// 所在地（城市/地区）
    #[arg(short, long)]
    pub location: Option<String>,

    /// 行业提示（roofing、hvac、plumbing等）
    #[arg(short, long)]
    pub industry: Option<String>,

    /// 快速调研模式：读取已有档案JSON文件，仅补全缺失字段
    #[arg(short, long)]
    pub quick: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// LLM Provider (openai, deepseek, openrouter, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 策略员角色模型
    #[arg(long)]
    pub model_strategist: Option<String>,

    /// 分析员角色模型
    #[arg(long)]
    pub model_analyst: Option<String>,

    /// 调研员角色模型
    #[arg(long)]
    pub model_researcher: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 搜索API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 搜索API基地址
    #[arg(long)]
    pub search_api_base_url: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置：配置文件优先加载，CLI参数覆盖其上
    pub fn into_config(&self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            Config::from_file(config_path).unwrap_or_else(|e| {
                eprintln!("⚠️ 警告: 无法读取配置文件 {:?}，使用默认配置: {}", config_path, e);
                Config::default()
            })
        } else {
            // 未显式指定时尝试默认位置
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("prescout.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|e| {
                    eprintln!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}，使用默认配置: {}",
                        default_config_path, e
                    );
                    Config::default()
                })
            } else {
                Config::default()
            }
        };

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!("⚠️ 警告: 未知的provider: {}，使用默认provider", provider_str);
            }
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(model_strategist) = &self.model_strategist {
            config.llm.model_strategist = model_strategist.clone();
        }
        if let Some(model_analyst) = &self.model_analyst {
            config.llm.model_analyst = model_analyst.clone();
        }
        if let Some(model_researcher) = &self.model_researcher {
            config.llm.model_researcher = model_researcher.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }

        // 覆盖搜索配置
        if let Some(search_api_key) = &self.search_api_key {
            config.search.api_key = search_api_key.clone();
        }
        if let Some(search_api_base_url) = &self.search_api_base_url {
            config.search.api_base_url = search_api_base_url.clone();
        }

        config.verbose = self.verbose;
        config
    }

    /// 将CLI参数转换为调研请求
    pub fn into_request(&self) -> ResearchRequest {
        ResearchRequest::new(
            self.website.clone(),
            self.company_name.clone(),
            self.location.clone(),
            self.industry.clone(),
        )
    }
}
