//! 网页搜索/抓取服务适配层
//!
//! 流水线对该能力的依赖是可选的：服务未配置时相关阶段整体降级为
//! 空操作，调用方必须将能力缺席视为正常而非错误。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;
use crate::types::profile::SocialLinks;

pub mod provider;

pub use provider::WebSearchClient;

/// 单条搜索结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub domain: String,
}

/// 搜索响应（可能为空）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    /// 相关搜索词（提供方支持时）
    pub related_searches: Vec<String>,
    /// People-also-ask问题（提供方支持时）
    pub paa_questions: Vec<String>,
}

/// 页面抓取结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedPage {
    pub url: String,
    /// 页面上发现的外链社交档案
    pub social_links: SocialLinks,
    /// 正文节选，供富化解析使用
    pub text_excerpt: Option<String>,
}

/// 搜索/抓取服务接口
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 执行一次网页搜索，返回结构化（可能为空）的结果
    async fn search(&self, query: &str, num_results: usize)
    -> Result<SearchResponse, ResearchError>;

    /// 抓取单个页面
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ResearchError>;
}
