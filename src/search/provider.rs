//! Serper风格搜索API + 直连抓取的默认实现

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::error::ResearchError;
use crate::search::{ScrapedPage, SearchHit, SearchProvider, SearchResponse};
use crate::utils::links::{extract_domain, extract_social_links};

/// 默认搜索/抓取客户端
///
/// 搜索走配置的JSON接口；抓取为直连GET取回HTML后本地解析社交外链，
/// 不依赖提供方的渲染能力。
pub struct WebSearchClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
}

impl WebSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("prescout-rs/0.4")
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// 搜索接口的响应体（Serper风格字段命名）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiSearchResponse {
    organic: Vec<ApiOrganicHit>,
    #[serde(rename = "relatedSearches")]
    related_searches: Vec<ApiRelatedSearch>,
    #[serde(rename = "peopleAlsoAsk")]
    people_also_ask: Vec<ApiPaaEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiOrganicHit {
    link: String,
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiRelatedSearch {
    query: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiPaaEntry {
    question: String,
}

#[async_trait]
impl SearchProvider for WebSearchClient {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<SearchResponse, ResearchError> {
        let response = self
            .http
            .post(format!("{}/search", self.api_base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": num_results }))
            .send()
            .await
            .map_err(|e| ResearchError::Upstream(format!("search request: {}", e)))?;

        if !response.status().is_success() {
            return Err(ResearchError::Upstream(format!(
                "search returned status {}",
                response.status()
            )));
        }

        let body: ApiSearchResponse = response
            .json()
            .await
            .map_err(|e| ResearchError::Upstream(format!("search response body: {}", e)))?;

        let results = body
            .organic
            .into_iter()
            .filter(|hit| !hit.link.is_empty())
            .take(num_results)
            .map(|hit| SearchHit {
                domain: extract_domain(&hit.link).unwrap_or_default(),
                url: hit.link,
                title: hit.title,
            })
            .collect();

        Ok(SearchResponse {
            results,
            related_searches: body
                .related_searches
                .into_iter()
                .map(|r| r.query)
                .filter(|q| !q.is_empty())
                .collect(),
            paa_questions: body
                .people_also_ask
                .into_iter()
                .map(|p| p.question)
                .filter(|q| !q.is_empty())
                .collect(),
        })
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ResearchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ResearchError::Upstream(format!("scrape request: {}", e)))?;

        if !response.status().is_success() {
            return Err(ResearchError::Upstream(format!(
                "scrape returned status {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ResearchError::Upstream(format!("scrape body: {}", e)))?;

        let social_links = extract_social_links(&html);
        // 正文节选足够供粉丝数等富化解析使用，避免在内存中保留整页
        let text_excerpt = Some(html.chars().take(16 * 1024).collect());

        Ok(ScrapedPage {
            url: url.to_string(),
            social_links,
            text_excerpt,
        })
    }
}
