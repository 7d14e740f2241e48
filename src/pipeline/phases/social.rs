//! 社交发现与富化阶段
//!
//! 两步算法：先直接抓取公司官网上的社交外链（权威来源，始终优先于
//! 猜测），再对仍缺失的平台逐一发起site限定搜索取首条结果作为候选。
//! 随后对支持富化的平台并发抓取粉丝/互动元数据，单平台失败不阻塞
//! 其他平台。搜索服务未配置时整个阶段是空操作。

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ResearchError;
use crate::pipeline::context::ResearchContext;
use crate::search::SearchProvider;
use crate::types::bundle::{SocialDiscovery, SocialProfileMetrics};
use crate::types::profile::SocialPlatform;
use crate::types::request::ResearchRequest;
use crate::utils::links::parse_count;
use crate::utils::threads::do_parallel_with_limit;

static FOLLOWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d][\d.,]*\s?[KMB]?)\s*(followers|subscribers|follower)")
        .expect("invalid follower regex")
});

/// 执行社交发现阶段
pub async fn run(
    context: &ResearchContext,
    request: &ResearchRequest,
) -> Result<SocialDiscovery, ResearchError> {
    let Some(search) = context.search.as_ref() else {
        // 能力缺席是正常情况，不是错误
        return Ok(SocialDiscovery::default());
    };

    let mut discovery = SocialDiscovery::default();

    // 第一步：官网抓取，权威来源
    if let Some(website) = &request.website_url {
        match search.scrape(website).await {
            Ok(page) => {
                discovery.links = page.social_links;
                discovery.sources.push(website.clone());
            }
            Err(e) => {
                println!("⚠️ 社交发现：官网抓取失败，继续定向搜索: {}", e);
            }
        }
    }

    // 第二步：对缺失平台逐一site限定搜索，取首条结果
    let company = request.display_name();
    for platform in discovery.links.missing_platforms() {
        let query = format!("\"{}\" site:{}", company, platform.search_domain());
        match search.search(&query, 3).await {
            Ok(response) => {
                if let Some(hit) = response
                    .results
                    .iter()
                    .find(|hit| domain_matches(&hit.domain, platform.search_domain()))
                {
                    discovery.links.set(platform, hit.url.clone());
                    discovery.sources.push(query);
                }
            }
            Err(e) => {
                println!("⚠️ 社交发现：{} 定向搜索失败: {}", platform, e);
            }
        }
    }

    // 第三步：可富化平台的并发档案富化，独立失败、联合继续
    discovery.profiles = enrich_profiles(context, search.as_ref(), &discovery).await;

    Ok(discovery)
}

async fn enrich_profiles(
    context: &ResearchContext,
    search: &dyn SearchProvider,
    discovery: &SocialDiscovery,
) -> Vec<SocialProfileMetrics> {
    let targets: Vec<(SocialPlatform, String)> = discovery
        .links
        .filled_platforms()
        .into_iter()
        .filter(|p| p.enrichable())
        .filter_map(|p| discovery.links.get(p).map(|url| (p, url.to_string())))
        .collect();

    if targets.is_empty() {
        return Vec::new();
    }

    let enrichment_futures: Vec<_> = targets
        .into_iter()
        .map(|(platform, url)| async move {
            let result = search.scrape(&url).await;
            (platform, url, result)
        })
        .collect();

    let settled = do_parallel_with_limit(
        enrichment_futures,
        context.config.research.enrichment_parallels,
    )
    .await;

    // 过滤失败分支，保留成功的富化结果
    settled
        .into_iter()
        .filter_map(|(platform, url, result)| match result {
            Ok(page) => {
                let followers = page
                    .text_excerpt
                    .as_deref()
                    .and_then(extract_follower_count);
                Some(SocialProfileMetrics {
                    platform,
                    handle: extract_handle(&url),
                    url,
                    followers,
                })
            }
            Err(e) => {
                println!("⚠️ 社交富化：{} 抓取失败，跳过: {}", platform, e);
                None
            }
        })
        .collect()
}

/// 命中域名是否属于目标平台：精确相等或以`.`为边界的子域
fn domain_matches(domain: &str, platform_domain: &str) -> bool {
    domain == platform_domain || domain.ends_with(&format!(".{}", platform_domain))
}

fn extract_follower_count(text: &str) -> Option<u64> {
    FOLLOWER_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_count(m.as_str().trim()))
}

fn extract_handle(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() || segment.contains('.') {
        return None;
    }
    Some(segment.trim_start_matches('@').to_string())
}
