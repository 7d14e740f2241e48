use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::profile::{LinkCategory, SocialLinks, SocialPlatform};

/// 深度调研模型返回的公司信息字段（可能部分填充，可能存在幻觉）
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCompanyInfo {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub industry: Option<String>,
    pub audience: Option<String>,
    pub services: Vec<String>,
    pub usps: Vec<String>,
    pub certifications: Vec<String>,
    pub awards: Vec<String>,
}

/// 目录收录条目
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub name: String,
    pub url: String,
    pub category: LinkCategory,
}

/// 评价平台摘要
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub platform: String,
    pub rating: f64,
    pub count: u32,
}

/// 社交档案富化结果（粉丝/互动元数据，尽力而为）
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfileMetrics {
    pub platform: SocialPlatform,
    pub url: String,
    pub followers: Option<u64>,
    pub handle: Option<String>,
}

/// 社交发现阶段的独立产物
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialDiscovery {
    pub links: SocialLinks,
    pub profiles: Vec<SocialProfileMetrics>,
    /// 证据来源（抓取的页面、执行过的site限定查询）
    pub sources: Vec<String>,
}

/// 原始调研数据包 - 非结构化中间产物
///
/// 深度调研阶段与社交发现阶段产物的并集。合并时社交发现的结果覆盖
/// AI猜测的重复项（最具体来源优先）。
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RawResearchBundle {
    pub company_info: RawCompanyInfo,
    pub social_links: SocialLinks,
    pub directory_listings: Vec<DirectoryListing>,
    pub reviews: Vec<ReviewSummary>,
    pub competitors: Vec<String>,
    /// 网站质量评估（自由格式）
    pub website_quality: serde_json::Value,
    pub sources: Vec<String>,
    #[schemars(skip)]
    pub social_profiles: Vec<SocialProfileMetrics>,
}

impl RawResearchBundle {
    /// 深度调研彻底失败时的近空数据包，仅保留已知公司名
    pub fn nearly_empty(name: Option<String>) -> Self {
        Self {
            company_info: RawCompanyInfo {
                name,
                ..RawCompanyInfo::default()
            },
            ..Self::default()
        }
    }

    /// 叠加社交发现阶段的产物，社交发现侧在冲突时获胜
    pub fn overlay_social_discovery(&mut self, discovery: &SocialDiscovery) {
        self.social_links = SocialLinks::merged_preferring(&discovery.links, &self.social_links);
        self.social_profiles = discovery.profiles.clone();
        for source in &discovery.sources {
            if !self.sources.contains(source) {
                self.sources.push(source.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_prefers_scraped_social_links() {
        let mut bundle = RawResearchBundle::default();
        bundle
            .social_links
            .set(SocialPlatform::Facebook, "https://facebook.com/acme-roofing-llc".into());
        bundle.sources.push("ai-research".into());

        let mut discovery = SocialDiscovery::default();
        discovery
            .links
            .set(SocialPlatform::Facebook, "https://facebook.com/acme".into());
        discovery.sources.push("https://acme.com".into());
        discovery.sources.push("ai-research".into());

        bundle.overlay_social_discovery(&discovery);

        assert_eq!(
            bundle.social_links.facebook.as_deref(),
            Some("https://facebook.com/acme")
        );
        // 来源去重
        assert_eq!(bundle.sources.len(), 2);
    }

    #[test]
    fn test_nearly_empty_keeps_name_only() {
        let bundle = RawResearchBundle::nearly_empty(Some("Acme Roofing".into()));
        assert_eq!(bundle.company_info.name.as_deref(), Some("Acme Roofing"));
        assert!(bundle.social_links.is_empty());
        assert!(bundle.directory_listings.is_empty());
        assert!(bundle.competitors.is_empty());
    }
}
