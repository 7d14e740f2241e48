use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 社交平台枚举
///
/// 封闭枚举替代字符串键，新增平台是一次编译期检查的变更。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Linkedin,
    Youtube,
    Twitter,
    Tiktok,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 6] = [
        SocialPlatform::Facebook,
        SocialPlatform::Instagram,
        SocialPlatform::Linkedin,
        SocialPlatform::Youtube,
        SocialPlatform::Twitter,
        SocialPlatform::Tiktok,
    ];

    /// 序列化键名
    pub fn key(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Tiktok => "tiktok",
        }
    }

    /// 用于site限定搜索的平台域名
    pub fn search_domain(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "facebook.com",
            SocialPlatform::Instagram => "instagram.com",
            SocialPlatform::Linkedin => "linkedin.com",
            SocialPlatform::Youtube => "youtube.com",
            SocialPlatform::Twitter => "twitter.com",
            SocialPlatform::Tiktok => "tiktok.com",
        }
    }

    /// 是否支持档案富化（粉丝/互动数据抓取）
    pub fn enrichable(&self) -> bool {
        matches!(
            self,
            SocialPlatform::Instagram | SocialPlatform::Linkedin | SocialPlatform::Youtube
        )
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "facebook" => Some(SocialPlatform::Facebook),
            "instagram" => Some(SocialPlatform::Instagram),
            "linkedin" => Some(SocialPlatform::Linkedin),
            "youtube" => Some(SocialPlatform::Youtube),
            // x.com 在抓取阶段归一化到twitter
            "twitter" | "x" => Some(SocialPlatform::Twitter),
            "tiktok" => Some(SocialPlatform::Tiktok),
            _ => None,
        }
    }
}

impl Display for SocialPlatform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 社交链接映射：平台 → 链接或缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub tiktok: Option<String>,
}

impl SocialLinks {
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        match platform {
            SocialPlatform::Facebook => self.facebook.as_deref(),
            SocialPlatform::Instagram => self.instagram.as_deref(),
            SocialPlatform::Linkedin => self.linkedin.as_deref(),
            SocialPlatform::Youtube => self.youtube.as_deref(),
            SocialPlatform::Twitter => self.twitter.as_deref(),
            SocialPlatform::Tiktok => self.tiktok.as_deref(),
        }
    }

    pub fn set(&mut self, platform: SocialPlatform, url: String) {
        let slot = match platform {
            SocialPlatform::Facebook => &mut self.facebook,
            SocialPlatform::Instagram => &mut self.instagram,
            SocialPlatform::Linkedin => &mut self.linkedin,
            SocialPlatform::Youtube => &mut self.youtube,
            SocialPlatform::Twitter => &mut self.twitter,
            SocialPlatform::Tiktok => &mut self.tiktok,
        };
        *slot = Some(url);
    }

    pub fn is_empty(&self) -> bool {
        SocialPlatform::ALL.iter().all(|p| self.get(*p).is_none())
    }

    /// 已填充的平台列表
    pub fn filled_platforms(&self) -> Vec<SocialPlatform> {
        SocialPlatform::ALL
            .iter()
            .copied()
            .filter(|p| self.get(*p).is_some())
            .collect()
    }

    /// 尚未发现链接的平台列表
    pub fn missing_platforms(&self) -> Vec<SocialPlatform> {
        SocialPlatform::ALL
            .iter()
            .copied()
            .filter(|p| self.get(*p).is_none())
            .collect()
    }

    /// 以`preferred`为准合并两个映射，仅当优先侧缺失时取`secondary`的值
    ///
    /// 最具体来源优先策略：网站抓取/定向搜索的结果覆盖AI猜测的重复项。
    pub fn merged_preferring(preferred: &SocialLinks, secondary: &SocialLinks) -> SocialLinks {
        let mut merged = SocialLinks::default();
        for platform in SocialPlatform::ALL {
            if let Some(url) = preferred.get(platform).or_else(|| secondary.get(platform)) {
                merged.set(platform, url.to_string());
            }
        }
        merged
    }
}

/// 附加链接分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LinkCategory {
    /// 行业目录收录（HomeAdvisor、本地商会等）
    Directory,
    /// 厂商授权/认证页面
    Manufacturer,
    /// 行业协会、商圈组织
    Networking,
    /// 评价平台主页
    ReviewPlatform,
    /// 其他未归类链接
    Other,
}

impl Display for LinkCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LinkCategory::Directory => "directory",
            LinkCategory::Manufacturer => "manufacturer",
            LinkCategory::Networking => "networking",
            LinkCategory::ReviewPlatform => "review-platform",
            LinkCategory::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// 附加链接记录，携带来源出处标记与时间戳
///
/// 不变量：由AI/搜索阶段产生的链接必须`is_ai_suggested=true, is_verified=false`，
/// 直到人工确认；人工录入的链接取反。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalLink {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub category: LinkCategory,
    pub is_verified: bool,
    pub is_ai_suggested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdditionalLink {
    /// 由自动化流水线发现的链接
    pub fn ai_suggested(title: String, url: String, category: LinkCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            category,
            is_verified: false,
            is_ai_suggested: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// 由用户手动录入的链接
    pub fn manually_entered(title: String, url: String, category: LinkCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            category,
            is_verified: true,
            is_ai_suggested: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 竞争对手分析
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorAnalysis {
    pub competitors: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
}

/// SEO洞察
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoInsights {
    pub keywords: Vec<String>,
    pub content_gaps: Vec<String>,
    /// 本地SEO评分，0-100
    pub local_seo_score: u8,
    pub recommendations: Vec<String>,
}

/// 转化洞察
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionInsights {
    /// USP强度评分，0-10
    pub usp_strength_score: u8,
    pub trust_signals: Vec<String>,
    pub cta_suggestions: Vec<String>,
}

/// 公司档案 - 流水线的持久化输出
///
/// 每次调研整体生成/覆盖。所有集合字段始终为良构的空容器而非null，
/// 下游代码可以安全迭代而无需判空。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,

    /// 行业分类
    pub industry: Option<String>,
    /// 目标客群分类
    pub audience: Option<String>,

    pub services: Vec<String>,
    pub usps: Vec<String>,
    pub certifications: Vec<String>,
    pub awards: Vec<String>,

    pub social_links: SocialLinks,
    pub additional_links: Vec<AdditionalLink>,
    pub competitor_analysis: CompetitorAnalysis,
    pub seo_insights: SeoInsights,
    pub conversion_insights: ConversionInsights,

    pub last_researched_at: DateTime<Utc>,
}

impl CompanyProfile {
    /// 结构化阶段彻底失败时的最小档案：仅名称与网站，其余为空容器
    pub fn minimal(name: Option<String>, website: Option<String>) -> Self {
        Self {
            name,
            tagline: None,
            website,
            phone: None,
            email: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            industry: None,
            audience: None,
            services: Vec::new(),
            usps: Vec::new(),
            certifications: Vec::new(),
            awards: Vec::new(),
            social_links: SocialLinks::default(),
            additional_links: Vec::new(),
            competitor_analysis: CompetitorAnalysis::default(),
            seo_insights: SeoInsights::default(),
            conversion_insights: ConversionInsights::default(),
            last_researched_at: Utc::now(),
        }
    }

    /// 总部位置是否可判定（地址或城市任一存在）
    pub fn has_headquarters(&self) -> bool {
        self.address.is_some() || self.city.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_links_merge_prefers_primary() {
        let mut scraped = SocialLinks::default();
        scraped.set(SocialPlatform::Facebook, "https://facebook.com/acme".into());

        let mut guessed = SocialLinks::default();
        guessed.set(
            SocialPlatform::Facebook,
            "https://facebook.com/acme-roofing-llc".into(),
        );
        guessed.set(SocialPlatform::Youtube, "https://youtube.com/@acme".into());

        let merged = SocialLinks::merged_preferring(&scraped, &guessed);
        assert_eq!(merged.facebook.as_deref(), Some("https://facebook.com/acme"));
        assert_eq!(merged.youtube.as_deref(), Some("https://youtube.com/@acme"));
    }

    #[test]
    fn test_missing_platforms() {
        let mut links = SocialLinks::default();
        links.set(SocialPlatform::Instagram, "https://instagram.com/acme".into());

        let missing = links.missing_platforms();
        assert_eq!(missing.len(), 5);
        assert!(!missing.contains(&SocialPlatform::Instagram));
        assert!(missing.contains(&SocialPlatform::Facebook));
    }

    #[test]
    fn test_ai_suggested_link_provenance() {
        let link = AdditionalLink::ai_suggested(
            "HomeAdvisor".into(),
            "https://homeadvisor.com/acme".into(),
            LinkCategory::Directory,
        );
        assert!(link.is_ai_suggested);
        assert!(!link.is_verified);

        let manual = AdditionalLink::manually_entered(
            "Chamber of Commerce".into(),
            "https://chamber.org/acme".into(),
            LinkCategory::Networking,
        );
        assert!(!manual.is_ai_suggested);
        assert!(manual.is_verified);
    }

    #[test]
    fn test_minimal_profile_has_typed_empty_containers() {
        let profile = CompanyProfile::minimal(Some("Acme Roofing".into()), None);
        assert_eq!(profile.name.as_deref(), Some("Acme Roofing"));
        assert!(profile.services.is_empty());
        assert!(profile.usps.is_empty());
        assert!(profile.additional_links.is_empty());
        assert!(profile.social_links.is_empty());
        assert!(profile.competitor_analysis.competitors.is_empty());
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = CompanyProfile::minimal(Some("Acme".into()), None);
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("socialLinks").is_some());
        assert!(json.get("additionalLinks").is_some());
        assert!(json.get("lastResearchedAt").is_some());
    }
}
