//! 数据结构化阶段
//!
//! 让分析员模型把合并后的原始数据包清洗、规整为规范档案结构。社交
//! 链接不走模型：合并数据包中的链接已按最具体来源优先合并完成，直接
//! 作为最终值写入档案，避免模型在结构化时引入二次猜测。失败时退回
//! 仅含名称与网站的最小档案，所有集合字段为良构的空容器。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;
use crate::llm::json::{parse_contract, schema_instruction};
use crate::llm::{InvokeOptions, ModelRole};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::memory::{MemoryScope, ScopedKeys};
use crate::types::bundle::RawResearchBundle;
use crate::types::profile::{
    AdditionalLink, CompanyProfile, ConversionInsights, LinkCategory,
};
use crate::types::request::ResearchRequest;
use crate::utils::links::dedupe_links;

/// 结构化阶段的响应契约
///
/// 链接条目只携带内容字段，id、时间戳与出处标记由本地生成，不信任
/// 模型填写元数据。
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct StructuredContract {
    name: Option<String>,
    tagline: Option<String>,
    website: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    industry: Option<String>,
    audience: Option<String>,
    services: Vec<String>,
    usps: Vec<String>,
    certifications: Vec<String>,
    awards: Vec<String>,
    additional_links: Vec<LinkContract>,
    competitors: Vec<String>,
    competitor_strengths: Vec<String>,
    competitor_weaknesses: Vec<String>,
    competitor_opportunities: Vec<String>,
    conversion: ConversionContract,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct LinkContract {
    title: String,
    url: String,
    category: LinkCategory,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct ConversionContract {
    /// USP强度评分，0-10
    usp_strength_score: u8,
    trust_signals: Vec<String>,
    cta_suggestions: Vec<String>,
}

const SYSTEM_PROMPT: &str = r#"你是一个专业的数据分析师，负责把多来源调研得到的原始企业数据清洗、去重并规整为规范的档案结构。

要求：
1. 保留有依据的字段，剔除明显矛盾或幻觉的内容
2. 服务项目、独特卖点等列表字段去重并使用简洁表述
3. 为每条目录/评价/厂商/协会链接归类
4. 基于独特卖点评估转化潜力（0-10分）并给出信任信号与行动号召建议
5. 无法确认的字段留空，不要编造"#;

/// 执行结构化阶段
///
/// 叠加社交发现后的原始数据包由编排器写入Memory，此处取回。
pub async fn run(
    context: &ResearchContext,
    request: &ResearchRequest,
) -> Result<CompanyProfile, ResearchError> {
    let bundle: RawResearchBundle = context
        .get_from_memory(MemoryScope::RESEARCH, ScopedKeys::RAW_BUNDLE)
        .await
        .unwrap_or_default();

    let prompt = build_prompt(request, &bundle)
        .map_err(|e| ResearchError::Internal(e.to_string()))?;
    let raw = context
        .llm
        .invoke(
            ModelRole::Analyst,
            Some(SYSTEM_PROMPT),
            &prompt,
            InvokeOptions::default(),
        )
        .await?;

    let contract: StructuredContract = parse_contract(&raw)?;
    Ok(into_profile(contract, request, &bundle))
}

/// 结构化失败的兜底：仅名称与网站的最小档案
pub fn fallback(request: &ResearchRequest, bundle: &RawResearchBundle) -> CompanyProfile {
    let name = bundle
        .company_info
        .name
        .clone()
        .or_else(|| request.company_name.clone());
    CompanyProfile::minimal(name, request.website_url.clone())
}

fn build_prompt(request: &ResearchRequest, bundle: &RawResearchBundle) -> anyhow::Result<String> {
    let bundle_json = serde_json::to_string_pretty(bundle)?;
    let mut prompt = String::from("## 调研对象\n");
    prompt.push_str(&format!("- 公司: {}\n", request.display_name()));
    if let Some(website) = &request.website_url {
        prompt.push_str(&format!("- 网站: {}\n", website));
    }
    prompt.push_str("\n## 多来源原始调研数据\n```json\n");
    prompt.push_str(&bundle_json);
    prompt.push_str("\n```\n\n");
    prompt.push_str(&schema_instruction::<StructuredContract>());
    Ok(prompt)
}

fn into_profile(
    contract: StructuredContract,
    request: &ResearchRequest,
    bundle: &RawResearchBundle,
) -> CompanyProfile {
    let mut profile = CompanyProfile::minimal(
        contract.name.or_else(|| request.company_name.clone()),
        contract.website.or_else(|| request.website_url.clone()),
    );

    profile.tagline = contract.tagline;
    profile.phone = contract.phone;
    profile.email = contract.email;
    profile.address = contract.address;
    profile.city = contract.city;
    profile.state = contract.state;
    profile.zip = contract.zip;
    profile.industry = contract.industry.or_else(|| request.industry_type.clone());
    profile.audience = contract.audience;
    profile.services = contract.services;
    profile.usps = contract.usps;
    profile.certifications = contract.certifications;
    profile.awards = contract.awards;

    // 社交链接以合并数据包为准，不采用模型的二次输出
    profile.social_links = bundle.social_links.clone();

    // 模型归类的链接与数据包中的目录收录合并后去重
    let mut links: Vec<AdditionalLink> = contract
        .additional_links
        .into_iter()
        .map(|link| AdditionalLink::ai_suggested(link.title, link.url, link.category))
        .collect();
    for listing in &bundle.directory_listings {
        links.push(AdditionalLink::ai_suggested(
            listing.name.clone(),
            listing.url.clone(),
            listing.category,
        ));
    }
    profile.additional_links = dedupe_links(links);

    profile.competitor_analysis.competitors = if contract.competitors.is_empty() {
        bundle.competitors.clone()
    } else {
        contract.competitors
    };
    profile.competitor_analysis.strengths = contract.competitor_strengths;
    profile.competitor_analysis.weaknesses = contract.competitor_weaknesses;
    profile.competitor_analysis.opportunities = contract.competitor_opportunities;

    profile.conversion_insights = ConversionInsights {
        usp_strength_score: contract.conversion.usp_strength_score.min(10),
        trust_signals: contract.conversion.trust_signals,
        cta_suggestions: contract.conversion.cta_suggestions,
    };

    profile
}
