//! 数据质量评估与竞争对手兜底阶段
//!
//! 按固定的关键字段清单计算完整度评分；低于阈值且行业与位置可判定时
//! 触发竞争对手调研，用行业通用值回填空缺字段。回填是非破坏性的：
//! 绝不覆盖已有的非空值。兜底前后各计算一次评估，调用方可观察改善。
//!
//! 该阶段体现显式的优雅降级阶梯：直接调研 → 策略兜底 → 竞争对手
//! 通用推断 → 最终向用户直接提问（missingFields），而不是静默编造。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::llm::json::{parse_contract, schema_instruction};
use crate::llm::{InvokeOptions, ModelRole};
use crate::pipeline::context::ResearchContext;
use crate::types::profile::CompanyProfile;
use crate::types::quality::{DataQualityAssessment, MissingField, PriorityTier};
use crate::utils::links::extract_domain;

/// 评价聚合站域名，从竞争对手候选中排除以避免误报
const AGGREGATOR_DOMAINS: [&str; 6] = [
    "yelp.com",
    "yellowpages.com",
    "bbb.org",
    "angi.com",
    "thumbtack.com",
    "houzz.com",
];

/// 关键字段清单项
struct CriticalField {
    key: &'static str,
    label: &'static str,
    priority: PriorityTier,
    prompt: &'static str,
    is_present: fn(&CompanyProfile) -> bool,
}

/// 固定的关键字段清单
///
/// 完整度评分的分母即清单长度，条目与优先级档位是行为兼容的一部分。
const CRITICAL_FIELDS: [CriticalField; 8] = [
    CriticalField {
        key: "name",
        label: "公司名称",
        priority: PriorityTier::High,
        prompt: "贵公司的正式名称是什么？",
        is_present: |p| p.name.is_some(),
    },
    CriticalField {
        key: "industry",
        label: "所属行业",
        priority: PriorityTier::High,
        prompt: "贵公司主要从事哪个行业（屋顶、暖通、管道等）？",
        is_present: |p| p.industry.is_some(),
    },
    CriticalField {
        key: "phone",
        label: "联系电话",
        priority: PriorityTier::Medium,
        prompt: "客户应拨打哪个电话联系贵公司？",
        is_present: |p| p.phone.is_some(),
    },
    CriticalField {
        key: "headquarters",
        label: "公司地址",
        priority: PriorityTier::Medium,
        prompt: "贵公司的办公地址或所在城市是哪里？",
        is_present: CompanyProfile::has_headquarters,
    },
    CriticalField {
        key: "services",
        label: "服务项目",
        priority: PriorityTier::High,
        prompt: "贵公司提供哪些具体服务？",
        is_present: |p| !p.services.is_empty(),
    },
    CriticalField {
        key: "audience",
        label: "目标客群",
        priority: PriorityTier::Medium,
        prompt: "贵公司主要服务哪类客户（住宅业主、商业物业等）？",
        is_present: |p| p.audience.is_some(),
    },
    CriticalField {
        key: "usps",
        label: "独特卖点",
        priority: PriorityTier::High,
        prompt: "与同行相比，贵公司最突出的优势是什么？",
        is_present: |p| !p.usps.is_empty(),
    },
    CriticalField {
        key: "website",
        label: "公司网站",
        priority: PriorityTier::Low,
        prompt: "贵公司有官方网站吗？地址是什么？",
        is_present: |p| p.website.is_some(),
    },
];

/// 行业通用值的响应契约
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct IndustryDefaults {
    /// 该行业+地区常见的独特卖点，5条
    usps: Vec<String>,
    /// 该行业常见的服务项目
    common_services: Vec<String>,
}

/// 按关键字段清单评估档案完整度
pub fn assess(profile: &CompanyProfile, quality_threshold: u8) -> DataQualityAssessment {
    let total = CRITICAL_FIELDS.len();
    let mut found = 0usize;
    let mut missing_fields = Vec::new();

    for field in &CRITICAL_FIELDS {
        if (field.is_present)(profile) {
            found += 1;
        } else {
            missing_fields.push(MissingField {
                key: field.key.to_string(),
                label: field.label.to_string(),
                priority: field.priority,
                prompt: field.prompt.to_string(),
            });
        }
    }

    let score = ((found as f64 / total as f64) * 100.0).round() as u8;
    DataQualityAssessment {
        score,
        limited_information: score < quality_threshold,
        used_competitor_research: false,
        missing_fields,
    }
}

/// 竞争对手兜底调研
///
/// 搜索行业头部公司作为竞争对手候选（排除聚合站），收集相关搜索与
/// 常见问题作为关键词/内容缺口种子，再让模型给出行业通用卖点回填。
/// 内部的每次外呼失败都就地吸收，该阶段自身从不失败。
pub async fn run_competitor_fallback(
    context: &ResearchContext,
    profile: &mut CompanyProfile,
    industry: &str,
    location: &str,
) {
    println!("🔍 数据质量不足，启动竞争对手兜底调研：{} @ {}", industry, location);

    if let Some(search) = context.search.as_ref() {
        let query = format!("best {} companies in {}", industry, location);
        match search
            .search(&query, context.config.search.num_results)
            .await
        {
            Ok(response) => {
                if profile.competitor_analysis.competitors.is_empty() {
                    profile.competitor_analysis.competitors = response
                        .results
                        .iter()
                        .filter(|hit| !is_aggregator(&hit.url))
                        .map(|hit| hit.title.clone())
                        .filter(|title| !title.trim().is_empty())
                        .take(context.config.research.competitor_candidate_limit)
                        .collect();
                }
                if profile.seo_insights.keywords.is_empty() {
                    profile.seo_insights.keywords = response.related_searches.clone();
                }
                if profile.seo_insights.content_gaps.is_empty() {
                    profile.seo_insights.content_gaps = response.paa_questions.clone();
                }
                let _ = context.add_source(query).await;
            }
            Err(e) => {
                println!("⚠️ 竞争对手搜索失败，仅使用行业通用值: {}", e);
            }
        }
    }

    match fetch_industry_defaults(context, industry, location).await {
        Ok(defaults) => {
            // 非破坏性回填：仅在字段为空时写入
            if profile.usps.is_empty() {
                profile.usps = defaults.usps;
            }
            if profile.services.is_empty() {
                profile.services = defaults.common_services;
            }
        }
        Err(e) => {
            println!("⚠️ 行业通用值调用失败，保留现有档案: {}", e);
        }
    }
}

async fn fetch_industry_defaults(
    context: &ResearchContext,
    industry: &str,
    location: &str,
) -> Result<IndustryDefaults, crate::error::ResearchError> {
    let prompt = format!(
        "针对位于 {} 的 {} 类本地服务公司，给出5条该行业通用的独特卖点和该行业常见的服务项目。\n\n{}",
        location,
        industry,
        schema_instruction::<IndustryDefaults>()
    );
    let raw = context
        .llm
        .invoke(ModelRole::Analyst, None, &prompt, InvokeOptions::default())
        .await?;
    parse_contract(&raw)
}

fn is_aggregator(url: &str) -> bool {
    extract_domain(url)
        .map(|domain| {
            AGGREGATOR_DOMAINS
                .iter()
                .any(|agg| domain == *agg || domain.ends_with(&format!(".{}", agg)))
        })
        .unwrap_or(false)
}
