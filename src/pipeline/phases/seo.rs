//! SEO建议阶段
//!
//! 最后一次模型调用，把结构化档案转成关键词与内容建议。失败时返回
//! 固定的最小建议集而不是错误，该阶段绝不使整个流水线失败。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;
use crate::llm::json::{parse_contract, schema_instruction};
use crate::llm::{InvokeOptions, ModelRole};
use crate::pipeline::context::ResearchContext;
use crate::types::profile::{CompanyProfile, SeoInsights};

/// 兜底的本地SEO评分
const FALLBACK_LOCAL_SEO_SCORE: u8 = 30;

/// SEO建议的响应契约
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct SeoContract {
    /// 主要关键词
    keywords: Vec<String>,
    /// 内容缺口
    content_gaps: Vec<String>,
    /// 本地SEO评分，1-100
    local_seo_score: u8,
    /// 5条可执行建议
    recommendations: Vec<String>,
}

const SYSTEM_PROMPT: &str = r#"你是一个专业的本地SEO顾问，服务对象是本地贸易服务类小企业。

基于给定的公司档案与竞争对手情况：
1. 给出一组本地化的主要关键词（行业+地区组合）
2. 指出内容缺口
3. 给出1-100的本地SEO评分
4. 给出5条可立即执行的优化建议"#;

/// 执行SEO建议阶段
pub async fn run(
    context: &ResearchContext,
    profile: &CompanyProfile,
) -> Result<SeoInsights, ResearchError> {
    let prompt = build_prompt(profile).map_err(|e| ResearchError::Internal(e.to_string()))?;
    let raw = context
        .llm
        .invoke(
            ModelRole::Analyst,
            Some(SYSTEM_PROMPT),
            &prompt,
            InvokeOptions::default(),
        )
        .await?;

    let contract: SeoContract = parse_contract(&raw)?;
    Ok(merge_insights(contract, &profile.seo_insights))
}

/// SEO阶段的兜底：保留已有的关键词/内容缺口种子，补上固定建议集
pub fn fallback(existing: &SeoInsights) -> SeoInsights {
    SeoInsights {
        keywords: existing.keywords.clone(),
        content_gaps: existing.content_gaps.clone(),
        local_seo_score: FALLBACK_LOCAL_SEO_SCORE,
        recommendations: vec![
            "完善公司档案的基础信息".to_string(),
            "补齐各平台的社交媒体链接".to_string(),
            "积累并展示客户评价".to_string(),
        ],
    }
}

fn build_prompt(profile: &CompanyProfile) -> anyhow::Result<String> {
    let profile_json = serde_json::to_string_pretty(profile)?;
    Ok(format!(
        "## 公司档案\n```json\n{}\n```\n\n{}",
        profile_json,
        schema_instruction::<SeoContract>()
    ))
}

fn merge_insights(contract: SeoContract, existing: &SeoInsights) -> SeoInsights {
    SeoInsights {
        // 竞争对手阶段播种的关键词在模型未给出时保留
        keywords: if contract.keywords.is_empty() {
            existing.keywords.clone()
        } else {
            contract.keywords
        },
        content_gaps: if contract.content_gaps.is_empty() {
            existing.content_gaps.clone()
        } else {
            contract.content_gaps
        },
        local_seo_score: contract.local_seo_score.clamp(1, 100),
        recommendations: contract.recommendations,
    }
}
