//! 快速调研阶段
//!
//! 轻量变体：只针对已有档案中当前缺失的字段，用一次小prompt的分析员
//! 调用给出补全建议，可选地附带一次网页搜索作为参考材料，不运行完整
//! 的多阶段流水线。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;
use crate::llm::json::{parse_contract, schema_instruction};
use crate::llm::{InvokeOptions, ModelRole};
use crate::pipeline::context::ResearchContext;
use crate::types::profile::CompanyProfile;
use crate::types::report::{FieldSuggestion, QuickResearchReport};

/// 快速调研的响应契约
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct QuickContract {
    suggestions: Vec<SuggestionContract>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct SuggestionContract {
    /// 目标字段键名
    field: String,
    /// 建议值
    value: String,
    /// 建议的置信度，0-100
    confidence: u8,
}

const SYSTEM_PROMPT: &str = r#"你是一个专业的企业信息分析师。给定一份部分填写的公司档案和参考材料，只针对列出的缺失字段给出补全建议。

要求：
1. 只对有依据的字段给出建议，宁缺毋滥
2. 每条建议附0-100的置信度
3. 不要重复已填写的字段"#;

/// 执行快速调研
pub async fn run(
    context: &ResearchContext,
    profile: &CompanyProfile,
) -> Result<QuickResearchReport, ResearchError> {
    let missing = missing_field_keys(profile);
    if missing.is_empty() {
        println!("✅ 快速调研：档案无缺失字段，无需补全");
        return Ok(QuickResearchReport::default());
    }

    let mut sources_used = Vec::new();
    let mut reference = String::new();

    // 可选的一次搜索，为建议提供参考材料
    if let Some(search) = context.search.as_ref() {
        let subject = profile.name.clone().or_else(|| profile.website.clone());
        if let Some(subject) = subject {
            let query = match &profile.city {
                Some(city) => format!("\"{}\" {}", subject, city),
                None => format!("\"{}\"", subject),
            };
            match search.search(&query, 5).await {
                Ok(response) => {
                    for hit in &response.results {
                        reference.push_str(&format!("- {} ({})\n", hit.title, hit.url));
                    }
                    sources_used.push(query);
                }
                Err(e) => {
                    println!("⚠️ 快速调研：参考搜索失败，仅依赖模型知识: {}", e);
                }
            }
        }
    }

    let prompt = build_prompt(profile, &missing, &reference)
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
    let contract: QuickContract = parse_contract(&raw)?;

    // 丢弃针对非缺失字段的建议，模型不被信任遵守字段清单
    let suggestions: Vec<FieldSuggestion> = contract
        .suggestions
        .into_iter()
        .filter(|s| missing.contains(&s.field))
        .map(|s| FieldSuggestion {
            field: s.field,
            value: s.value,
            confidence: s.confidence.min(100),
        })
        .collect();

    let fields_found = suggestions.iter().map(|s| s.field.clone()).collect();
    Ok(QuickResearchReport {
        suggestions,
        fields_found,
        sources_used,
    })
}

/// 当前缺失的档案字段键名
fn missing_field_keys(profile: &CompanyProfile) -> Vec<String> {
    let mut missing = Vec::new();
    let option_fields: [(&str, &Option<String>); 11] = [
        ("name", &profile.name),
        ("tagline", &profile.tagline),
        ("website", &profile.website),
        ("phone", &profile.phone),
        ("email", &profile.email),
        ("address", &profile.address),
        ("city", &profile.city),
        ("state", &profile.state),
        ("zip", &profile.zip),
        ("industry", &profile.industry),
        ("audience", &profile.audience),
    ];
    for (key, value) in option_fields {
        if value.is_none() {
            missing.push(key.to_string());
        }
    }
    if profile.services.is_empty() {
        missing.push("services".to_string());
    }
    if profile.usps.is_empty() {
        missing.push("usps".to_string());
    }
    missing
}

fn build_prompt(
    profile: &CompanyProfile,
    missing: &[String],
    reference: &str,
) -> anyhow::Result<String> {
    let profile_json = serde_json::to_string_pretty(profile)?;
    let mut prompt = format!("## 现有档案\n```json\n{}\n```\n\n", profile_json);
    prompt.push_str("## 需要补全的缺失字段\n");
    for key in missing {
        prompt.push_str(&format!("- {}\n", key));
    }
    if !reference.is_empty() {
        prompt.push_str("\n## 搜索参考材料\n");
        prompt.push_str(reference);
    }
    prompt.push('\n');
    prompt.push_str(&schema_instruction::<QuickContract>());
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_keys() {
        let mut profile = CompanyProfile::minimal(Some("Acme".into()), None);
        profile.services = vec!["Roofing".into()];

        let missing = missing_field_keys(&profile);
        assert!(!missing.contains(&"name".to_string()));
        assert!(!missing.contains(&"services".to_string()));
        assert!(missing.contains(&"website".to_string()));
        assert!(missing.contains(&"phone".to_string()));
        assert!(missing.contains(&"usps".to_string()));
    }

    #[test]
    fn test_full_profile_has_no_missing_keys() {
        let mut profile = CompanyProfile::minimal(Some("Acme".into()), Some("https://a.com".into()));
        profile.tagline = Some("t".into());
        profile.phone = Some("p".into());
        profile.email = Some("e".into());
        profile.address = Some("a".into());
        profile.city = Some("c".into());
        profile.state = Some("s".into());
        profile.zip = Some("z".into());
        profile.industry = Some("i".into());
        profile.audience = Some("aud".into());
        profile.services = vec!["s1".into()];
        profile.usps = vec!["u1".into()];

        assert!(missing_field_keys(&profile).is_empty());
    }
}
