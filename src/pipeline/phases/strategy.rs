//! 调研策略阶段
//!
//! 基于已知的种子信息让策略员模型产出搜索查询与平台优先级。任何
//! 失败（网络、解析）都退回到确定性的插值查询模板，保证流水线在
//! 模型完全不可用时仍能继续。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ResearchError;
use crate::llm::json::{parse_contract, schema_instruction};
use crate::llm::{InvokeOptions, ModelRole};
use crate::pipeline::context::ResearchContext;
use crate::types::profile::SocialPlatform;
use crate::types::request::ResearchRequest;
use crate::types::strategy::{IdentityGuess, ResearchStrategy};

/// 策略阶段的响应契约
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct StrategyContract {
    /// 按优先级排序的搜索查询
    queries: Vec<String>,
    /// 优先调查的平台键名（facebook、instagram等）
    priority_platforms: Vec<String>,
    best_guess: GuessContract,
    notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
struct GuessContract {
    name: Option<String>,
    location: Option<String>,
    industry: Option<String>,
}

const SYSTEM_PROMPT: &str = r#"你是一个专业的企业信息调研策略师，服务对象是屋顶、暖通、管道等本地贸易服务类小企业。

你的任务是基于已知的种子信息，制定一份调研策略：
1. 产出一组按优先级排序的网页搜索查询，用于发现该公司的官网、社交账号、目录收录、客户评价与竞争对手
2. 给出最值得优先调查的社交平台
3. 对缺失的身份字段（名称、位置、行业）给出最佳猜测
4. 附上简短的策略备注"#;

/// 执行策略阶段
pub async fn run(
    context: &ResearchContext,
    request: &ResearchRequest,
) -> Result<ResearchStrategy, ResearchError> {
    let prompt = build_prompt(request);
    let raw = context
        .llm
        .invoke(
            ModelRole::Strategist,
            Some(SYSTEM_PROMPT),
            &prompt,
            InvokeOptions::default(),
        )
        .await?;

    let contract: StrategyContract = parse_contract(&raw)?;
    Ok(into_strategy(contract))
}

/// 策略阶段的确定性兜底
///
/// 由已知字段插值出三条固定模板查询与默认平台优先级。该兜底保证
/// 即使模型彻底失败流水线也能继续。
pub fn fallback(request: &ResearchRequest) -> ResearchStrategy {
    let name = request.display_name();
    let location = request.location.as_deref().unwrap_or_default();

    let queries = vec![
        format!("\"{}\" {} official website contact", name, location)
            .trim()
            .to_string(),
        format!(
            "\"{}\" site:facebook.com OR site:instagram.com OR site:linkedin.com",
            name
        ),
        format!("\"{}\" {} reviews", name, location).trim().to_string(),
    ];

    ResearchStrategy {
        queries,
        priority_platforms: vec![
            SocialPlatform::Facebook,
            SocialPlatform::Instagram,
            SocialPlatform::Linkedin,
            SocialPlatform::Youtube,
        ],
        best_guess: IdentityGuess::default(),
        notes: Some("策略模型不可用，已采用默认搜索策略".to_string()),
    }
}

fn build_prompt(request: &ResearchRequest) -> String {
    let mut prompt = String::from("## 已知的种子信息\n");
    let mut push_field = |label: &str, value: &Option<String>| {
        match value {
            Some(v) => prompt.push_str(&format!("- {}: {}\n", label, v)),
            None => prompt.push_str(&format!("- {}: （未知）\n", label)),
        };
    };
    push_field("公司名称", &request.company_name);
    push_field("网站地址", &request.website_url);
    push_field("所在地", &request.location);
    push_field("行业", &request.industry_type);

    format!("{}\n{}", prompt, schema_instruction::<StrategyContract>())
}

fn into_strategy(contract: StrategyContract) -> ResearchStrategy {
    // 未知平台键直接丢弃，不让模型臆造的平台进入后续阶段
    let priority_platforms: Vec<SocialPlatform> = contract
        .priority_platforms
        .iter()
        .filter_map(|key| SocialPlatform::from_key(key))
        .collect();

    ResearchStrategy {
        queries: contract
            .queries
            .into_iter()
            .filter(|q| !q.trim().is_empty())
            .collect(),
        priority_platforms,
        best_guess: IdentityGuess {
            name: contract.best_guess.name,
            location: contract.best_guess.location,
            industry: contract.best_guess.industry,
        },
        notes: contract.notes,
    }
}
