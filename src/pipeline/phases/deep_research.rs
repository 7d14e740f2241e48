//! 深度调研执行阶段
//!
//! 单次大型调研员调用，模拟多来源综合调查并返回一个覆盖公司信息、
//! 社交档案、目录收录、评价、竞争对手与网站质量评估的JSON对象。
//! 失败时退回仅含已知公司名的近空数据包，下游阶段对稀疏输入有容忍度。

use crate::error::ResearchError;
use crate::llm::json::{parse_contract, schema_instruction};
use crate::llm::{InvokeOptions, ModelRole};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::memory::{MemoryScope, ScopedKeys};
use crate::pipeline::phases::strategy;
use crate::types::bundle::RawResearchBundle;
use crate::types::request::ResearchRequest;
use crate::types::strategy::ResearchStrategy;

const SYSTEM_PROMPT: &str = r#"你是一个专业的企业信息调研员，正在对一家本地贸易服务类公司做全面的在线形象调查。

请模拟一次多来源的综合调研，汇总以下方面的发现：
1. 公司基本信息（名称、标语、电话、邮箱、地址、行业、客群、服务项目、独特卖点、资质认证、获奖记录）
2. 各社交平台的公司主页链接
3. 行业目录与评价平台的收录情况
4. 主要竞争对手名称
5. 公司网站的质量评估
6. 每条发现对应的来源URL

只返回有真实依据的信息，无法确认的字段留空，不要编造看似可信的数据。"#;

/// 执行深度调研阶段
///
/// 上游策略经Memory中转取回，缺席时退回默认策略模板。
/// 策略查询截取有界前缀以控制prompt规模与调用成本。
pub async fn run(
    context: &ResearchContext,
    request: &ResearchRequest,
) -> Result<RawResearchBundle, ResearchError> {
    let research_strategy: ResearchStrategy = context
        .get_from_memory(MemoryScope::RESEARCH, ScopedKeys::STRATEGY)
        .await
        .unwrap_or_else(|| strategy::fallback(request));
    let prompt = build_prompt(
        request,
        &research_strategy,
        context.config.research.max_strategy_queries,
    );
    let raw = context
        .llm
        .invoke(
            ModelRole::Researcher,
            Some(SYSTEM_PROMPT),
            &prompt,
            InvokeOptions::default(),
        )
        .await?;

    parse_contract::<RawResearchBundle>(&raw)
}

/// 深度调研的兜底：仅保留已知公司名的近空数据包
pub fn fallback(request: &ResearchRequest) -> RawResearchBundle {
    RawResearchBundle::nearly_empty(request.company_name.clone())
}

fn build_prompt(
    request: &ResearchRequest,
    strategy: &ResearchStrategy,
    max_queries: usize,
) -> String {
    let mut prompt = String::from("## 调研对象\n");
    prompt.push_str(&format!("- 公司: {}\n", request.display_name()));
    if let Some(website) = &request.website_url {
        prompt.push_str(&format!("- 网站: {}\n", website));
    }
    if let Some(location) = strategy.resolved_location(request) {
        prompt.push_str(&format!("- 所在地: {}\n", location));
    }
    if let Some(industry) = strategy.resolved_industry(request) {
        prompt.push_str(&format!("- 行业: {}\n", industry));
    }

    prompt.push_str("\n## 调研策略给出的搜索方向\n");
    for query in strategy.queries.iter().take(max_queries) {
        prompt.push_str(&format!("- {}\n", query));
    }
    if let Some(notes) = &strategy.notes {
        prompt.push_str(&format!("\n策略备注: {}\n", notes));
    }

    format!("{}\n{}", prompt, schema_instruction::<RawResearchBundle>())
}
