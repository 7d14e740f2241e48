//! 流水线编排器
//!
//! 严格按 策略 → 社交发现 → 深度调研 → 结构化 → 质量评估/兜底 → SEO
//! 的顺序执行，每个阶段包裹阶段级超时与错误护栏：可恢复的失败替换为
//! 该阶段的确定性兜底值后继续推进，不重试。除输入校验与程序性错误外
//! 没有任何失败会向上逃逸——流水线的产出永远是结构完整、类型良构的
//! 档案，这是可测试的不变量（字节级的输出一致性则不作保证）。

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;

use crate::error::ResearchError;
use crate::pipeline::confidence;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::memory::{MemoryScope, ScopedKeys};
use crate::pipeline::phases::{deep_research, quality, quick, seo, social, strategy, structuring};
use crate::types::profile::CompanyProfile;
use crate::types::report::{QuickResearchReport, ResearchReport};
use crate::types::request::ResearchRequest;

/// 执行完整的深度调研流水线
pub async fn run_deep_research(
    context: &ResearchContext,
    request: &ResearchRequest,
) -> Result<ResearchReport, ResearchError> {
    request.validate()?;
    println!("🚀 开始深度调研：{}", request.display_name());

    let model_timeout = context.config.research.model_timeout_seconds;
    let research = &context.config.research;

    // 阶段一：调研策略
    let research_strategy = phase_or_fallback(
        context,
        "调研策略",
        model_timeout,
        strategy::run(context, request),
        || strategy::fallback(request),
    )
    .await?;
    if let Some(notes) = &research_strategy.notes {
        note(context, format!("策略备注: {}", notes)).await?;
    }
    store(context, ScopedKeys::STRATEGY, &research_strategy).await?;

    // 阶段二：社交发现（搜索服务缺席时本身就是空操作）
    let discovery = phase_or_fallback(
        context,
        "社交发现",
        model_timeout,
        social::run(context, request),
        Default::default,
    )
    .await?;

    // 阶段三：深度调研执行（策略经Memory取回）
    let mut bundle = phase_or_fallback(
        context,
        "深度调研",
        model_timeout,
        deep_research::run(context, request),
        || deep_research::fallback(request),
    )
    .await?;

    // 合并：社交发现在冲突的社交链接上获胜（最具体来源优先）
    bundle.overlay_social_discovery(&discovery);
    for source in bundle.sources.clone() {
        source_entry(context, source).await?;
    }
    store(context, ScopedKeys::RAW_BUNDLE, &bundle).await?;

    // 阶段四：结构化与置信度（合并后的数据包经Memory取回）
    let mut profile = phase_or_fallback(
        context,
        "数据结构化",
        model_timeout,
        structuring::run(context, request),
        || structuring::fallback(request, &bundle),
    )
    .await?;

    // 阶段五：质量评估与竞争对手兜底
    let assessment = quality::assess(&profile, research.quality_threshold);
    println!("📋 数据质量评分：{}", assessment.score);

    let industry = research_strategy.resolved_industry(request);
    let location = research_strategy.resolved_location(request);

    let data_quality = if assessment.limited_information
        && let (Some(industry), Some(location)) = (industry, location)
    {
        quality::run_competitor_fallback(context, &mut profile, &industry, &location).await;

        let mut reassessed = quality::assess(&profile, research.quality_threshold);
        reassessed.used_competitor_research = true;
        note(
            context,
            format!(
                "信息有限，已执行竞争对手兜底调研，质量评分 {} → {}",
                assessment.score, reassessed.score
            ),
        )
        .await?;
        reassessed
    } else {
        assessment
    };

    // 阶段六：SEO建议
    profile.seo_insights = phase_or_fallback(
        context,
        "SEO建议",
        model_timeout,
        seo::run(context, &profile),
        || seo::fallback(&profile.seo_insights),
    )
    .await?;

    profile.last_researched_at = Utc::now();

    // 置信度按最终档案计算（兜底回填之后）
    let confidence = confidence::score_profile(&profile);

    if context.config.verbose {
        let usage = context.memory.read().await.get_usage_stats();
        println!("🧠 调研记忆占用（字节）: {:?}", usage);
    }
    println!("✅ 深度调研完成：{}", request.display_name());
    Ok(ResearchReport {
        confidence,
        data_quality,
        research_sources: context.sources().await,
        ai_team_notes: context.notes().await,
        profile,
    })
}

/// 执行快速调研（仅补全已有档案的缺失字段）
pub async fn run_quick_research(
    context: &ResearchContext,
    profile: &CompanyProfile,
) -> Result<QuickResearchReport, ResearchError> {
    println!("🚀 开始快速调研");
    let model_timeout = context.config.research.model_timeout_seconds;

    phase_or_fallback(
        context,
        "快速调研",
        model_timeout,
        quick::run(context, profile),
        QuickResearchReport::default,
    )
    .await
}

/// 阶段护栏：超时与可恢复错误替换为兜底值，不可恢复错误向上传播
async fn phase_or_fallback<T, F, FB>(
    context: &ResearchContext,
    phase_name: &str,
    timeout_seconds: u64,
    future: F,
    fallback: FB,
) -> Result<T, ResearchError>
where
    F: Future<Output = Result<T, ResearchError>>,
    FB: FnOnce() -> T,
{
    match timeout(Duration::from_secs(timeout_seconds), future).await {
        Ok(Ok(value)) => {
            if context.config.verbose {
                println!("✅ {} 阶段完成", phase_name);
            }
            Ok(value)
        }
        Ok(Err(e)) if e.is_recoverable() => {
            println!("⚠️ {} 阶段失败，使用兜底值: {}", phase_name, e);
            note(context, format!("{} 阶段失败，已使用兜底值", phase_name)).await?;
            Ok(fallback())
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            let e = ResearchError::PhaseTimeout(phase_name.to_string());
            println!("⚠️ {} 阶段失败，使用兜底值: {}", phase_name, e);
            note(context, format!("{} 阶段超时，已使用兜底值", phase_name)).await?;
            Ok(fallback())
        }
    }
}

async fn note(context: &ResearchContext, text: String) -> Result<(), ResearchError> {
    context
        .add_note(text)
        .await
        .map_err(|e| ResearchError::Internal(e.to_string()))
}

async fn source_entry(context: &ResearchContext, source: String) -> Result<(), ResearchError> {
    context
        .add_source(source)
        .await
        .map_err(|e| ResearchError::Internal(e.to_string()))
}

async fn store<T: serde::Serialize + Send + Sync>(
    context: &ResearchContext,
    key: &str,
    data: &T,
) -> Result<(), ResearchError> {
    context
        .store_to_memory(MemoryScope::RESEARCH, key, data)
        .await
        .map_err(|e| ResearchError::Internal(e.to_string()))
}
