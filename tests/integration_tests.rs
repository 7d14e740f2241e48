use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use prescout_rs::config::Config;
use prescout_rs::error::ResearchError;
use prescout_rs::llm::{InvokeOptions, ModelInvoker, ModelRole};
use prescout_rs::pipeline::{ResearchContext, run_deep_research, run_quick_research};
use prescout_rs::search::{ScrapedPage, SearchProvider, SearchResponse};
use prescout_rs::types::profile::{CompanyProfile, SocialPlatform};
use prescout_rs::types::request::ResearchRequest;

/// 始终失败的模型桩，记录调用次数
struct FailingInvoker {
    calls: AtomicUsize,
}

impl FailingInvoker {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelInvoker for FailingInvoker {
    async fn invoke(
        &self,
        _role: ModelRole,
        _system_prompt: Option<&str>,
        _user_prompt: &str,
        _options: InvokeOptions,
    ) -> Result<String, ResearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ResearchError::Upstream("provider unreachable".into()))
    }
}

/// 按角色出队预置响应的模型桩，队列耗尽后返回上游错误
struct ScriptedInvoker {
    responses: Mutex<HashMap<String, Vec<String>>>,
}

impl ScriptedInvoker {
    fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
        }
    }

    fn push(self, role: ModelRole, response: &str) -> Self {
        {
            let mut responses = self.responses.try_lock().unwrap();
            responses
                .entry(role.to_string())
                .or_default()
                .push(response.to_string());
        }
        self
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        role: ModelRole,
        _system_prompt: Option<&str>,
        _user_prompt: &str,
        _options: InvokeOptions,
    ) -> Result<String, ResearchError> {
        let mut responses = self.responses.lock().await;
        let queue = responses.entry(role.to_string()).or_default();
        if queue.is_empty() {
            return Err(ResearchError::Upstream(format!(
                "no scripted response left for role {}",
                role
            )));
        }
        Ok(queue.remove(0))
    }
}

/// 搜索/抓取桩：固定的官网社交外链与空搜索结果
struct StubSearch {
    scraped_facebook: Option<String>,
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(
        &self,
        _query: &str,
        _num_results: usize,
    ) -> Result<SearchResponse, ResearchError> {
        Ok(SearchResponse::default())
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ResearchError> {
        let mut page = ScrapedPage {
            url: url.to_string(),
            ..ScrapedPage::default()
        };
        if let Some(facebook) = &self.scraped_facebook {
            page.social_links.set(SocialPlatform::Facebook, facebook.clone());
        }
        Ok(page)
    }
}

fn context_with(llm: Arc<dyn ModelInvoker>, search: Option<Arc<dyn SearchProvider>>) -> ResearchContext {
    ResearchContext::with_components(llm, search, Config::default())
}

// 属性1：缺少公司名与网站时立即返回校验错误，不发起任何模型调用
#[tokio::test]
async fn test_validation_rejects_empty_request_without_model_calls() {
    let invoker = FailingInvoker::new();
    let context = context_with(invoker.clone(), None);
    let request = ResearchRequest::new(None, None, Some("Austin, TX".into()), None);

    let result = run_deep_research(&context, &request).await;
    assert!(matches!(result, Err(ResearchError::InvalidRequest(_))));
    assert_eq!(invoker.call_count(), 0);
}

// 属性2：模型全灭时流水线仍产出结构完整的报告（兜底确定性）
#[tokio::test]
async fn test_pipeline_survives_total_model_failure() {
    let invoker = FailingInvoker::new();
    let context = context_with(invoker.clone(), None);
    let request = ResearchRequest::new(None, Some("Acme Roofing".into()), None, None);

    let report = run_deep_research(&context, &request).await.unwrap();

    assert_eq!(report.profile.name.as_deref(), Some("Acme Roofing"));
    assert!(report.profile.services.is_empty());
    assert!(report.profile.usps.is_empty());
    assert!(report.profile.additional_links.is_empty());
    assert!(report.data_quality.limited_information);
    // 行业与位置都不可判定，竞争对手兜底不触发
    assert!(!report.data_quality.used_competitor_research);

    let wire = report.to_wire();
    assert_eq!(wire["success"], true);
    assert!(wire["dataQuality"].is_object());
    assert!(wire["missingFields"].is_array());

    // 每个阶段恰好尝试一次模型调用，没有重试：策略、深度调研、结构化、SEO
    assert_eq!(invoker.call_count(), 4);
}

// 属性3：流水线产出的附加链接全部携带AI出处标记
#[tokio::test]
async fn test_additional_links_carry_ai_provenance() {
    let structuring = r#"{
        "name": "Acme Roofing",
        "services": ["Roofing"],
        "additionalLinks": [
            {"title": "HomeAdvisor", "url": "https://homeadvisor.com/acme", "category": "directory"},
            {"title": "GAF Certified", "url": "https://gaf.com/contractors/acme", "category": "manufacturer"}
        ]
    }"#;
    let invoker = ScriptedInvoker::new().push(ModelRole::Analyst, structuring);
    let context = context_with(Arc::new(invoker), None);
    let request = ResearchRequest::new(None, Some("Acme Roofing".into()), None, None);

    let report = run_deep_research(&context, &request).await.unwrap();

    assert_eq!(report.profile.additional_links.len(), 2);
    for link in &report.profile.additional_links {
        assert!(link.is_ai_suggested);
        assert!(!link.is_verified);
    }
}

// 属性4：置信度评分表精确复现（3项服务 → 75）
#[tokio::test]
async fn test_confidence_rubric_for_services() {
    let structuring = r#"{"services": ["Roofing", "Siding", "Gutters"]}"#;
    let invoker = ScriptedInvoker::new().push(ModelRole::Analyst, structuring);
    let context = context_with(Arc::new(invoker), None);
    let request = ResearchRequest::new(None, Some("Acme Roofing".into()), None, None);

    let report = run_deep_research(&context, &request).await.unwrap();
    assert_eq!(report.confidence["services"], 75);
}

// 属性5a：低于阈值且行业与位置可判定时必须触发竞争对手兜底
#[tokio::test]
async fn test_competitor_fallback_triggers_below_threshold() {
    let invoker = FailingInvoker::new();
    let context = context_with(invoker.clone(), None);
    let request = ResearchRequest::new(
        None,
        Some("Acme Roofing".into()),
        Some("Austin, TX".into()),
        Some("roofing".into()),
    );

    let report = run_deep_research(&context, &request).await.unwrap();
    assert!(report.data_quality.score < 40);
    assert!(report.data_quality.used_competitor_research);
}

// 属性5b：高于阈值时不触发竞争对手兜底
#[tokio::test]
async fn test_competitor_fallback_skipped_above_threshold() {
    let structuring = r#"{
        "name": "Acme Roofing",
        "website": "https://acme.com",
        "phone": "512-555-0100",
        "city": "Austin",
        "industry": "roofing",
        "audience": "homeowners",
        "services": ["Roof repair", "Roof replacement"],
        "usps": ["Lifetime warranty"]
    }"#;
    let invoker = ScriptedInvoker::new().push(ModelRole::Analyst, structuring);
    let context = context_with(Arc::new(invoker), None);
    let request = ResearchRequest::new(
        None,
        Some("Acme Roofing".into()),
        Some("Austin, TX".into()),
        Some("roofing".into()),
    );

    let report = run_deep_research(&context, &request).await.unwrap();
    assert_eq!(report.data_quality.score, 100);
    assert!(!report.data_quality.used_competitor_research);
}

// 属性6：官网抓取到的社交链接优先于AI猜测
#[tokio::test]
async fn test_scraped_social_links_win_over_ai_guess() {
    let deep_research = r#"{
        "companyInfo": {"name": "Acme Roofing"},
        "socialLinks": {"facebook": "https://facebook.com/acme-roofing-llc"},
        "sources": ["https://example.com/research"]
    }"#;
    let structuring = r#"{"name": "Acme Roofing"}"#;
    let invoker = ScriptedInvoker::new()
        .push(ModelRole::Researcher, deep_research)
        .push(ModelRole::Analyst, structuring);
    let search = Arc::new(StubSearch {
        scraped_facebook: Some("https://facebook.com/acme".into()),
    });
    let context = context_with(Arc::new(invoker), Some(search));
    let request = ResearchRequest::new(
        Some("https://acme.com".into()),
        Some("Acme Roofing".into()),
        None,
        None,
    );

    let report = run_deep_research(&context, &request).await.unwrap();
    assert_eq!(
        report.profile.social_links.facebook.as_deref(),
        Some("https://facebook.com/acme")
    );
    // 抓取过的官网进入证据来源
    assert!(report.research_sources.contains(&"https://acme.com".to_string()));
}

// 属性7：竞争对手兜底的回填是非破坏性的，绝不覆盖非空字段
#[tokio::test]
async fn test_competitor_backfill_is_non_destructive() {
    let structuring = r#"{"name": "Acme Roofing", "services": ["Roofing"]}"#;
    let industry_defaults = r#"{
        "usps": ["Licensed and insured", "Free estimates"],
        "commonServices": ["Generic service A", "Generic service B"]
    }"#;
    let invoker = ScriptedInvoker::new()
        .push(ModelRole::Analyst, structuring)
        .push(ModelRole::Analyst, industry_defaults);
    let context = context_with(Arc::new(invoker), None);
    let request = ResearchRequest::new(
        None,
        Some("Acme Roofing".into()),
        Some("Austin, TX".into()),
        Some("roofing".into()),
    );

    let report = run_deep_research(&context, &request).await.unwrap();
    assert!(report.data_quality.used_competitor_research);
    // 已有的服务列表保持原样，空的卖点被行业通用值回填
    assert_eq!(report.profile.services, vec!["Roofing".to_string()]);
    assert_eq!(
        report.profile.usps,
        vec!["Licensed and insured".to_string(), "Free estimates".to_string()]
    );
}

// 属性8：缺失电话与地址时产出恰好这两个缺失字段描述符
#[tokio::test]
async fn test_missing_field_prompts_for_phone_and_headquarters() {
    let structuring = r#"{
        "name": "Acme Roofing",
        "website": "https://acme.com",
        "industry": "roofing",
        "audience": "homeowners",
        "services": ["Roofing"],
        "usps": ["Fast turnaround"]
    }"#;
    let invoker = ScriptedInvoker::new().push(ModelRole::Analyst, structuring);
    let context = context_with(Arc::new(invoker), None);
    let request = ResearchRequest::new(None, Some("Acme Roofing".into()), None, None);

    let report = run_deep_research(&context, &request).await.unwrap();

    let keys: Vec<&str> = report
        .data_quality
        .missing_fields
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    assert_eq!(keys, vec!["phone", "headquarters"]);
    for field in &report.data_quality.missing_fields {
        assert_eq!(field.priority.to_string(), "medium");
        assert!(!field.prompt.is_empty());
    }
}

// verbose只控制控制台输出的详细程度，不改变调研结果
#[tokio::test]
async fn test_verbose_flag_does_not_change_results() {
    let request = ResearchRequest::new(
        None,
        Some("Acme Roofing".into()),
        Some("Austin, TX".into()),
        Some("roofing".into()),
    );

    let quiet = run_deep_research(&context_with(FailingInvoker::new(), None), &request)
        .await
        .unwrap();

    let mut verbose_config = Config::default();
    verbose_config.verbose = true;
    let loud_context =
        ResearchContext::with_components(FailingInvoker::new(), None, verbose_config);
    let loud = run_deep_research(&loud_context, &request).await.unwrap();

    assert_eq!(quiet.profile.name, loud.profile.name);
    assert_eq!(quiet.confidence, loud.confidence);
    assert_eq!(quiet.data_quality.score, loud.data_quality.score);
    assert_eq!(
        quiet.data_quality.used_competitor_research,
        loud.data_quality.used_competitor_research
    );
    assert_eq!(quiet.ai_team_notes, loud.ai_team_notes);
}

// 快速调研在模型失败时降级为空报告而不是错误
#[tokio::test]
async fn test_quick_research_degrades_to_empty_report() {
    let invoker = FailingInvoker::new();
    let context = context_with(invoker.clone(), None);
    let profile = CompanyProfile::minimal(Some("Acme Roofing".into()), None);

    let report = run_quick_research(&context, &profile).await.unwrap();
    assert!(report.suggestions.is_empty());
    assert!(report.fields_found.is_empty());
    assert_eq!(invoker.call_count(), 1);
}

// 快速调研只接受针对缺失字段的建议
#[tokio::test]
async fn test_quick_research_filters_suggestions_to_missing_fields() {
    let quick = r#"{
        "suggestions": [
            {"field": "phone", "value": "512-555-0100", "confidence": 60},
            {"field": "name", "value": "Different Name", "confidence": 90}
        ]
    }"#;
    let invoker = ScriptedInvoker::new().push(ModelRole::Analyst, quick);
    let context = context_with(Arc::new(invoker), None);
    // name已填写，针对它的建议必须被丢弃
    let profile = CompanyProfile::minimal(Some("Acme Roofing".into()), None);

    let report = run_quick_research(&context, &profile).await.unwrap();
    assert_eq!(report.suggestions.len(), 1);
    assert_eq!(report.suggestions[0].field, "phone");
    assert_eq!(report.fields_found, vec!["phone".to_string()]);
}
