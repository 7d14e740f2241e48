//! LLM客户端 - 提供统一的模型调用接口

use anyhow::Result;
use async_trait::async_trait;

use crate::config::LLMConfig;
use crate::error::ResearchError;
use crate::llm::{InvokeOptions, ModelInvoker, ModelRole, ModelRouter, router::ModelHandle};

mod providers;

use providers::ProviderClient;

/// LLM客户端
///
/// 持有provider连接与角色路由表。无内置重试：上游失败以
/// `ResearchError::Upstream`返回，降级策略由编排器按阶段实施。
#[derive(Clone)]
pub struct LLMClient {
    client: ProviderClient,
    router: ModelRouter,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(config)?;
        let router = ModelRouter::from_config(config);
        Ok(Self { client, router })
    }

    fn effective_handle(&self, role: ModelRole, options: InvokeOptions) -> ModelHandle {
        let base = self.router.resolve(role);
        ModelHandle {
            model: base.model.clone(),
            temperature: options.temperature.unwrap_or(base.temperature),
            max_tokens: options.max_tokens.unwrap_or(base.max_tokens),
        }
    }
}

#[async_trait]
impl ModelInvoker for LLMClient {
    async fn invoke(
        &self,
        role: ModelRole,
        system_prompt: Option<&str>,
        user_prompt: &str,
        options: InvokeOptions,
    ) -> Result<String, ResearchError> {
        let handle = self.effective_handle(role, options);
        let agent = self
            .client
            .create_agent(&handle, system_prompt.unwrap_or_default());

        agent
            .prompt(user_prompt)
            .await
            .map_err(|e| ResearchError::Upstream(format!("[{}] {}", role, e)))
    }
}
