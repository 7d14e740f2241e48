use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::llm::ModelInvoker;
use crate::llm::client::LLMClient;
use crate::memory::Memory;
use crate::pipeline::memory::{MemoryScope, ScopedKeys};
use crate::search::{SearchProvider, WebSearchClient};

/// 调研上下文
///
/// 各阶段共享的依赖集合。搜索能力是可选的：未配置时为`None`，依赖
/// 它的阶段降级为空操作而非报错。
#[derive(Clone)]
pub struct ResearchContext {
    /// 模型调用器
    pub llm: Arc<dyn ModelInvoker>,
    /// 搜索/抓取服务，可缺席
    pub search: Option<Arc<dyn SearchProvider>>,
    /// 配置
    pub config: Config,
    /// 调研记忆
    pub memory: Arc<RwLock<Memory>>,
}

impl ResearchContext {
    /// 按配置创建上下文，装配真实的模型与搜索客户端
    pub fn new(config: Config) -> Result<Self> {
        let llm: Arc<dyn ModelInvoker> = Arc::new(LLMClient::new(&config.llm)?);
        let search: Option<Arc<dyn SearchProvider>> = if config.search.is_configured() {
            Some(Arc::new(WebSearchClient::new(&config.search)?))
        } else {
            None
        };

        Ok(Self {
            llm,
            search,
            config,
            memory: Arc::new(RwLock::new(Memory::new())),
        })
    }

    /// 以显式组件装配上下文，测试时注入桩实现
    pub fn with_components(
        llm: Arc<dyn ModelInvoker>,
        search: Option<Arc<dyn SearchProvider>>,
        config: Config,
    ) -> Self {
        Self {
            llm,
            search,
            config,
            memory: Arc::new(RwLock::new(Memory::new())),
        }
    }

    /// 存储数据到 Memory
    pub async fn store_to_memory<T>(&self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.store(scope, key, data)
    }

    /// 从 Memory 获取数据
    pub async fn get_from_memory<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a> + Send + Sync,
    {
        let memory = self.memory.read().await;
        memory.get(scope, key)
    }

    /// 追加一条过程备注
    pub async fn add_note<S: Into<String>>(&self, note: S) -> Result<()> {
        let mut memory = self.memory.write().await;
        memory.append(MemoryScope::RESEARCH, ScopedKeys::NOTES, note)
    }

    /// 追加一条证据来源（去重）
    pub async fn add_source<S: Into<String>>(&self, source: S) -> Result<()> {
        let source = source.into();
        let mut memory = self.memory.write().await;
        let existing: Vec<String> = memory
            .get(MemoryScope::RESEARCH, ScopedKeys::SOURCES)
            .unwrap_or_default();
        if existing.contains(&source) {
            return Ok(());
        }
        memory.append(MemoryScope::RESEARCH, ScopedKeys::SOURCES, source)
    }

    /// 取回累积的备注
    pub async fn notes(&self) -> Vec<String> {
        let memory = self.memory.read().await;
        memory
            .get(MemoryScope::RESEARCH, ScopedKeys::NOTES)
            .unwrap_or_default()
    }

    /// 取回累积的证据来源
    pub async fn sources(&self) -> Vec<String> {
        let memory = self.memory.read().await;
        memory
            .get(MemoryScope::RESEARCH, ScopedKeys::SOURCES)
            .unwrap_or_default()
    }
}
