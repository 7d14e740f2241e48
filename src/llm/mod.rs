//! LLM调用层 - 角色到模型的路由与统一的调用接口

use async_trait::async_trait;

use crate::error::ResearchError;

pub mod client;
pub mod json;
pub mod router;

pub use router::{ModelHandle, ModelRole, ModelRouter};

/// 单次调用的可选覆盖项，未指定时采用角色对应`ModelHandle`的默认值
#[derive(Debug, Clone, Copy, Default)]
pub struct InvokeOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// 模型调用接口
///
/// 该层无状态、可安全重试，但不内置重试——失败直接以类型化错误返回，
/// 由编排器决定降级到各阶段的确定性兜底值。模型层面的拒答或畸形输出
/// 不在此处抛错，原始文本原样返回，JSON提取由调用方负责。
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(
        &self,
        role: ModelRole,
        system_prompt: Option<&str>,
        user_prompt: &str,
        options: InvokeOptions,
    ) -> Result<String, ResearchError>;
}
