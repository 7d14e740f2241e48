use thiserror::Error;

/// 调研流水线的错误分类
///
/// 除`InvalidRequest`外，所有可预见的外部失败都应在各阶段内被捕获并替换为
/// 该阶段的确定性兜底值，不允许向上传播导致整个流水线中止。
#[derive(Debug, Error)]
pub enum ResearchError {
    /// 输入校验失败（公司名称与网站均缺失等），流水线不启动
    #[error("无效的调研请求: {0}")]
    InvalidRequest(String),

    /// 上游模型或搜索服务调用失败（网络、超时、限流、非2xx）
    #[error("上游服务调用失败: {0}")]
    Upstream(String),

    /// 模型输出无法解析为约定的JSON契约
    #[error("模型输出解析失败: {0}")]
    Parse(String),

    /// 搜索/抓取服务未配置，相关阶段应降级为空操作
    #[error("搜索服务未配置")]
    SearchUnavailable,

    /// 阶段调用超时
    #[error("阶段 {0} 执行超时")]
    PhaseTimeout(String),

    /// 意外的程序性错误，整个流水线中止
    #[error("调研流水线内部错误: {0}")]
    Internal(String),
}

impl ResearchError {
    /// 该错误是否允许被阶段级兜底策略吸收
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ResearchError::InvalidRequest(_) | ResearchError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ResearchError::Upstream("timeout".into()).is_recoverable());
        assert!(ResearchError::Parse("bad json".into()).is_recoverable());
        assert!(ResearchError::SearchUnavailable.is_recoverable());
        assert!(ResearchError::PhaseTimeout("strategy".into()).is_recoverable());
        assert!(!ResearchError::InvalidRequest("empty".into()).is_recoverable());
        assert!(!ResearchError::Internal("bug".into()).is_recoverable());
    }
}
