use serde::{Deserialize, Serialize};

use crate::types::profile::SocialPlatform;
use crate::types::request::ResearchRequest;

/// 策略阶段对缺失身份字段的最佳猜测
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityGuess {
    pub name: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
}

/// 调研策略 - 策略阶段的临时产物
///
/// 每个请求只生成一次，被执行阶段消费后即丢弃，不做持久化。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchStrategy {
    /// 按优先级排序的搜索查询
    pub queries: Vec<String>,
    /// 优先调查的平台
    pub priority_platforms: Vec<SocialPlatform>,
    /// 身份字段最佳猜测
    pub best_guess: IdentityGuess,
    /// 策略员的自由文本备注
    pub notes: Option<String>,
}

impl ResearchStrategy {
    /// 行业判定：请求输入优先，其次采用策略员猜测
    pub fn resolved_industry(&self, request: &ResearchRequest) -> Option<String> {
        request
            .industry_type
            .clone()
            .or_else(|| self.best_guess.industry.clone())
    }

    /// 地点判定：请求输入优先，其次采用策略员猜测
    pub fn resolved_location(&self, request: &ResearchRequest) -> Option<String> {
        request
            .location
            .clone()
            .or_else(|| self.best_guess.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_prefers_request_over_guess() {
        let strategy = ResearchStrategy {
            queries: vec![],
            priority_platforms: vec![],
            best_guess: IdentityGuess {
                name: None,
                location: Some("Dallas, TX".into()),
                industry: Some("roofing".into()),
            },
            notes: None,
        };

        let request = ResearchRequest::new(
            None,
            Some("Acme".into()),
            Some("Austin, TX".into()),
            None,
        );
        assert_eq!(strategy.resolved_location(&request).as_deref(), Some("Austin, TX"));
        // 请求未提供行业时回退到策略员猜测
        assert_eq!(strategy.resolved_industry(&request).as_deref(), Some("roofing"));
    }
}
