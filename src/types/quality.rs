use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// 缺失字段的优先级档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl Display for PriorityTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
        };
        write!(f, "{}", label)
    }
}

/// 缺失字段描述符
///
/// `prompt`是可以直接展示给最终用户的自然语言提问，用于请用户补齐
/// 自动化无法找到的信息，而不是静默编造看似可信的数据。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingField {
    pub key: String,
    pub label: String,
    pub priority: PriorityTier,
    pub prompt: String,
}

/// 数据质量评估
///
/// 在竞争对手兜底阶段前后各计算一次，调用方可据此观察改善幅度。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityAssessment {
    /// 关键字段清单的完整度百分比，0-100
    pub score: u8,
    /// 低于阈值时置位，表示信息有限
    pub limited_information: bool,
    /// 是否触发过竞争对手兜底调研
    pub used_competitor_research: bool,
    pub missing_fields: Vec<MissingField>,
}

/// 字段名 → 0-100置信度评分
///
/// 每次调研重新计算，随档案快照存在，不独立持久化。
pub type ConfidenceMap = std::collections::BTreeMap<String, u8>;
