use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::LLMConfig;

/// 流水线阶段的模型角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    /// 策略制定：确定性JSON输出优先
    Strategist,
    /// 数据结构化与推断
    Analyst,
    /// 广域调研：容忍探索性输出
    Researcher,
}

impl Display for ModelRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ModelRole::Strategist => "strategist",
            ModelRole::Analyst => "analyst",
            ModelRole::Researcher => "researcher",
        };
        write!(f, "{}", label)
    }
}

/// 解析后的模型句柄：模型名 + 采样参数
#[derive(Debug, Clone)]
pub struct ModelHandle {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// 各角色的默认温度
///
/// 策略员与分析员偏确定性，调研员允许更广的探索。
const TEMPERATURE_STRATEGIST: f64 = 0.1;
const TEMPERATURE_ANALYST: f64 = 0.2;
const TEMPERATURE_RESEARCHER: f64 = 0.7;

/// 角色 → 模型的显式映射
///
/// 作为依赖注入编排器，替代进程级的全局配置查找，使测试可以替换
/// 确定性桩模型而不触碰流水线逻辑。
#[derive(Debug, Clone)]
pub struct ModelRouter {
    strategist: ModelHandle,
    analyst: ModelHandle,
    researcher: ModelHandle,
}

impl ModelRouter {
    pub fn from_config(config: &LLMConfig) -> Self {
        Self {
            strategist: ModelHandle {
                model: config.model_strategist.clone(),
                temperature: TEMPERATURE_STRATEGIST,
                max_tokens: config.max_tokens,
            },
            analyst: ModelHandle {
                model: config.model_analyst.clone(),
                temperature: TEMPERATURE_ANALYST,
                max_tokens: config.max_tokens,
            },
            researcher: ModelHandle {
                model: config.model_researcher.clone(),
                temperature: TEMPERATURE_RESEARCHER,
                max_tokens: config.max_tokens,
            },
        }
    }

    /// 解析角色对应的模型句柄
    pub fn resolve(&self, role: ModelRole) -> &ModelHandle {
        match role {
            ModelRole::Strategist => &self.strategist,
            ModelRole::Analyst => &self.analyst,
            ModelRole::Researcher => &self.researcher,
        }
    }
}
