//! 调研流水线的各个阶段
//!
//! 每个阶段是一个带类型化响应契约的单元：一段prompt、一次契约解析、
//! 一个确定性兜底值。阶段内部不做重试，失败由编排器替换为兜底值后
//! 继续推进。

pub mod deep_research;
pub mod quality;
pub mod quick;
pub mod seo;
pub mod social;
pub mod strategy;
pub mod structuring;
