//! 流水线各阶段在Memory中的作用域与键约定

pub struct MemoryScope;

impl MemoryScope {
    pub const RESEARCH: &'static str = "research";
}

pub struct ScopedKeys;

impl ScopedKeys {
    /// 策略阶段产物，深度调研阶段取回
    pub const STRATEGY: &'static str = "strategy";
    /// 叠加社交发现后的原始数据包，结构化阶段取回
    pub const RAW_BUNDLE: &'static str = "raw_bundle";
    /// 各阶段累积的证据来源（字符串数组，追加写入）
    pub const SOURCES: &'static str = "sources";
    /// 策略员与各阶段的过程备注（字符串数组，追加写入）
    pub const NOTES: &'static str = "notes";
}
