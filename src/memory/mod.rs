use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Memory元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub data_sizes: HashMap<String, usize>,
    pub total_size: usize,
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            last_updated: Utc::now(),
            data_sizes: HashMap::new(),
            total_size: 0,
        }
    }
}

/// 调研过程的统一内存管理器
///
/// 各阶段的中间产物按作用域存放，后续阶段通过作用域+键取回，
/// 阶段之间不直接传递大对象。
#[derive(Debug)]
pub struct Memory {
    data: HashMap<String, Value>,
    metadata: MemoryMetadata,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            metadata: MemoryMetadata::new(),
        }
    }

    /// 存储数据到指定作用域和键
    pub fn store<T>(&mut self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = format!("{}:{}", scope, key);
        let serialized = serde_json::to_value(data)?;

        let data_size = serialized.to_string().len();
        if let Some(old_size) = self.metadata.data_sizes.get(&full_key) {
            self.metadata.total_size -= old_size;
        }
        self.metadata.data_sizes.insert(full_key.clone(), data_size);
        self.metadata.total_size += data_size;
        self.metadata.last_updated = Utc::now();

        self.data.insert(full_key, serialized);
        Ok(())
    }

    /// 从指定作用域和键获取数据
    pub fn get<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a>,
    {
        let full_key = format!("{}:{}", scope, key);
        self.data
            .get(&full_key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// 向字符串数组键追加一条记录（笔记、来源等流水属性）
    pub fn append<S: Into<String>>(&mut self, scope: &str, key: &str, entry: S) -> Result<()> {
        let mut entries: Vec<String> = self.get(scope, key).unwrap_or_default();
        entries.push(entry.into());
        self.store(scope, key, entries)
    }

    /// 获取内存使用统计
    pub fn get_usage_stats(&self) -> HashMap<String, usize> {
        let mut stats = HashMap::new();

        for (key, size) in &self.metadata.data_sizes {
            let scope = key.split(':').next().unwrap_or("unknown").to_string();
            *stats.entry(scope).or_insert(0) += size;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get_roundtrip() {
        let mut memory = Memory::new();
        memory.store("research", "strategy", vec!["q1", "q2"]).unwrap();

        let queries: Vec<String> = memory.get("research", "strategy").unwrap();
        assert_eq!(queries, vec!["q1", "q2"]);
        assert!(memory.get::<Vec<String>>("research", "missing").is_none());
    }

    #[test]
    fn test_scopes_are_isolated() {
        let mut memory = Memory::new();
        memory.store("a", "key", 1u32).unwrap();
        memory.store("b", "key", 2u32).unwrap();

        assert_eq!(memory.get::<u32>("a", "key"), Some(1));
        assert_eq!(memory.get::<u32>("b", "key"), Some(2));
    }

    #[test]
    fn test_append_accumulates() {
        let mut memory = Memory::new();
        memory.append("research", "notes", "第一条").unwrap();
        memory.append("research", "notes", "第二条").unwrap();

        let notes: Vec<String> = memory.get("research", "notes").unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1], "第二条");
    }

    #[test]
    fn test_overwrite_updates_size_accounting() {
        let mut memory = Memory::new();
        memory.store("s", "k", "short").unwrap();
        let before = memory.get_usage_stats()["s"];
        memory.store("s", "k", "a considerably longer value").unwrap();
        let after = memory.get_usage_stats()["s"];
        assert!(after > before);
    }
}
