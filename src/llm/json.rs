//! 模型输出的JSON契约提取
//!
//! 每个prompt/响应对被当作类型化的RPC契约处理：契约类型的JSON Schema
//! 随prompt下发，响应剥离Markdown代码围栏后解析，解析或schema不匹配
//! 统一走`ResearchError::Parse`兜底路径，不信任字段的隐式存在。

use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::error::ResearchError;

/// 剥离Markdown代码围栏，返回内部文本
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // 跳过围栏行上的语言标注（```json 等）
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    match body.rfind("```") {
        Some(idx) => body[..idx].trim(),
        None => body.trim(),
    }
}

/// 将自由格式的模型输出解析为契约类型
///
/// 围栏剥离后仍解析失败时，尝试截取首个`{`到末个`}`之间的片段再解析
/// 一次（模型偶发在JSON前后附加说明文字）。
pub fn parse_contract<T: DeserializeOwned>(raw: &str) -> Result<T, ResearchError> {
    let candidate = strip_code_fences(raw);

    match serde_json::from_str::<T>(candidate) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let start = candidate.find(['{', '[']);
            let end = candidate.rfind(['}', ']']);
            if let (Some(start), Some(end)) = (start, end)
                && start < end
                && let Ok(value) = serde_json::from_str::<T>(&candidate[start..=end])
            {
                return Ok(value);
            }
            Err(ResearchError::Parse(first_err.to_string()))
        }
    }
}

/// 生成嵌入prompt的schema说明段落
pub fn schema_instruction<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    format!(
        "## 输出格式要求\n只返回一个符合以下JSON Schema的JSON对象，不要附加任何解释文字：\n```json\n{}\n```",
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_parse_plain_json() {
        let parsed: Sample = parse_contract(r#"{"name":"acme","count":3}"#).unwrap();
        assert_eq!(parsed, Sample { name: "acme".into(), count: 3 });
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"name\":\"acme\",\"count\":3}\n```";
        let parsed: Sample = parse_contract(raw).unwrap();
        assert_eq!(parsed.name, "acme");
    }

    #[test]
    fn test_parse_fenced_without_language_tag() {
        let raw = "```\n{\"name\":\"acme\",\"count\":1}\n```";
        let parsed: Sample = parse_contract(raw).unwrap();
        assert_eq!(parsed.count, 1);
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let raw = "Here is the result:\n{\"name\":\"acme\",\"count\":9}\nHope this helps!";
        let parsed: Sample = parse_contract(raw).unwrap();
        assert_eq!(parsed.count, 9);
    }

    #[test]
    fn test_parse_failure_is_typed() {
        let result: Result<Sample, _> = parse_contract("I cannot answer that.");
        assert!(matches!(result, Err(crate::error::ResearchError::Parse(_))));
    }

    #[test]
    fn test_schema_mismatch_is_parse_error() {
        // 字段类型不符与JSON畸形走同一条兜底路径
        let result: Result<Sample, _> = parse_contract(r#"{"name":"acme","count":"three"}"#);
        assert!(matches!(result, Err(crate::error::ResearchError::Parse(_))));
    }

    #[test]
    fn test_strip_fences_on_unfenced_text() {
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }
}
