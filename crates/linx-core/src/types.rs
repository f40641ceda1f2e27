//! 公共类型（对外暴露）
use serde::Serialize;

/// 单条发现：清洗后的 URL 与其上下文片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub url: String,
    pub context: String,
}

/// 单个目标的结果集（对应一份报告）
/// 同一结果集中 `url` 不重复（精确字符串比较）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub target: String,
    pub output_destination: String,
    pub findings: Vec<Finding>,
}

impl ResultSet {
    pub fn new(target: impl Into<String>, output_destination: impl Into<String>) -> Self {
        Self { target: target.into(), output_destination: output_destination.into(), findings: Vec::new() }
    }
}
