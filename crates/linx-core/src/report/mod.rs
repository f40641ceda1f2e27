//! 输出引擎：按输出路径扩展名选择（空=不输出，.html，.json）
mod html;
mod json;

use crate::error::ScanError;
use crate::target::output_extension;
use crate::types::ResultSet;

/// 输出引擎（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporter {
    Noop,
    Html,
    Json,
}

impl Reporter {
    /// 由扩展名选择输出引擎；未知扩展名返回 `OutputEngineNotFound`
    pub fn for_destination(destination: &str) -> Result<Self, ScanError> {
        match output_extension(destination).as_str() {
            "" => Ok(Reporter::Noop),
            ".html" => Ok(Reporter::Html),
            ".json" => Ok(Reporter::Json),
            other => Err(ScanError::OutputEngineNotFound(other.to_string())),
        }
    }

    /// 渲染并写入 `result.output_destination`
    pub fn render(&self, result: &ResultSet) -> Result<(), ScanError> {
        match self {
            Reporter::Noop => Ok(()),
            Reporter::Html => html::render_and_save(result),
            Reporter::Json => json::render_and_save(result),
        }
    }
}
