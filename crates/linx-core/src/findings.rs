//! 原始命中与上下文窗口（内部使用）
use crate::patterns::PatternKind;

/// 上下文窗口：命中区间前后各取的字节数
pub(crate) const CONTEXT_RADIUS: usize = 100;

/// 单条规则在内容中的原始命中区间 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawMatch {
    pub(crate) kind: PatternKind,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl RawMatch {
    /// 命中区间外扩 ±100 字节，夹在内容边界内
    pub(crate) fn context_window(&self, content_len: usize) -> (usize, usize) {
        let start = self.start.saturating_sub(CONTEXT_RADIUS);
        let end = self.end.saturating_add(CONTEXT_RADIUS).min(content_len);
        (start, end)
    }
}
