//! 提取流水线：按优先级依次运行规则 → 清洗 → 排除 → 去重 → 计算上下文
use std::collections::HashSet;

use crate::findings::RawMatch;
use crate::patterns::{PatternEngine, PatternKind};
use crate::types::{Finding, ResultSet};

/// 清洗后 URL 的最小长度（字符数）
pub(crate) const MIN_URL_LEN: usize = 4;

/// 属性前缀（值未加引号）及其收尾符
const ATTRIBUTE_PREFIXES: [&str; 4] = ["url(", "href=", "src=", "action="];
const ATTRIBUTE_CLOSERS: &[char] = &['"', '\'', ')', '>'];

/// 包裹 URL 的引号 / 反引号
const QUOTES: &[char] = &['"', '\'', '`'];

/// 在整段内容上运行提取流水线，返回该目标的结果集
/// - 规则之间相互独立地全量扫描；同一区间可被多条规则命中
/// - 单目标内按清洗后的 URL 精确去重，先到者胜（规则顺序即优先级）
pub fn extract(content: &[u8], engine: &PatternEngine, target: &str, output_destination: &str) -> ResultSet {
    let mut out = ResultSet::new(target, output_destination);
    let mut seen: HashSet<String> = HashSet::new();

    for (kind, re) in &engine.rules {
        for m in re.find_iter(content) {
            let raw = RawMatch { kind: *kind, start: m.start(), end: m.end() };
            if raw.end <= raw.start { continue; }

            let text = String::from_utf8_lossy(&content[raw.start..raw.end]);
            let url = normalize(raw.kind, &text);
            if url.chars().count() < MIN_URL_LEN { continue; }
            if engine.is_excluded(&url) {
                tracing::debug!(%url, kind = ?raw.kind, "excluded by noise rules");
                continue;
            }
            if !seen.insert(url.clone()) { continue; }

            let context = context_for(content, &raw);
            tracing::info!(%url, "found possible url");
            out.findings.push(Finding { url, context });
        }
    }

    tracing::info!(target_name = %out.target, count = out.findings.len(), "possible urls found");
    out
}

/// 按规则类别清洗原始命中文本
pub(crate) fn normalize(kind: PatternKind, raw: &str) -> String {
    let value = match kind {
        PatternKind::ConfigObject => raw.split_once(':').map_or(raw, |(_, v)| v),
        PatternKind::Assignment => raw.split_once('=').map_or(raw, |(_, v)| v),
        _ => raw,
    };
    strip_enclosing(value).replace("\\\"", "\"").replace("\\'", "'")
}

/// 去掉首尾空白后只剥离一层包裹：
/// - `.open(` 调用：跳过前缀与可选的请求方法参数，再按引号处理
/// - 属性前缀：去掉前缀以及至多一个收尾符
/// - 引号：去掉开头的一个引号以及至多一个结尾引号
///
/// URL 自身以 `)` 或引号结尾时保持不变
fn strip_enclosing(s: &str) -> &str {
    let mut s = s.trim();
    if let Some(rest) = s.strip_prefix(".open(") {
        s = skip_method_arg(rest.trim_start());
    } else if let Some(rest) = ATTRIBUTE_PREFIXES.iter().find_map(|p| s.strip_prefix(*p)) {
        return rest.strip_suffix(ATTRIBUTE_CLOSERS).unwrap_or(rest).trim();
    }
    match s.strip_prefix(QUOTES) {
        Some(rest) => rest.strip_suffix(QUOTES).unwrap_or(rest).trim(),
        None => s,
    }
}

/// `"GET", "/x"` → `"/x"`；首个参数不是带引号的单词时原样返回
fn skip_method_arg(s: &str) -> &str {
    match s.split_once(',') {
        Some((method, rest)) if is_quoted_word(method.trim_end()) => rest.trim_start(),
        _ => s,
    }
}

fn is_quoted_word(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() > 2
        && matches!(b[0], b'"' | b'\'')
        && matches!(b[b.len() - 1], b'"' | b'\'')
        && b[1..b.len() - 1].iter().all(u8::is_ascii_alphabetic)
}

/// 上下文片段：窗口两端收缩到 UTF-8 字符边界，避免截断多字节字符
fn context_for(content: &[u8], raw: &RawMatch) -> String {
    let (mut start, mut end) = raw.context_window(content.len());
    while start < raw.start && is_continuation(content[start]) { start += 1; }
    while end > raw.end && end < content.len() && is_continuation(content[end]) { end -= 1; }
    String::from_utf8_lossy(&content[start..end]).into_owned()
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}
