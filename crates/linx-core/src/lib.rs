//! JavaScript 链接提取核心库
//!
//! 设计要点：
//! - 直接在原始字节缓冲区上运行规则（`regex::bytes`），命中片段再有损解码为字符串。
//! - 五类提取规则按固定顺序执行，顺序即去重优先级；两条排除规则过滤常见噪声。
//! - 单目标内按清洗后的 URL 精确去重；目标之间不去重。
//! - 多目标并行时使用固定上限的线程池，单个目标失败不影响其他目标。

mod config;
mod error;
mod findings;
mod options;
mod patterns;
mod pipeline;
mod report;
mod scan;
mod source;
mod target;
mod types;

pub use config::resolve_options;
pub use error::{FetchError, ScanError};
pub use options::{ScanOptions, ScanStats, DEFAULT_USER_AGENT};
pub use patterns::{PatternEngine, PatternKind};
pub use pipeline::extract;
pub use report::Reporter;
pub use scan::{run, run_with, scan_task};
pub use source::{ContentSource, DefaultSource};
pub use target::{resolve_targets, ScanTask, Target};
pub use types::{Finding, ResultSet};
