//! 扫描选项与统计信息（模块）
use std::path::PathBuf;

/// 远程获取时使用的固定浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 扫描选项
///
/// 进程启动时构建一次，之后只读地以引用传入协调器与内容源。
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 目标列表（逗号分隔的文件路径或 URL）
    pub target: String,
    /// 输出路径；扩展名决定输出引擎（空=不输出，.html，.json）
    pub output: String,
    /// 多目标时是否并行
    pub parallel: bool,
    /// 并行工作线程上限：None 表示自动（等于 CPU 核数）
    pub workers: Option<usize>,
    /// HTTP 请求头 User-Agent
    pub user_agent: String,
    /// 追加到文件类型排除规则的额外分支
    pub extra_file_type_exclusions: Vec<String>,
    /// 追加到 MIME 排除规则的额外分支
    pub extra_mime_type_exclusions: Vec<String>,
    /// 配置文件路径（TOML）；为空则只使用命令行参数
    pub config_path: Option<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            target: String::new(),
            output: String::new(),
            parallel: false,
            workers: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_file_type_exclusions: Vec::new(),
            extra_mime_type_exclusions: Vec::new(),
            config_path: None,
        }
    }
}

impl ScanOptions {
    /// 实际使用的线程数（至少为 1）
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub targets_total: usize,
    pub targets_scanned: usize,
    pub targets_failed: usize,
    pub findings_total: usize,
}
