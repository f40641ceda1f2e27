//! 扫描目标：分类、校验与任务划分
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// 单个扫描目标（文件路径或远程 URL），分类后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    RemoteUrl(String),
}

impl Target {
    /// 按是否包含 `http://` / `https://` 子串进行分类
    pub fn classify(raw: &str) -> Self {
        if raw.contains("http://") || raw.contains("https://") {
            Target::RemoteUrl(raw.to_string())
        } else {
            Target::File(PathBuf::from(raw))
        }
    }

    /// 目标的文件名部分：文件取 basename，URL 取路径最后一段（去掉查询串与片段）
    pub fn basename(&self) -> String {
        let name = match self {
            Target::File(p) => p.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default(),
            Target::RemoteUrl(u) => {
                let path = u.split(['?', '#']).next().unwrap_or(u.as_str());
                path.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string()
            }
        };
        if name.is_empty() { "index".to_string() } else { name }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::File(p) => write!(f, "{}", p.display()),
            Target::RemoteUrl(u) => f.write_str(u),
        }
    }
}

/// 单个目标的扫描任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub target: Target,
    pub output_destination: String,
}

impl ScanTask {
    pub fn new(target: Target, output_destination: impl Into<String>) -> Self {
        Self { target, output_destination: output_destination.into() }
    }

    /// 并行模式下为每个目标派生独立输出路径：`base + "." + basename(target)`
    /// base 为空（不输出）时保持为空
    pub fn derived(target: Target, base: &str) -> Self {
        let output_destination = if base.is_empty() {
            String::new()
        } else {
            format!("{}.{}", base, target.basename())
        };
        Self { target, output_destination }
    }
}

/// 目标判定：必须包含 `.js`
pub(crate) fn is_valid_target(raw: &str) -> bool {
    raw.contains(".js")
}

/// 将逗号分隔的目标串解析为目标列表
/// - 逐项去除空白并忽略空项
/// - 不满足 `.js` 判定的项给出告警并跳过；全部无效时返回错误
pub fn resolve_targets(raw: &str) -> Result<Vec<Target>, ScanError> {
    let mut out = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !is_valid_target(part) {
            tracing::warn!(target_name = part, "skipping target, it does not look like a javascript file or url");
            continue;
        }
        out.push(Target::classify(part));
    }
    if out.is_empty() {
        return Err(ScanError::TargetResolution(raw.to_string()));
    }
    Ok(out)
}

/// 取输出路径的扩展名（带点），无扩展名时为空串
pub(crate) fn output_extension(destination: &str) -> String {
    Path::new(destination)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
