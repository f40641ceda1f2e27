//! 配置文件加载（TOML）
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::options::ScanOptions;

/// 额外排除规则（追加到内置的两条排除正则之后）
#[derive(Debug, Clone, Default, Deserialize)]
struct ExcludeSection {
    #[serde(default)]
    pub file_types: Vec<String>,
    #[serde(default)]
    pub mime_types: Vec<String>,
}

/// 顶层配置文件结构
///
/// ```toml
/// workers = 8
/// user_agent = "linx"
///
/// [exclude]
/// file_types = ["/static/", "cdn.example.com"]
/// mime_types = ["application/xml"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    exclude: ExcludeSection,
}

impl ConfigFile {
    /// 将配置文件叠加到选项上：命令行已显式给出的值优先
    pub(crate) fn apply(self, opts: &mut ScanOptions) {
        if opts.workers.is_none() { opts.workers = self.workers; }
        if let Some(ua) = self.user_agent {
            if opts.user_agent == crate::options::DEFAULT_USER_AGENT { opts.user_agent = ua; }
        }
        opts.extra_file_type_exclusions.extend(self.exclude.file_types);
        opts.extra_mime_type_exclusions.extend(self.exclude.mime_types);
    }
}

/// 从 TOML 文件加载配置
pub(crate) fn load_config(path: &Path) -> Result<ConfigFile> {
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let parsed: ConfigFile = toml::from_str(&txt)
        .with_context(|| format!("parse config file {}", path.display()))?;
    Ok(parsed)
}

/// 若选项中指定了配置文件，则加载并合并
pub fn resolve_options(mut opts: ScanOptions) -> Result<ScanOptions> {
    if let Some(path) = opts.config_path.clone() {
        load_config(&path)?.apply(&mut opts);
    }
    Ok(opts)
}
