//! 错误类型（对外暴露）
use std::path::PathBuf;
use thiserror::Error;

/// 内容获取失败（文件或远程资源）
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("getting url content failed, status code is not a success code: {url} ({status})")]
    Status { url: String, status: u16 },
}

/// 扫描阶段错误
#[derive(Error, Debug)]
pub enum ScanError {
    /// 目标为空，或没有任何目标满足 `.js` 判定
    #[error("no valid target: {0}")]
    TargetResolution(String),

    #[error("getting content of {target} failed: {source}")]
    ContentFetch {
        target: String,
        #[source]
        source: FetchError,
    },

    /// 输出路径的扩展名没有对应的输出引擎
    #[error("output engine not found for extension {0:?}")]
    OutputEngineNotFound(String),

    #[error("writing report {destination} failed: {source}")]
    ReportRender {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    pub(crate) fn render(destination: &str, source: impl Into<std::io::Error>) -> Self {
        ScanError::ReportRender { destination: destination.to_string(), source: source.into() }
    }
}
