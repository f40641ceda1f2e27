//! 内容源：从本地文件或远程 URL 读取原始字节
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{FetchError, ScanError};
use crate::target::Target;

/// 内容获取能力（可跨线程共享）
pub trait ContentSource: Send + Sync {
    fn fetch(&self, target: &Target) -> Result<Vec<u8>, FetchError>;
}

/// 默认内容源：按目标类型分派到文件读取或 HTTP GET
/// - 不设超时、不重试
/// - HTTP 客户端只构建一次，供所有任务复用
pub struct DefaultSource {
    client: reqwest::blocking::Client,
}

impl DefaultSource {
    pub fn new(user_agent: &str) -> Result<Self, ScanError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| ScanError::Config(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl ContentSource for DefaultSource {
    fn fetch(&self, target: &Target) -> Result<Vec<u8>, FetchError> {
        match target {
            Target::File(path) => {
                tracing::debug!(path = %path.display(), "selected file content source");
                read_file(path)
            }
            Target::RemoteUrl(url) => {
                tracing::debug!(%url, "selected url content source");
                get_remote(&self.client, url)
            }
        }
    }
}

/// 整读文件（无大小上限，大文件会被完整缓冲）
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    if !path.exists() {
        return Err(FetchError::NotFound(path.to_path_buf()));
    }
    let io_err = |source: std::io::Error| FetchError::Io { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(io_err)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(io_err)?;
    Ok(buf)
}

/// 发起 GET 请求并读取完整响应体；状态码须在 [200,299]
fn get_remote(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let net_err = |source: reqwest::Error| FetchError::Network { url: url.to_string(), source };
    let resp = client.get(url).send().map_err(net_err)?;

    let status = resp.status();
    tracing::debug!(%url, status = status.as_u16(), "response received");
    if !status.is_success() {
        return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
    }

    tracing::debug!(%url, content_length = ?resp.content_length(), "reading response body");
    let body = resp.bytes().map_err(net_err)?;
    Ok(body.to_vec())
}
