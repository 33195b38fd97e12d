//! 错误处理模块

use thiserror::Error;

/// nanoclaude 库的统一错误类型
///
/// 按错误来源分类，便于上层应用区分配置问题与网络/协议问题
#[derive(Debug, Error)]
pub enum ClaudeError {
    /// HTTP 请求相关错误
    #[error("HTTP请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON处理错误: {0}")]
    Json(String),

    /// API 服务端错误
    #[error("API错误: {0}")]
    Api(String),

    /// 身份验证失败
    #[error("身份验证失败: {0}")]
    Auth(String),

    /// API 请求频率限制
    #[error("请求频率超限: {0}")]
    RateLimit(String),

    /// 请求参数无效
    #[error("请求参数无效: {0}")]
    InvalidRequest(String),

    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 流处理相关错误
    #[error("流处理错误: {0}")]
    Stream(String),
}

/// nanoclaude 库的 Result 类型别名
pub type Result<T> = std::result::Result<T, ClaudeError>;

impl From<serde_json::Error> for ClaudeError {
    fn from(e: serde_json::Error) -> Self {
        ClaudeError::Json(e.to_string())
    }
}
