//! # nanoclaude - 轻量级 Anthropic Messages API 客户端
//!
//! nanoclaude 是一个围绕 Anthropic Messages API 的轻量级 Rust 客户端库，
//! 提供同步调用、流式调用，以及基于通道的增量文本转发。
//!
//! ## 主要特性
//!
//! - 🚀 **异步支持**：基于 `tokio` 的完全异步实现。
//! - 🔄 **流式响应**：SSE 事件解析为封闭的类型化事件枚举，穷尽匹配。
//! - 📦 **响应累积**：把事件序列折叠成一个完整的可查询响应对象。
//! - 📡 **通道转发**：后台任务按序转发文本片段，并以显式结束标记收尾。
//! - 🔧 **灵活配置**：Builder 模式，环境变量解析可注入、可测试。
//! - 🛡️ **错误处理**：基于 `thiserror` 的统一错误类型，凭据缺失返回错误而不是中止进程。
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use nanoclaude::client::ClaudeClient;
//! use nanoclaude::config::Config;
//! use nanoclaude::error::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // 从环境变量加载配置 (需要设置 ANTHROPIC_API_KEY)
//!     let config = Config::from_env()?;
//!     let client = ClaudeClient::new(config);
//!
//!     // 发起请求并获取响应
//!     let response = client.generate("What is a quaternion?").await?;
//!     println!("模型响应: {}", response);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 流式调用
//!
//! ```rust,no_run
//! use nanoclaude::{ClaudeClient, Config, Role, StreamItem};
//! use nanoclaude::utils::message;
//!
//! #[tokio::main]
//! async fn main() -> nanoclaude::Result<()> {
//!     let client = ClaudeClient::new(Config::from_env()?);
//!     let messages = vec![message(Role::User, "What is a quaternion?")];
//!
//!     let mut handle = client.stream_message(messages);
//!     while let Some(item) = handle.recv().await {
//!         match item {
//!             StreamItem::Fragment(text) => print!("{}", text),
//!             StreamItem::Done(response) => {
//!                 println!("\n停止原因: {:?}", response.stop_reason);
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// 模块定义
pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod stream;
pub mod types;
pub mod utils;

pub use client::{ClaudeClient, FragmentCallback, StreamHandle, StreamItem};
pub use config::{Config, EnvSource, ProcessEnv};
pub use error::{ClaudeError, Result};
pub use response::StreamedResponse;
pub use stream::MessageStream;
pub use types::{ContentBlock, ContentDelta, Message, MessageResponse, Role, StreamEvent};
