//! 流式事件解析模块
use crate::{
    error::{ClaudeError, Result},
    types::StreamEvent,
};
use async_stream::try_stream;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use log::debug;
use std::{
    pin::Pin,
    task::{Context, Poll},
};

// ================================================================================================
// 流式事件解析器
// ================================================================================================

/// 一个无状态的流处理器，将 SSE (Server-Sent Events) 字节流解析为类型化事件
#[derive(Debug, Clone, Default)]
pub struct EventParser;

impl EventParser {
    /// 创建一个新的 `EventParser` 实例
    ///
    /// 这是一个无状态的结构体，所以 `new` 只是 `default` 的别名
    pub fn new() -> Self {
        EventParser
    }

    /// 将一个字节流转换为解析 `StreamEvent` 的流
    ///
    /// 事件的 JSON 负载自带 `type` 标签，所以只读取 `data:` 行；
    /// 注释行被跳过，无法解析的负载作为 `Json` 错误向下游传递
    pub fn parse<S>(&self, mut bytes_stream: S) -> impl Stream<Item = Result<StreamEvent>> + use<S>
    where
        S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static + Unpin,
    {
        try_stream! {
            let mut buffer = BytesMut::new();
            while let Some(bytes_res) = bytes_stream.next().await {
                let bytes = bytes_res.map_err(ClaudeError::from)?;
                buffer.extend_from_slice(&bytes);

                loop {
                    if let Some(pos) = buffer.windows(2).position(|w| w == [b'\n', b'\n']) {
                        let frame_bytes = buffer.split_to(pos + 2);

                        let frame_str = String::from_utf8_lossy(&frame_bytes).to_string();

                        let mut data = String::new();
                        for line in frame_str.lines() {
                            let trimmed = line.trim();
                            if trimmed.starts_with(':') {
                                continue;
                            }
                            if let Some(content) = trimmed.strip_prefix("data: ") {
                                if !data.is_empty() {
                                    data.push('\n');
                                }
                                data.push_str(content);
                            }
                        }

                        if !data.is_empty() {
                            match serde_json::from_str(&data) {
                                Ok(event) => yield event,
                                Err(e) => Err(ClaudeError::Json(format!("Failed to parse event: '{}', error: {}", data, e)))?,
                            }
                        }
                    } else {
                        break;
                    }
                }
            }

            if !buffer.is_empty() {
                debug!("Leftover buffer: {:?}", String::from_utf8_lossy(&buffer));
            }
        }
    }
}

/// `Stream<Item = Result<StreamEvent>>` 的简单包装
pub struct MessageStream {
    inner: Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>,
}

impl MessageStream {
    /// 创建一个新的 `MessageStream`
    pub fn new(stream: impl Stream<Item = Result<StreamEvent>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for MessageStream {
    type Item = Result<StreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
