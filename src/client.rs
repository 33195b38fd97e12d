//! Anthropic 客户端核心模块
use crate::{
    config::Config,
    error::{ClaudeError, Result},
    response::StreamedResponse,
    stream::{EventParser, MessageStream},
    types::{Message, MessageResponse, Role, StreamEvent},
    utils::message,
};
use futures::{Stream, StreamExt};
use log::error;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, RequestBuilder, Response, StatusCode,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

// ================================================================================================
// 核心客户端模块
// ================================================================================================

/// Messages API 协议版本标头的取值
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// 每个非空文本片段同步调用一次的回调
pub type FragmentCallback = Box<dyn Fn(&str) + Send>;

/// 转发通道中的条目
///
/// 文本片段与结束标记是两个不同的变体，消费者无需借助
/// 通道关闭来推断流是否结束
#[derive(Debug)]
pub enum StreamItem {
    /// 新产生的文本片段
    Fragment(String),
    /// 流结束，携带最终累积的响应；`response.error` 非空表示流因错误终止
    Done(Box<StreamedResponse>),
}

/// 流式调用的消费端句柄
///
/// 后台任务是唯一的生产者；片段按折叠顺序到达，
/// 结束标记之后通道关闭
pub struct StreamHandle {
    receiver: mpsc::Receiver<StreamItem>,
}

impl StreamHandle {
    /// 接收下一个条目；通道关闭后返回 `None`
    pub async fn recv(&mut self) -> Option<StreamItem> {
        self.receiver.recv().await
    }

    /// 丢弃剩余片段，等待结束标记并返回最终响应
    pub async fn collect(mut self) -> Result<StreamedResponse> {
        while let Some(item) = self.recv().await {
            if let StreamItem::Done(response) = item {
                return Ok(*response);
            }
        }
        Err(ClaudeError::Stream(
            "channel closed before the stream finished".to_string(),
        ))
    }
}

/// 将事件流折叠进响应，并把文本片段依序转发到通道
///
/// 事件源报错时把错误记入响应的终止状态并停止折叠；
/// 无论成败，结尾都发送一个 `Done` 条目。消费端提前放弃时
/// 发送失败，转发随之停止
async fn pump<S>(
    mut response: StreamedResponse,
    events: S,
    tx: mpsc::Sender<StreamItem>,
    on_fragment: Option<FragmentCallback>,
) where
    S: Stream<Item = Result<StreamEvent>>,
{
    futures::pin_mut!(events);
    while let Some(next) = events.next().await {
        match next {
            Ok(event) => {
                if let Some(fragment) = response.fold(event) {
                    if let Some(callback) = &on_fragment {
                        callback(&fragment);
                    }
                    if tx.send(StreamItem::Fragment(fragment)).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                response.error = Some(e.to_string());
                break;
            }
        }
    }
    let _ = tx.send(StreamItem::Done(Box::new(response))).await;
}

/// Anthropic Messages API 客户端
///
/// 支持同步调用、原始流式调用，以及带转发通道的流式调用
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    client: Arc<Client>,
    config: Arc<Config>,
}

impl ClaudeClient {
    /// 创建一个新的 `ClaudeClient` 实例
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                error!("Failed to build reqwest client: {}", e);
                Client::new()
            });

        Self {
            client: Arc::new(client),
            config: Arc::new(config),
        }
    }

    /// 构建 API 请求所需的 HTTP 标头
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(self.config.api_key())
                .map_err(|e| ClaudeError::InvalidRequest(format!("Invalid API key: {}", e)))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// 构建 Messages API 请求体
    fn build_params(&self, messages: &[Message], stream: bool) -> Value {
        serde_json::json!({
            "model": self.config.model(),
            "max_tokens": self.config.max_tokens(),
            "messages": messages,
            "stream": stream,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.api_base())
    }

    /// 发送 HTTP 请求并按状态码分类错误
    async fn call_api(&self, request_builder: RequestBuilder) -> Result<Response> {
        let response = request_builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClaudeError::Auth(body),
            StatusCode::TOO_MANY_REQUESTS => ClaudeError::RateLimit(body),
            StatusCode::BAD_REQUEST => ClaudeError::InvalidRequest(body),
            _ => ClaudeError::Api(format!("Request failed with status {}: {}", status, body)),
        })
    }

    /// 发起同步（非流式）调用，返回完整响应
    pub async fn create_message(&self, messages: &[Message]) -> Result<MessageResponse> {
        let headers = self.build_headers()?;
        let request_builder = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .json(&self.build_params(messages, false));

        let response = self.call_api(request_builder).await?;
        Ok(response.json::<MessageResponse>().await?)
    }

    /// 为给定的提示生成响应文本
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = vec![message(Role::User, prompt)];
        self.create_message(&messages).await.map(|r| r.text())
    }

    /// 发起流式调用，返回原始事件流
    ///
    /// 供想要自行折叠事件的调用方使用
    pub async fn create_message_stream(&self, messages: &[Message]) -> Result<MessageStream> {
        let mut headers = self.build_headers()?;
        headers.insert("Accept", HeaderValue::from_static("text/event-stream"));
        let request_builder = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .json(&self.build_params(messages, true));

        let response = self.call_api(request_builder).await?;
        let events = EventParser::new().parse(response.bytes_stream());
        Ok(MessageStream::new(events))
    }

    /// 发起流式调用并通过通道转发文本片段
    ///
    /// 启动一个后台任务打开流式调用并逐个折叠事件。通道容量为 1：
    /// 消费者不取走当前片段时，后台任务停在该片段上
    pub fn stream_message(&self, messages: Vec<Message>) -> StreamHandle {
        self.spawn_stream(messages, None)
    }

    /// 同 `stream_message`，另对每个非空片段同步调用一次回调
    pub fn stream_message_with<F>(&self, messages: Vec<Message>, on_fragment: F) -> StreamHandle
    where
        F: Fn(&str) + Send + 'static,
    {
        self.spawn_stream(messages, Some(Box::new(on_fragment)))
    }

    fn spawn_stream(
        &self,
        messages: Vec<Message>,
        on_fragment: Option<FragmentCallback>,
    ) -> StreamHandle {
        let (tx, rx) = mpsc::channel(1);
        let client = self.clone();
        let mut response = StreamedResponse::new(self.config.model());

        tokio::spawn(async move {
            match client.create_message_stream(&messages).await {
                Ok(events) => pump(response, events, tx, on_fragment).await,
                Err(e) => {
                    // 打开调用失败同样以 Done 收尾，错误进入终止状态
                    response.error = Some(e.to_string());
                    let _ = tx.send(StreamItem::Done(Box::new(response))).await;
                }
            }
        });

        StreamHandle { receiver: rx }
    }
}
