//! API 数据结构模块

use serde::{Deserialize, Serialize};

// ================================================================================================
// API 请求结构
// ================================================================================================

/// 对话消息
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Message {
    /// 角色
    pub role: Role,
    /// 内容
    pub content: String,
}

/// 角色枚举
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 用户
    #[default]
    User,
    /// 助手
    Assistant,
}

// ================================================================================================
// 同步 API 响应结构
// ================================================================================================

/// Messages API 完整响应体
#[derive(Debug, Deserialize, Clone)]
pub struct MessageResponse {
    /// 消息 ID
    pub id: String,
    /// 使用模型
    #[serde(default)]
    pub model: String,
    /// 角色
    pub role: Role,
    /// 内容块列表
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// 结束原因
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// 结束序列
    #[serde(default)]
    pub stop_sequence: Option<String>,
    /// token 使用情况
    #[serde(default)]
    pub usage: Usage,
}

impl MessageResponse {
    /// 拼接响应中所有文本内容块
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// 内容块
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// 文本块
    Text {
        /// 文本内容
        text: String,
    },
    /// 工具调用块
    ToolUse {
        /// 调用 ID
        id: String,
        /// 工具名称
        name: String,
        /// 调用入参
        #[serde(default)]
        input: serde_json::Value,
    },
}

impl ContentBlock {
    /// 内容块的类型标识
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::ToolUse { .. } => "tool_use",
        }
    }
}

/// token 使用情况
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Usage {
    /// 输入 token 数量
    #[serde(default)]
    pub input_tokens: u64,
    /// 输出 token 数量
    #[serde(default)]
    pub output_tokens: u64,
    /// 缓存创建 token 数量
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
    /// 缓存读取 token 数量
    #[serde(default)]
    pub cache_read_input_tokens: u64,
}

// ================================================================================================
// 流式事件结构
// ================================================================================================

/// 流式调用产生的服务端事件
///
/// 带 `type` 标签的封闭枚举，折叠逻辑对其穷尽匹配；
/// 上游新增事件类型时需要在此处显式建模
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// 消息开始
    MessageStart {
        /// 消息头
        message: StartMessage,
    },
    /// 内容块开始
    ContentBlockStart {
        /// 块索引
        index: usize,
        /// 块内容，可能携带初始文本
        content_block: ContentBlock,
    },
    /// 内容块增量
    ContentBlockDelta {
        /// 块索引
        index: usize,
        /// 增量内容
        delta: ContentDelta,
    },
    /// 内容块结束
    ContentBlockStop {
        /// 块索引
        index: usize,
    },
    /// 消息级增量，携带结束原因与最新的 token 计数
    MessageDelta {
        /// 增量字段
        delta: MessageDeltaBody,
        /// 截至当前的 token 使用情况
        #[serde(default)]
        usage: Usage,
    },
    /// 消息结束
    MessageStop,
    /// 心跳
    Ping,
    /// 服务端错误事件
    Error {
        /// 错误描述
        error: ApiErrorBody,
    },
}

/// `message_start` 事件携带的消息头
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StartMessage {
    /// 消息 ID
    pub id: String,
    /// 角色
    pub role: Role,
    /// 使用模型
    #[serde(default)]
    pub model: String,
    /// token 使用情况
    #[serde(default)]
    pub usage: Usage,
}

/// 内容块增量内容
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDelta {
    /// 文本增量
    TextDelta {
        /// 新增文本
        text: String,
    },
    /// 工具入参 JSON 增量
    InputJsonDelta {
        /// JSON 片段
        partial_json: String,
    },
}

/// `message_delta` 事件携带的增量字段
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct MessageDeltaBody {
    /// 结束原因
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// 结束序列
    #[serde(default)]
    pub stop_sequence: Option<String>,
}

/// `error` 事件携带的错误描述
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiErrorBody {
    /// 错误类型标识
    #[serde(rename = "type")]
    pub kind: String,
    /// 错误消息
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that a realistic message_start payload deserializes into the typed event.
    #[test]
    fn test_message_start_deserializes() {
        let payload = r#"{
            "type": "message_start",
            "message": {
                "id": "msg_01XFDUDYJgAACzvnptvVoYEL",
                "type": "message",
                "role": "assistant",
                "model": "claude-sonnet-4-5-20250929",
                "content": [],
                "stop_reason": null,
                "stop_sequence": null,
                "usage": {"input_tokens": 25, "output_tokens": 1}
            }
        }"#;
        let event: StreamEvent = serde_json::from_str(payload).unwrap();
        match event {
            StreamEvent::MessageStart { message } => {
                assert_eq!(message.id, "msg_01XFDUDYJgAACzvnptvVoYEL");
                assert_eq!(message.role, Role::Assistant);
                assert_eq!(message.usage.input_tokens, 25);
            }
            other => panic!("expected MessageStart, got {other:?}"),
        }
    }

    /// Tests that a text delta payload deserializes with its fragment.
    #[test]
    fn test_content_block_delta_deserializes() {
        let payload =
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hello"}}"#;
        let event: StreamEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(
            event,
            StreamEvent::ContentBlockDelta {
                index: 0,
                delta: ContentDelta::TextDelta {
                    text: "Hello".to_string()
                },
            }
        );
    }

    /// Tests that message_delta carries stop reason and running usage totals.
    #[test]
    fn test_message_delta_deserializes() {
        let payload = r#"{
            "type": "message_delta",
            "delta": {"stop_reason": "end_turn", "stop_sequence": null},
            "usage": {"output_tokens": 15, "cache_read_input_tokens": 3}
        }"#;
        let event: StreamEvent = serde_json::from_str(payload).unwrap();
        match event {
            StreamEvent::MessageDelta { delta, usage } => {
                assert_eq!(delta.stop_reason.as_deref(), Some("end_turn"));
                assert_eq!(delta.stop_sequence, None);
                assert_eq!(usage.output_tokens, 15);
                assert_eq!(usage.cache_read_input_tokens, 3);
            }
            other => panic!("expected MessageDelta, got {other:?}"),
        }
    }

    /// Tests that an error event deserializes into the typed body.
    #[test]
    fn test_error_event_deserializes() {
        let payload =
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let event: StreamEvent = serde_json::from_str(payload).unwrap();
        match event {
            StreamEvent::Error { error } => {
                assert_eq!(error.kind, "overloaded_error");
                assert_eq!(error.message, "Overloaded");
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    /// Tests that an event tag outside the closed union is a parse error,
    /// not a silently dropped case.
    #[test]
    fn test_unknown_event_tag_fails_to_parse() {
        let payload = r#"{"type":"totally_new_event","data":{}}"#;
        assert!(serde_json::from_str::<StreamEvent>(payload).is_err());
    }

    /// Tests extracting concatenated text from a full response.
    #[test]
    fn test_message_response_text() {
        let payload = r#"{
            "id": "msg_1",
            "model": "claude-sonnet-4-5-20250929",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Hello "},
                {"type": "tool_use", "id": "tu_1", "name": "search", "input": {}},
                {"type": "text", "text": "World"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: MessageResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.text(), "Hello World");
        assert_eq!(response.content[1].kind(), "tool_use");
    }
}
