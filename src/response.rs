//! 流式响应累积模块
use crate::types::{ContentBlock, ContentDelta, Role, StreamEvent};

// ================================================================================================
// 流式响应累积器
// ================================================================================================

/// 由一次流式调用的事件序列折叠而成的完整响应
///
/// 每次调用创建一个实例，模型名在构造时固定。`content` 随文本增量
/// 单调追加；token 计数取事件中报告的最新累计值，覆盖而不是累加。
/// 流正常结束时 `error` 为 `None`，因错误终止时携带错误描述。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamedResponse {
    /// 消息 ID
    pub message_id: String,
    /// 使用模型
    pub model: String,
    /// 角色，收到 `message_start` 之前为 `None`
    pub role: Option<Role>,
    /// 累积的文本内容
    pub content: String,
    /// 最近一个内容块的类型标识
    pub content_block_type: Option<&'static str>,
    /// 最近一个内容块的索引
    pub content_block_index: usize,
    /// 结束原因
    pub stop_reason: Option<String>,
    /// 结束序列
    pub stop_sequence: Option<String>,
    /// 输入 token 数量
    pub input_tokens: u64,
    /// 输出 token 数量
    pub output_tokens: u64,
    /// 缓存创建 token 数量
    pub cache_creation_input_tokens: u64,
    /// 缓存读取 token 数量
    pub cache_read_input_tokens: u64,
    /// 终止错误
    pub error: Option<String>,
}

impl StreamedResponse {
    /// 创建一个绑定到指定模型的空响应
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// 折叠一个流式事件，返回本次新产生的文本片段
    ///
    /// 对事件顺序不做校验：乱序或重复的事件按同样的规则覆盖或追加，
    /// 不会产生非法状态转移错误
    pub fn fold(&mut self, event: StreamEvent) -> Option<String> {
        match event {
            StreamEvent::MessageStart { message } => {
                self.message_id = message.id;
                self.role = Some(message.role);
                self.input_tokens = message.usage.input_tokens;
                None
            }
            StreamEvent::ContentBlockStart {
                index,
                content_block,
            } => {
                self.content_block_index = index;
                self.content_block_type = Some(content_block.kind());
                match content_block {
                    ContentBlock::Text { text } if !text.is_empty() => {
                        self.content.push_str(&text);
                        Some(text)
                    }
                    _ => None,
                }
            }
            StreamEvent::ContentBlockDelta { delta, .. } => match delta {
                ContentDelta::TextDelta { text } if !text.is_empty() => {
                    self.content.push_str(&text);
                    Some(text)
                }
                _ => None,
            },
            StreamEvent::MessageDelta { delta, usage } => {
                self.stop_reason = delta.stop_reason;
                // 不用空值覆盖已上报的结束序列
                if let Some(sequence) = delta.stop_sequence {
                    if !sequence.is_empty() {
                        self.stop_sequence = Some(sequence);
                    }
                }
                self.output_tokens = usage.output_tokens;
                self.cache_creation_input_tokens = usage.cache_creation_input_tokens;
                self.cache_read_input_tokens = usage.cache_read_input_tokens;
                None
            }
            StreamEvent::Error { error } => {
                self.error = Some(format!("{}: {}", error.kind, error.message));
                None
            }
            StreamEvent::ContentBlockStop { .. } | StreamEvent::MessageStop | StreamEvent::Ping => {
                None
            }
        }
    }
}
