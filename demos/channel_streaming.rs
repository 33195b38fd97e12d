//! # 通道转发示例
//!
//! 这个示例展示了带转发通道的流式调用：
//! - 后台任务打开流式调用并折叠事件
//! - 消费端从通道按序接收文本片段
//! - 显式的结束标记携带最终累积的响应

use nanoclaude::utils::message;
use nanoclaude::{ClaudeClient, Config, Result, Role, StreamItem};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("配置加载失败: {e}");
            eprintln!("请设置 ANTHROPIC_API_KEY 环境变量");
            return Ok(());
        }
    };

    let client = ClaudeClient::new(config);
    let messages = vec![message(Role::User, "What is a quaternion?")];

    // 后台任务立即开始折叠，句柄用于消费
    let mut handle = client.stream_message(messages);

    while let Some(item) = handle.recv().await {
        match item {
            StreamItem::Fragment(fragment) => {
                print!("{fragment}");
                io::stdout().flush().ok();
            }
            StreamItem::Done(response) => {
                println!();
                if let Some(error) = &response.error {
                    eprintln!("流因错误终止: {error}");
                }
                println!("\n--------------------------------");
                println!("Message ID: {}", response.message_id);
                println!("Content: {}", response.content);
                println!("Stop Reason: {:?}", response.stop_reason);
                println!("Input Tokens: {}", response.input_tokens);
                println!("Output Tokens: {}", response.output_tokens);
                println!("--------------------------------");
            }
        }
    }

    Ok(())
}
