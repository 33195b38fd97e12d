//! 配置模块
use crate::error::{ClaudeError, Result};
use crate::utils::load_envs;
use std::env;
use std::time::Duration;

// ================================================================================================
// 配置模块
// ================================================================================================

/// 默认模型
pub const DEFAULT_MODEL_ID: &str = "claude-sonnet-4-5-20250929";

/// 默认最大生成 token 数
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// API 密钥对应的环境变量名
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// 环境变量读取抽象
///
/// 配置解析不直接读取进程环境，而是通过该 trait 注入来源，
/// 测试时可以用内存表替代真实环境
pub trait EnvSource {
    /// 读取指定名称的变量，缺失时返回 `None`
    fn var(&self, key: &str) -> Option<String>;
}

/// 真实的进程环境
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Anthropic 客户端配置
///
/// 构造完成后不再变化；builder 方法从左到右依次生效，
/// 同一字段后设置的值覆盖先设置的值
#[derive(Debug, Clone)]
pub struct Config {
    /// 模型名称
    pub(crate) model: String,
    /// 最大生成 token 数
    pub(crate) max_tokens: u32,
    /// API 密钥
    pub(crate) api_key: String,
    /// API 基础 URL
    pub(crate) api_base: String,
    /// 请求超时时间
    pub(crate) timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_ID.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_key: String::new(),
            api_base: "https://api.anthropic.com".into(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// 生成 Config Builder 方法的宏
///
/// 自动生成 `with_field_name` 形式的 builder 方法
macro_rules! config_builder {
    ($field:ident, $type:ty) => {
        paste::paste! {
            #[doc = "设置 `"]
            #[doc = stringify!($field)]
            #[doc = "`"]
            pub fn [<with_ $field>](mut self, $field: $type) -> Self {
                self.$field = $field;
                self
            }
        }
    };
}

impl Config {
    pub fn model(&self) -> &str { &self.model }
    pub fn max_tokens(&self) -> u32 { self.max_tokens }
    pub fn api_key(&self) -> &str { &self.api_key }
    pub fn api_base(&self) -> &str { &self.api_base }
    pub fn timeout(&self) -> Duration { self.timeout }

    // 使用宏生成 builder 方法
    config_builder!(model, String);
    config_builder!(max_tokens, u32);
    config_builder!(api_key, String);
    config_builder!(api_base, String);
    config_builder!(timeout, Duration);

    /// 解析 API 密钥
    ///
    /// 已设置非空密钥时原样保留；否则从注入的环境源读取
    /// `ANTHROPIC_API_KEY`，两者都缺失则返回配置错误
    pub fn resolve_api_key(self, source: &dyn EnvSource) -> Result<Self> {
        if !self.api_key.is_empty() {
            return Ok(self);
        }
        match source.var(API_KEY_ENV) {
            Some(key) if !key.is_empty() => Ok(Self { api_key: key, ..self }),
            _ => Err(ClaudeError::Config(format!("{API_KEY_ENV} is not set"))),
        }
    }

    /// 从 `.env` 文件和环境变量加载配置
    pub fn from_env() -> Result<Self> {
        load_envs();
        Self::default().resolve_api_key(&ProcessEnv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory stand-in for the process environment.
    struct MapEnv(HashMap<String, String>);

    impl MapEnv {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl EnvSource for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    /// Tests that the default configuration is created correctly.
    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.model, DEFAULT_MODEL_ID);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.api_key, "");
        assert_eq!(config.api_base, "https://api.anthropic.com");
    }

    /// Tests the builder methods for setting configuration fields.
    #[test]
    fn test_config_builder_methods() {
        let config = Config::default()
            .with_model("claude-opus-4".to_string())
            .with_api_key("test_key".to_string())
            .with_max_tokens(2048);

        assert_eq!(config.model, "claude-opus-4");
        assert_eq!(config.api_key, "test_key");
        assert_eq!(config.max_tokens, 2048);
    }

    /// Tests that the later of two overrides on the same field wins,
    /// regardless of other overrides in between.
    #[test]
    fn test_override_order_later_wins() {
        let config = Config::default()
            .with_model("first".to_string())
            .with_max_tokens(10)
            .with_model("second".to_string());

        assert_eq!(config.model, "second");
        assert_eq!(config.max_tokens, 10);
    }

    /// Tests that a zero max-token value is accepted without validation.
    #[test]
    fn test_zero_max_tokens_accepted() {
        let config = Config::default().with_max_tokens(0);
        assert_eq!(config.max_tokens, 0);
    }

    /// Tests that an explicit non-empty key is kept verbatim even when
    /// the environment has a different one.
    #[test]
    fn test_resolve_api_key_explicit_wins() {
        let env = MapEnv::new(&[(API_KEY_ENV, "env_key")]);
        let config = Config::default()
            .with_api_key("explicit_key".to_string())
            .resolve_api_key(&env)
            .unwrap();
        assert_eq!(config.api_key, "explicit_key");
    }

    /// Tests that an empty explicit key falls back to the environment source.
    #[test]
    fn test_resolve_api_key_env_fallback() {
        let env = MapEnv::new(&[(API_KEY_ENV, "env_key")]);
        let config = Config::default()
            .with_api_key(String::new())
            .resolve_api_key(&env)
            .unwrap();
        assert_eq!(config.api_key, "env_key");
    }

    /// Tests that a missing key in both places is a typed configuration error.
    #[test]
    fn test_resolve_api_key_missing_is_config_error() {
        let env = MapEnv::new(&[]);
        let result = Config::default().resolve_api_key(&env);
        assert!(matches!(result, Err(ClaudeError::Config(_))));
    }

    /// Tests that an empty environment value counts as missing.
    #[test]
    fn test_resolve_api_key_empty_env_value_is_missing() {
        let env = MapEnv::new(&[(API_KEY_ENV, "")]);
        let result = Config::default().resolve_api_key(&env);
        assert!(matches!(result, Err(ClaudeError::Config(_))));
    }
}
