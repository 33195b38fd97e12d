//! 工具函数模块
use crate::types::{Message, Role};
use log::warn;
use std::env;
use std::path::{Path, PathBuf};

/// 创建消息的便捷函数
///
/// # 参数
///
/// * `role` - 消息角色
/// * `content` - 消息内容
///
/// # 返回
///
/// 新创建的消息实例
pub fn message(role: Role, content: &str) -> Message {
    Message {
        role,
        content: content.to_string(),
    }
}

/// 计算 `.env` 文件的候选路径
///
/// 依次为当前目录、父目录、祖父目录，以及从当前目录向上
/// 最近的含 `Cargo.toml` 的目录
pub(crate) fn env_candidates(cwd: &Path) -> Vec<PathBuf> {
    let mut paths = vec![
        cwd.join(".env"),
        cwd.join("..").join(".env"),
        cwd.join("..").join("..").join(".env"),
    ];

    let mut dir = cwd;
    loop {
        if dir.join("Cargo.toml").is_file() {
            paths.push(dir.join(".env"));
            break;
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    paths
}

/// 从 `.env` 文件加载环境变量
///
/// 按候选路径逐个尝试，首个加载成功即返回；
/// 全部失败只记录一条警告，不视为错误
pub fn load_envs() {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for path in env_candidates(&cwd) {
        if dotenvy::from_path(&path).is_ok() {
            return;
        }
    }
    warn!("could not load .env file from any common location");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_message_creation() {
        let msg = message(Role::User, "Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    /// Tests that the near directories are probed first, in order.
    #[test]
    fn test_env_candidates_probe_near_directories_first() {
        let dir = tempdir().unwrap();
        let candidates = env_candidates(dir.path());
        assert_eq!(candidates[0], dir.path().join(".env"));
        assert_eq!(candidates[1], dir.path().join("..").join(".env"));
        assert_eq!(candidates[2], dir.path().join("..").join("..").join(".env"));
    }

    /// Tests that the nearest ancestor with a Cargo.toml marker contributes
    /// its .env path.
    #[test]
    fn test_env_candidates_find_project_root_marker() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("project");
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("Cargo.toml"), "[package]\n").unwrap();

        let candidates = env_candidates(&nested);
        assert_eq!(candidates.last().unwrap(), &root.join(".env"));
    }

    /// Tests that without a marker the candidate list is just the three
    /// nearby directories.
    #[test]
    fn test_env_candidates_without_marker() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("plain");
        fs::create_dir_all(&nested).unwrap();

        let candidates = env_candidates(&nested);
        assert_eq!(candidates.len(), 3);
    }
}
