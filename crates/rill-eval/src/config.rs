//! Interpreter configuration.
//! 解释器配置。

use std::path::{Path, PathBuf};

/// Interpreter configuration options.
/// 解释器配置选项。
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Directory relative paths (`import`, `readFile`) resolve against.
    /// 相对路径的解析基准目录。
    pub base_path: PathBuf,
    /// Whether host functions may reach the network.
    /// 是否允许访问网络。
    pub allow_network: bool,
    /// Maximum number of stream elements forced when displaying a value.
    /// 显示值时最多展开的流元素数。
    pub display_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            allow_network: true,
            display_limit: 1000,
        }
    }
}

impl InterpreterConfig {
    /// Create a new config with default values.
    /// 使用默认值创建新配置。
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base path.
    /// 设置基准目录。
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Allow or forbid network access.
    /// 允许或禁止网络访问。
    pub fn allow_network(mut self, allow: bool) -> Self {
        self.allow_network = allow;
        self
    }

    /// Set the display limit.
    /// 设置显示上限。
    pub fn display_limit(mut self, limit: usize) -> Self {
        self.display_limit = limit.max(1);
        self
    }

    /// Resolve `path` against the base path unless it is absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_resolve() {
        let config = InterpreterConfig::new()
            .base_path("/srv/scripts")
            .allow_network(false)
            .display_limit(0);
        assert!(!config.allow_network);
        assert_eq!(config.display_limit, 1);
        assert_eq!(config.resolve("lib.rill"), PathBuf::from("/srv/scripts/lib.rill"));
        assert_eq!(config.resolve("/etc/x.rill"), PathBuf::from("/etc/x.rill"));
    }
}
