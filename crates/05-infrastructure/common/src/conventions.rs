//! 约定规范定义
//!
//! 提供注册键与扫描包路径的命名约定

use crate::errors::ComponentError;
use crate::metadata::TypeDescriptor;

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 类型的规范注册键：简短类型名称首字母小写
    ///
    /// ```
    /// use infrastructure_common::{NamingConventions, TypeDescriptor};
    ///
    /// struct UserService;
    ///
    /// let key = NamingConventions::canonical_key(&TypeDescriptor::of::<UserService>());
    /// assert_eq!(key, "userService");
    /// ```
    pub fn canonical_key(descriptor: &TypeDescriptor) -> String {
        Self::lower_first(descriptor.simple_name())
    }

    /// 将首字符转换为小写，其余字符保持不变
    pub fn lower_first(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 规范化扫描包路径
    ///
    /// 同时接受 `a.b.c` 与 `a::b::c` 两种写法，去掉首尾空白
    pub fn normalize_package(package: &str) -> Result<String, ComponentError> {
        let trimmed = package.trim();
        if trimmed.is_empty() {
            return Err(ComponentError::scan_error("扫描包路径为空"));
        }

        let normalized = trimmed.replace('.', "::");
        let valid = normalized.split("::").all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|ch| ch.is_alphanumeric() || ch == '_')
        });

        if valid {
            Ok(normalized)
        } else {
            Err(ComponentError::scan_error(format!(
                "扫描包路径无效: {package}"
            )))
        }
    }
}
