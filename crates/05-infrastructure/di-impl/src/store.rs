//! Bean 存储
//!
//! 同一批 Bean 上的两个索引：按规范类型键（`by_type`）与按 Bean 方法名（`by_name`）

use infrastructure_common::Bean;
use std::collections::HashMap;
use std::sync::Arc;

/// 双索引 Bean 存储
#[derive(Debug, Default, Clone)]
pub struct BeanStore {
    /// 规范类型键 → Bean
    by_type: HashMap<String, Bean>,
    /// Bean 方法名 → Bean
    by_name: HashMap<String, Bean>,
}

impl BeanStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 类型键是否已注册
    pub fn contains_type(&self, key: &str) -> bool {
        self.by_type.contains_key(key)
    }

    /// 按类型键取出 Bean
    pub fn get_by_type(&self, key: &str) -> Option<Bean> {
        self.by_type.get(key).cloned()
    }

    /// 以类型键注册组件（后写覆盖）
    pub fn insert_type(&mut self, key: impl Into<String>, bean: Bean) {
        self.by_type.insert(key.into(), bean);
    }

    /// 注册 Bean 方法的返回值，同时更新名称索引与类型索引
    pub fn insert_provided(&mut self, name: impl Into<String>, type_key: impl Into<String>, bean: Bean) {
        self.by_name.insert(name.into(), Arc::clone(&bean));
        self.by_type.insert(type_key.into(), bean);
    }

    /// 查找：先查名称索引，再查类型索引
    pub fn lookup(&self, key: &str) -> Option<Bean> {
        self.by_name
            .get(key)
            .or_else(|| self.by_type.get(key))
            .cloned()
    }

    /// 所有键（去重，排序）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .keys()
            .chain(self.by_type.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// 不同键的数量
    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_name.is_empty()
    }

    /// 清空两个索引
    pub fn clear(&mut self) {
        self.by_type.clear();
        self.by_name.clear();
    }
}
