//! # 工具函数模块
//!
//! 提供美化输出和晶格对比表。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `router` 使用
//! - 子模块: output, summary

pub mod output;
pub mod summary;
