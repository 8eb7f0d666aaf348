//! # 统一错误处理模块
//!
//! 定义 xtal-transform 的所有错误类型，使用 `thiserror` 派生。
//!
//! "未请求变换" 不是错误：它只产生一条警告，并按单位矩阵处理。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xtal-transform 统一错误类型
#[derive(Error, Debug)]
pub enum XformError {
    // ─────────────────────────────────────────────────────────────
    // 输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("Structure file not found or not readable: {path}")]
    MissingRequiredInput { path: String },

    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 变换模式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Conflicting transform modes: use either --matrix or --axis/--angle, not both")]
    ConflictingTransformModes,

    #[error("Incomplete rotation: --{missing} is required as well")]
    IncompleteRotation { missing: &'static str },

    #[error("Invalid rotation axis: {reason}")]
    InvalidAxis { reason: String },

    #[error("Invalid rotation angle: {value}")]
    InvalidAngle { value: f64 },

    #[error("Malformed matrix file: {path}\nReason: {reason}")]
    MalformedMatrixFile { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 结构文件错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XformError>;
