//! # 变换构建模块
//!
//! 将用户给出的参数解析为唯一的 3x3 线性变换矩阵。
//!
//! ## 流程
//! 1. `TransformRequest::into_mode` - 解析后校验：矩阵模式与旋转模式互斥
//! 2. `resolve` - 读取矩阵文件，或由轴-角构造旋转矩阵
//! 3. `apply::apply` - 作用于晶格向量
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `nalgebra` 构造旋转矩阵
//! - 子模块: apply

pub mod apply;

use crate::error::{Result, XformError};
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};
use std::fs;
use std::path::{Path, PathBuf};

pub use apply::apply;

/// 作用于晶格基矢的 3x3 线性变换，所有元素有限
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix(pub Matrix3<f64>);

impl TransformMatrix {
    pub fn identity() -> Self {
        TransformMatrix(Matrix3::identity())
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }
}

/// 轴-角旋转参数（角度单位：度）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSpec {
    pub axis: Vector3<f64>,
    pub degrees: f64,
}

/// 变换模式
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// 从文件读取矩阵
    Matrix(PathBuf),
    /// 轴-角旋转
    Rotation(RotationSpec),
    /// 未请求任何变换
    NoneRequested,
}

/// 用户提供了哪些变换参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformRequest {
    pub matrix: Option<PathBuf>,
    pub axis: Option<[f64; 3]>,
    pub angle: Option<f64>,
}

impl TransformRequest {
    /// 校验模式组合，不做任何文件 I/O
    pub fn into_mode(self) -> Result<Mode> {
        match (self.matrix, self.axis, self.angle) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                Err(XformError::ConflictingTransformModes)
            }
            (Some(path), None, None) => Ok(Mode::Matrix(path)),
            (None, Some(axis), Some(degrees)) => Ok(Mode::Rotation(RotationSpec {
                axis: Vector3::from(axis),
                degrees,
            })),
            (None, Some(_), None) => Err(XformError::IncompleteRotation { missing: "angle" }),
            (None, None, Some(_)) => Err(XformError::IncompleteRotation { missing: "axis" }),
            (None, None, None) => Ok(Mode::NoneRequested),
        }
    }
}

/// 将模式解析为变换矩阵；未请求变换时返回单位矩阵
pub fn resolve(mode: &Mode) -> Result<TransformMatrix> {
    match mode {
        Mode::Matrix(path) => read_matrix_file(path),
        Mode::Rotation(spec) => rotation_matrix(spec),
        Mode::NoneRequested => Ok(TransformMatrix::identity()),
    }
}

/// 由轴-角构造右手旋转矩阵（Rodrigues 公式）
pub fn rotation_matrix(spec: &RotationSpec) -> Result<TransformMatrix> {
    if spec.axis.iter().any(|v| !v.is_finite()) {
        return Err(XformError::InvalidAxis {
            reason: format!(
                "({}, {}, {}) has non-finite components",
                spec.axis.x, spec.axis.y, spec.axis.z
            ),
        });
    }
    if !spec.degrees.is_finite() {
        return Err(XformError::InvalidAngle {
            value: spec.degrees,
        });
    }

    let axis = Unit::try_new(spec.axis, f64::EPSILON).ok_or_else(|| XformError::InvalidAxis {
        reason: "axis has zero length and cannot be normalized".to_string(),
    })?;

    let radians = spec.degrees.to_radians();
    let rotation = Rotation3::from_axis_angle(&axis, radians);

    Ok(TransformMatrix(rotation.into_inner()))
}

/// 读取包含 9 个实数的矩阵文件
pub fn read_matrix_file(path: &Path) -> Result<TransformMatrix> {
    let content = fs::read_to_string(path).map_err(|e| XformError::MalformedMatrixFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    parse_matrix(&content).map_err(|reason| XformError::MalformedMatrixFile {
        path: path.display().to_string(),
        reason,
    })
}

/// 按行优先顺序解析 9 个以空白分隔的实数
pub fn parse_matrix(text: &str) -> std::result::Result<TransformMatrix, String> {
    let values = text
        .split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(format!("non-finite value '{}'", token)),
            Err(_) => Err(format!("'{}' is not a number", token)),
        })
        .collect::<std::result::Result<Vec<f64>, String>>()?;

    if values.len() != 9 {
        return Err(format!("expected 9 numbers, found {}", values.len()));
    }

    Ok(TransformMatrix(Matrix3::from_row_slice(&values)))
}
