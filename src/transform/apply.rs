//! # 晶格变换
//!
//! 约定：变换矩阵 F 作用于列向量形式的晶格基矢，即 a' = F·a。
//! `Lattice` 以行向量存储，因此 L' = L·Fᵀ。分数坐标保持不变，
//! 原子的笛卡尔坐标随晶格一起形变。
//!
//! ## 依赖关系
//! - 被 `transform/mod.rs` 导出
//! - 使用 `models/structure.rs`

use super::TransformMatrix;
use crate::models::{Crystal, Lattice};

/// 对结构的晶格施加线性变换，返回新结构
pub fn apply(crystal: &Crystal, transform: &TransformMatrix) -> Crystal {
    let lattice = Lattice {
        matrix: crystal.lattice.matrix * transform.matrix().transpose(),
    };

    Crystal {
        lattice,
        ..crystal.clone()
    }
}
