//! # 晶格对比表
//!
//! `--summary` 时用 `tabled` 打印变换前后的晶格参数。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/structure.rs`

use crate::models::Lattice;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
struct LatticeRow {
    #[tabled(rename = "")]
    stage: &'static str,
    #[tabled(rename = "a (Å)")]
    a: String,
    #[tabled(rename = "b (Å)")]
    b: String,
    #[tabled(rename = "c (Å)")]
    c: String,
    #[tabled(rename = "α (°)")]
    alpha: String,
    #[tabled(rename = "β (°)")]
    beta: String,
    #[tabled(rename = "γ (°)")]
    gamma: String,
    #[tabled(rename = "V (Å³)")]
    volume: String,
}

impl LatticeRow {
    fn new(stage: &'static str, lattice: &Lattice) -> Self {
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();
        LatticeRow {
            stage,
            a: format!("{:.4}", a),
            b: format!("{:.4}", b),
            c: format!("{:.4}", c),
            alpha: format!("{:.3}", alpha),
            beta: format!("{:.3}", beta),
            gamma: format!("{:.3}", gamma),
            volume: format!("{:.4}", lattice.volume()),
        }
    }
}

/// 生成变换前后的对比表
pub fn lattice_table(before: &Lattice, after: &Lattice) -> String {
    let rows = [
        LatticeRow::new("before", before),
        LatticeRow::new("after", after),
    ];
    Table::new(rows).to_string()
}
