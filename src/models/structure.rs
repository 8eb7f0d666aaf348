//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示，由 `parsers/` 读写，由 `transform/` 变换。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`transform/`、`router` 使用
//! - 使用 `nalgebra` 表示晶格矩阵

use nalgebra::{Matrix3, RowVector3, Vector3};

/// 晶格
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// 晶格向量矩阵，行向量依次为 a, b, c
    pub matrix: Matrix3<f64>,
}

impl Lattice {
    /// 从三个行向量创建
    pub fn from_vectors(rows: [[f64; 3]; 3]) -> Self {
        Lattice {
            matrix: Matrix3::from_rows(&[
                RowVector3::from(rows[0]),
                RowVector3::from(rows[1]),
                RowVector3::from(rows[2]),
            ]),
        }
    }

    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度；a 沿 x 轴，b 位于 xy 平面
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let (cos_a, cos_b) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (sin_g, cos_g) = gamma.to_radians().sin_cos();

        let c1 = c * cos_b;
        let c2 = c * (cos_a - cos_b * cos_g) / sin_g;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();

        Lattice::from_vectors([
            [a, 0.0, 0.0],
            [b * cos_g, b * sin_g, 0.0],
            [c1, c2, c3],
        ])
    }

    /// 第 i 个晶格向量（0 = a, 1 = b, 2 = c）
    pub fn vector(&self, i: usize) -> Vector3<f64> {
        self.matrix.row(i).transpose()
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)，角度单位为度
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let (va, vb, vc) = (self.vector(0), self.vector(1), self.vector(2));
        let (a, b, c) = (va.norm(), vb.norm(), vc.norm());

        let alpha = vb.angle(&vc).to_degrees();
        let beta = va.angle(&vc).to_degrees();
        let gamma = va.angle(&vb).to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 有符号体积（左手系为负）
    pub fn volume(&self) -> f64 {
        self.matrix.determinant()
    }

    /// 笛卡尔坐标转分数坐标；奇异晶格返回 None
    pub fn to_fractional(&self, cart: [f64; 3]) -> Option<[f64; 3]> {
        let inv = self.matrix.transpose().try_inverse()?;
        let frac = inv * Vector3::from(cart);
        Some([frac.x, frac.y, frac.z])
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 原子标签（如 CELL 中的 `Fe:1`）
    pub label: Option<String>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 晶体结构
#[derive(Debug, Clone, PartialEq)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,

    /// 来源文件格式
    pub source_format: Option<String>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
            source_format: None,
        }
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_from_parameters_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
        assert!((lattice.volume() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_hexagonal() {
        let lattice = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0);
        let (a, b, c, _, _, gamma) = lattice.parameters();

        assert!((a - 3.0).abs() < 0.01);
        assert!((b - 3.0).abs() < 0.01);
        assert!((c - 5.0).abs() < 0.01);
        assert!((gamma - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_lattice_rows_are_vectors() {
        let lattice = Lattice::from_vectors([[1.0, 2.0, 3.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]]);
        assert_eq!(lattice.vector(0), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(lattice.vector(2), Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_to_fractional_oblique() {
        let lattice = Lattice::from_vectors([[2.0, 0.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 4.0]]);
        // 0.5 a + 0.25 b + 0.5 c = (1.25, 0.5, 2.0)
        let frac = lattice.to_fractional([1.25, 0.5, 2.0]).unwrap();

        for (got, want) in frac.iter().zip([0.5, 0.25, 0.5]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_singular_lattice_has_no_fractional() {
        let lattice = Lattice::from_vectors([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(lattice.to_fractional([0.5, 0.5, 0.5]).is_none());
    }

    #[test]
    fn test_crystal_formula() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let atoms = vec![
            Atom::new("Na", [0.0, 0.0, 0.0]),
            Atom::new("Na", [0.5, 0.5, 0.0]),
            Atom::new("Cl", [0.5, 0.0, 0.0]),
        ];
        let crystal = Crystal::new("NaCl", lattice, atoms);

        assert_eq!(crystal.formula(), "ClNa2");
    }
}
