//! # VASP POSCAR 格式读写
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor (负数表示目标体积)
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{XformError, Result};
use crate::models::{Atom, Crystal, Lattice};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Crystal> {
    let content = fs::read_to_string(path).map_err(|e| XformError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let default_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    parse_poscar_content(&content, default_name).map_err(|e| match e {
        XformError::ParseError { format, reason, .. } => XformError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

fn parse_error(name: &str, reason: impl Into<String>) -> XformError {
    XformError::ParseError {
        format: "poscar".to_string(),
        path: name.to_string(),
        reason: reason.into(),
    }
}

/// 读取一行中的前三个浮点数
fn parse_triple(line: &str) -> Option<[f64; 3]> {
    let mut values = line.split_whitespace().map(|s| s.parse::<f64>());
    match (values.next(), values.next(), values.next()) {
        (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => Some([x, y, z]),
        _ => None,
    }
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Crystal> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 8 {
        return Err(parse_error(default_name, "File too short"));
    }

    let name = match lines[0].trim() {
        "" => default_name.to_string(),
        comment => comment.to_string(),
    };

    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error(&name, "Invalid scaling factor at line 2"))?;

    let mut rows = [[0.0; 3]; 3];
    for (i, row) in rows.iter_mut().enumerate() {
        *row = parse_triple(lines[2 + i]).ok_or_else(|| {
            parse_error(&name, format!("Invalid lattice vector at line {}", 3 + i))
        })?;
    }
    let mut lattice = Lattice::from_vectors(rows);

    // 负缩放因子表示目标晶胞体积
    let factor = if scale < 0.0 {
        let volume = lattice.volume().abs();
        if volume < 1e-12 {
            return Err(parse_error(&name, "Cannot rescale a singular lattice to a volume"));
        }
        (scale.abs() / volume).cbrt()
    } else {
        scale
    };
    lattice.matrix *= factor;

    // VASP 4 没有元素行，直接是原子数
    let species_line: Vec<&str> = lines[5].split_whitespace().collect();
    let is_vasp4 = species_line
        .first()
        .map(|s| s.parse::<usize>().is_ok())
        .unwrap_or(false);

    let (elements, count_line, mut cursor) = if is_vasp4 {
        (Vec::new(), lines[5], 6)
    } else {
        let elements: Vec<String> = species_line.iter().map(|s| s.to_string()).collect();
        (elements, lines[6], 7)
    };

    let counts: Vec<usize> = count_line
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| parse_error(&name, "Invalid atom count line"))?;

    let elements = if is_vasp4 {
        (1..=counts.len()).map(|i| format!("X{}", i)).collect()
    } else if elements.len() == counts.len() {
        elements
    } else {
        return Err(parse_error(
            &name,
            format!(
                "{} element symbols but {} atom counts",
                elements.len(),
                counts.len()
            ),
        ));
    };

    if lines
        .get(cursor)
        .map(|l| l.trim().to_lowercase().starts_with('s'))
        .unwrap_or(false)
    {
        cursor += 1;
    }

    let coord_type = lines
        .get(cursor)
        .map(|l| l.trim().to_lowercase())
        .ok_or_else(|| parse_error(&name, "Missing coordinate type line"))?;
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');
    cursor += 1;

    let total: usize = counts.iter().sum();
    let mut atoms: Vec<Atom> = Vec::with_capacity(total);

    let species = elements
        .iter()
        .zip(counts.iter())
        .flat_map(|(elem, &n)| std::iter::repeat(elem).take(n));

    for (offset, elem) in species.enumerate() {
        let line_no = cursor + offset;
        let triple = lines
            .get(line_no)
            .and_then(|l| parse_triple(l))
            .ok_or_else(|| {
                parse_error(
                    &name,
                    format!("Expected {} positions, bad or missing line {}", total, line_no + 1),
                )
            })?;

        let position = if is_cartesian {
            let cart = triple.map(|v| v * factor);
            lattice
                .to_fractional(cart)
                .ok_or_else(|| parse_error(&name, "Singular lattice, cannot convert Cartesian positions"))?
        } else {
            triple
        };
        atoms.push(Atom::new(elem.clone(), position));
    }

    let mut crystal = Crystal::new(name, lattice, atoms);
    crystal.source_format = Some("poscar".to_string());

    Ok(crystal)
}

/// 将 Crystal 转换为 POSCAR 格式字符串
///
/// 元素按首次出现的顺序分组，坐标统一写为 Direct。
///
/// 注意：
/// - 没有原子的结构会得到空的元素行和计数行，本程序可以读回（0 个原子），但 VASP 不接受
/// - VASP 4 输入没有元素行，读入时使用占位符 `X1`、`X2`...，写出时这些占位符会作为元素符号写入
pub fn to_poscar_string(crystal: &Crystal) -> String {
    let mut species: Vec<(&str, Vec<[f64; 3]>)> = Vec::new();

    for atom in &crystal.atoms {
        match species.iter_mut().find(|(el, _)| *el == atom.element) {
            Some((_, positions)) => positions.push(atom.position),
            None => species.push((atom.element.as_str(), vec![atom.position])),
        }
    }

    let mut result = String::new();
    result.push_str(&format!("{}\n", crystal.name));
    result.push_str("1.0\n");

    for row in crystal.lattice.matrix.row_iter() {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    let symbols: Vec<&str> = species.iter().map(|(el, _)| *el).collect();
    let counts: Vec<String> = species.iter().map(|(_, p)| p.len().to_string()).collect();
    result.push_str(&format!("   {}\n", symbols.join("   ")));
    result.push_str(&format!("   {}\n", counts.join("   ")));
    result.push_str("Direct\n");

    for pos in species.iter().flat_map(|(_, p)| p.iter()) {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            pos[0], pos[1], pos[2]
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const NACL: &str = r#"NaCl
1.0
5.64 0.0 0.0
0.0 5.64 0.0
0.0 0.0 5.64
Na Cl
4 4
Direct
0.0 0.0 0.0
0.5 0.5 0.0
0.5 0.0 0.5
0.0 0.5 0.5
0.5 0.0 0.0
0.0 0.5 0.0
0.0 0.0 0.5
0.5 0.5 0.5
"#;

    #[test]
    fn test_parse_poscar_vasp5() {
        let crystal = parse_poscar_content(NACL, "fallback").unwrap();
        assert_eq!(crystal.name, "NaCl");
        assert_eq!(crystal.atoms.len(), 8);

        let na_count = crystal.atoms.iter().filter(|a| a.element == "Na").count();
        let cl_count = crystal.atoms.iter().filter(|a| a.element == "Cl").count();
        assert_eq!(na_count, 4);
        assert_eq!(cl_count, 4);
    }

    #[test]
    fn test_parse_poscar_with_scale() {
        let content = r#"Si
2.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Si
2
Direct
0.0 0.0 0.0
0.5 0.5 0.5
"#;
        let crystal = parse_poscar_content(content, "Si").unwrap();
        let (a, _, _, _, _, _) = crystal.lattice.parameters();
        assert!((a - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_poscar_negative_scale_is_volume() {
        let content = r#"Cu
-27.0
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
Cu
1
Direct
0.0 0.0 0.0
"#;
        let crystal = parse_poscar_content(content, "Cu").unwrap();
        assert!((crystal.lattice.volume() - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_poscar_vasp4_and_cartesian() {
        let content = r#"old style
1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
1 1
Cartesian
0.0 0.0 0.0
2.0 2.0 2.0
"#;
        let crystal = parse_poscar_content(content, "old").unwrap();
        assert_eq!(crystal.atoms[0].element, "X1");
        assert_eq!(crystal.atoms[1].element, "X2");
        for v in crystal.atoms[1].position {
            assert!((v - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_parse_poscar_selective_dynamics() {
        let content = r#"Fe with selective
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Selective dynamics
Direct
0.0 0.0 0.0 T T T
0.5 0.5 0.5 F F F
"#;
        let crystal = parse_poscar_content(content, "Fe").unwrap();
        assert_eq!(crystal.atoms.len(), 2);
        assert_eq!(crystal.atoms[1].position, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_parse_poscar_missing_positions() {
        let truncated = NACL.lines().take(12).collect::<Vec<_>>().join("\n");
        let err = parse_poscar_content(&truncated, "NaCl").unwrap_err();
        assert!(matches!(err, XformError::ParseError { .. }));
    }

    #[test]
    fn test_parse_poscar_bad_lattice_line() {
        let broken = NACL.replacen("0.0 5.64 0.0", "0.0 abc 0.0", 1);
        let err = parse_poscar_content(&broken, "NaCl").unwrap_err();
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_poscar_writer_groups_species_in_order() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let atoms = vec![
            Atom::new("Ti", [0.0, 0.0, 0.0]),
            Atom::new("O", [0.5, 0.5, 0.0]),
            Atom::new("Ti", [0.5, 0.5, 0.5]),
        ];
        let crystal = Crystal::new("TiO2", lattice, atoms);

        let text = to_poscar_string(&crystal);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), ["Ti", "O"]);
        assert_eq!(lines[6].split_whitespace().collect::<Vec<_>>(), ["2", "1"]);

        let parsed = parse_poscar_content(&text, "TiO2").unwrap();
        assert_eq!(parsed.atoms[1].element, "Ti");
        assert_eq!(parsed.atoms[1].position, [0.5, 0.5, 0.5]);
        assert_eq!(parsed.lattice, crystal.lattice);
    }

    #[test]
    fn test_poscar_writer_vasp4_placeholders_and_empty() {
        let old = "old style\n1.0\n4 0 0\n0 4 0\n0 0 4\n1 1\nDirect\n0 0 0\n0.5 0.5 0.5\n";
        let text = to_poscar_string(&parse_poscar_content(old, "old").unwrap());
        let symbols = text.lines().nth(5).unwrap();
        assert_eq!(symbols.split_whitespace().collect::<Vec<_>>(), ["X1", "X2"]);

        let lattice = Lattice::from_vectors([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let empty = to_poscar_string(&Crystal::new("empty", lattice, Vec::new()));
        assert!(empty.lines().nth(5).unwrap().trim().is_empty());
        assert!(empty.lines().nth(6).unwrap().trim().is_empty());
    }
}
