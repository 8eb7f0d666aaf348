//! # CASTEP .cell 格式读写
//!
//! ## .cell 格式说明
//! ```text
//! %BLOCK LATTICE_CART
//! ang
//! a1 a2 a3
//! b1 b2 b3
//! c1 c2 c3
//! %ENDBLOCK LATTICE_CART
//!
//! %BLOCK POSITIONS_FRAC
//! Element x y z
//! ...
//! %ENDBLOCK POSITIONS_FRAC
//! ```
//!
//! `LATTICE_ABC` 和 `POSITIONS_ABS` 也可读取；写出时统一使用 CART + FRAC。
//! 带标签的物种（如 `Fe:1`）读入时元素取冒号前部分，标签原样保留并写回。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{Result, XformError};
use crate::models::{Atom, Crystal, Lattice};
use std::fs;
use std::path::Path;

/// 解析 .cell 文件
pub fn parse_cell_file(path: &Path) -> Result<Crystal> {
    let content = fs::read_to_string(path).map_err(|e| XformError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    parse_cell_content(&content, name).map_err(|e| match e {
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
        format: "cell".to_string(),
        path: name.to_string(),
        reason: reason.into(),
    }
}

/// 取出 `%BLOCK name` 与 `%ENDBLOCK name` 之间的有效行（去掉空行和注释）
fn block_lines<'a>(lines: &[&'a str], block_name: &str) -> Option<Vec<&'a str>> {
    let start = lines.iter().position(|l| {
        let mut words = l.split_whitespace();
        matches!(words.next(), Some(w) if w.eq_ignore_ascii_case("%block"))
            && matches!(words.next(), Some(w) if w.eq_ignore_ascii_case(block_name))
    })?;

    let body = lines[start + 1..]
        .iter()
        .map(|l| l.trim())
        .take_while(|l| {
            !l.split_whitespace()
                .next()
                .map(|w| w.eq_ignore_ascii_case("%endblock"))
                .unwrap_or(false)
        })
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('!'))
        .collect();

    Some(body)
}

/// 单位行：ang / bohr / nm
fn unit_scale(line: &str) -> Option<f64> {
    match line.to_lowercase().as_str() {
        "ang" | "angstrom" => Some(1.0),
        "bohr" | "a0" => Some(0.529_177_210_9),
        "nm" => Some(10.0),
        _ => None,
    }
}

/// 把一个块的行拆成 (单位缩放, 数值行)
fn split_units<'a>(body: &[&'a str]) -> (f64, Vec<&'a str>) {
    match body.first().and_then(|l| unit_scale(l)) {
        Some(scale) => (scale, body[1..].to_vec()),
        None => (1.0, body.to_vec()),
    }
}

fn parse_floats(line: &str) -> Vec<f64> {
    line.split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// 从字符串内容解析 .cell 格式
pub fn parse_cell_content(content: &str, default_name: &str) -> Result<Crystal> {
    let lines: Vec<&str> = content.lines().collect();

    let lattice = if let Some(body) = block_lines(&lines, "LATTICE_CART") {
        let (scale, rows) = split_units(&body);
        if rows.len() < 3 {
            return Err(parse_error(default_name, "Incomplete LATTICE_CART block"));
        }
        let mut matrix = [[0.0; 3]; 3];
        for (i, row) in rows.iter().take(3).enumerate() {
            let v = parse_floats(row);
            if v.len() < 3 {
                return Err(parse_error(
                    default_name,
                    format!("Invalid LATTICE_CART row {}", i + 1),
                ));
            }
            matrix[i] = [v[0] * scale, v[1] * scale, v[2] * scale];
        }
        Lattice::from_vectors(matrix)
    } else if let Some(body) = block_lines(&lines, "LATTICE_ABC") {
        let (scale, rows) = split_units(&body);
        let params: Vec<f64> = rows.iter().flat_map(|l| parse_floats(l)).collect();
        if params.len() < 6 {
            return Err(parse_error(
                default_name,
                "Incomplete LATTICE_ABC block (need a b c alpha beta gamma)",
            ));
        }
        Lattice::from_parameters(
            params[0] * scale,
            params[1] * scale,
            params[2] * scale,
            params[3],
            params[4],
            params[5],
        )
    } else {
        return Err(parse_error(
            default_name,
            "Missing LATTICE_CART or LATTICE_ABC block",
        ));
    };

    let (body, absolute) = match block_lines(&lines, "POSITIONS_FRAC") {
        Some(body) => (body, false),
        None => match block_lines(&lines, "POSITIONS_ABS") {
            Some(body) => (body, true),
            None => (Vec::new(), false),
        },
    };
    let (scale, rows) = if absolute {
        split_units(&body)
    } else {
        (1.0, body)
    };

    let mut atoms = Vec::with_capacity(rows.len());
    for row in rows {
        let parts: Vec<&str> = row.split_whitespace().collect();
        let v: Vec<f64> = parts
            .iter()
            .skip(1)
            .take(3)
            .filter_map(|s| s.parse().ok())
            .collect();
        if v.len() < 3 {
            return Err(parse_error(default_name, format!("Invalid position line: '{}'", row)));
        }

        let position = if absolute {
            lattice
                .to_fractional([v[0] * scale, v[1] * scale, v[2] * scale])
                .ok_or_else(|| parse_error(default_name, "Singular lattice in POSITIONS_ABS"))?
        } else {
            [v[0], v[1], v[2]]
        };
        let atom = match parts[0].split_once(':') {
            Some((element, _)) => Atom::new(element, position).with_label(parts[0]),
            None => Atom::new(parts[0], position),
        };
        atoms.push(atom);
    }

    let mut crystal = Crystal::new(default_name, lattice, atoms);
    crystal.source_format = Some("cell".to_string());

    Ok(crystal)
}

/// 将 Crystal 转换为 .cell 格式字符串
pub fn to_cell_string(crystal: &Crystal) -> String {
    let mut result = String::new();

    result.push_str("%BLOCK LATTICE_CART\nang\n");
    for row in crystal.lattice.matrix.row_iter() {
        result.push_str(&format!(
            "{:16.10} {:16.10} {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }
    result.push_str("%ENDBLOCK LATTICE_CART\n\n");

    result.push_str("%BLOCK POSITIONS_FRAC\n");
    for atom in &crystal.atoms {
        result.push_str(&format!(
            "{:4} {:16.10} {:16.10} {:16.10}\n",
            atom.label.as_deref().unwrap_or(&atom.element),
            atom.position[0], atom.position[1], atom.position[2]
        ));
    }
    result.push_str("%ENDBLOCK POSITIONS_FRAC\n");

    result
}
