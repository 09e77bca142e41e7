// SPDX-FileCopyrightText: 2026 Trellis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing commands: `roots`, `modules`, `objects`, `classes`.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use trellis_core::{Plugin, SearchPath, TrellisError};
use trellis_plugin::{ClassLoader, ModuleLoader, Object, ObjectLoader, TypeRef};

/// How results are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub color: bool,
}

#[derive(Debug, Serialize)]
pub struct ModuleRow {
    pub name: String,
    pub origin: String,
    pub priority: f64,
}

#[derive(Debug, Serialize)]
pub struct ObjectRow {
    pub name: String,
    pub kind: &'static str,
    pub priority: f64,
}

#[derive(Debug, Serialize)]
pub struct ClassRow {
    pub name: String,
    pub bases: Vec<String>,
    pub priority: f64,
}

pub fn roots(
    out: &mut impl Write,
    search_path: &SearchPath,
    output: Output,
) -> Result<(), TrellisError> {
    if output.json {
        return write_json(out, search_path);
    }
    if search_path.is_empty() {
        return write_line(out, "(no search roots; set TRELLIS_PATH or search.roots)");
    }
    for (i, root) in search_path.iter().enumerate() {
        let marker = if root.is_dir() { "" } else { "  (missing)" };
        write_line(out, &format!("{i:>3}  {}{marker}", root.display()))?;
    }
    Ok(())
}

pub fn modules(
    out: &mut impl Write,
    loader: &ModuleLoader,
    namespace: &str,
    output: Output,
) -> Result<(), TrellisError> {
    let rows: Vec<ModuleRow> = loader
        .load(namespace)?
        .iter()
        .map(|m| ModuleRow {
            name: m.name().to_string(),
            origin: m.origin().display().to_string(),
            priority: m.priority(),
        })
        .collect();

    if output.json {
        return write_json(out, &rows);
    }
    write_table(out, &rows, output, |row| {
        (row.name.clone(), row.priority, row.origin.clone())
    })
}

pub fn objects(
    out: &mut impl Write,
    loader: ModuleLoader,
    namespace: &str,
    output: Output,
) -> Result<(), TrellisError> {
    let rows: Vec<ObjectRow> = ObjectLoader::new(loader)
        .load(namespace)?
        .iter()
        .map(|o| ObjectRow {
            name: o.qualified_name().to_string(),
            kind: match o {
                Object::Type(_) => "type",
                Object::Value(_) => "value",
            },
            priority: o.priority(),
        })
        .collect();

    if output.json {
        return write_json(out, &rows);
    }
    write_table(out, &rows, output, |row| {
        (row.name.clone(), row.priority, row.kind.to_string())
    })
}

pub fn classes(
    out: &mut impl Write,
    loader: ModuleLoader,
    namespace: &str,
    base: Option<&TypeRef>,
    output: Output,
) -> Result<(), TrellisError> {
    let rows: Vec<ClassRow> = ClassLoader::new(ObjectLoader::new(loader))
        .load(namespace, base)?
        .iter()
        .map(|t| ClassRow {
            name: t.qualified_name().to_string(),
            bases: t.bases().iter().map(|b| b.qualified_name().to_string()).collect(),
            priority: t.priority(),
        })
        .collect();

    if output.json {
        return write_json(out, &rows);
    }
    write_table(out, &rows, output, |row| {
        let detail = if row.bases.is_empty() {
            String::new()
        } else {
            format!("({})", row.bases.join(", "))
        };
        (row.name.clone(), row.priority, detail)
    })
}

/// One line per row: name, priority, detail.
fn write_table<R>(
    out: &mut impl Write,
    rows: &[R],
    output: Output,
    columns: impl Fn(&R) -> (String, f64, String),
) -> Result<(), TrellisError> {
    if rows.is_empty() {
        return write_line(out, "(nothing loaded)");
    }
    let lines: Vec<(String, f64, String)> = rows.iter().map(columns).collect();
    let width = lines.iter().map(|(name, ..)| name.len()).max().unwrap_or(0);

    for (name, priority, detail) in lines {
        let padded = format!("{name:<width$}");
        let name = if output.color {
            padded.bold().to_string()
        } else {
            padded
        };
        let detail = if output.color {
            detail.dimmed().to_string()
        } else {
            detail
        };
        write_line(out, format!("{name}  {priority:>6}  {detail}").trim_end())?;
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), TrellisError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TrellisError::Internal(format!("failed to serialize output: {e}")))?;
    write_line(out, &json)
}

fn write_line(out: &mut impl Write, line: &str) -> Result<(), TrellisError> {
    writeln!(out, "{line}")
        .map_err(|e| TrellisError::Internal(format!("failed to write output: {e}")))
}
