//! DML template rendering
//!
//! A DML migration is a SQL file with optional `@key@` placeholders. Values
//! come from a sibling JSON file (`<name>.json` in place of `<name>.sql`)
//! holding a flat string-to-string object. The rendered text is split into
//! single statements on `;`.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Placeholder values for one DML migration.
pub type TemplateData = BTreeMap<String, String>;

/// Path of the optional data file belonging to a DML migration file.
pub fn data_file_path(migration_path: &Path) -> PathBuf {
    let name = migration_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = name.strip_suffix(".sql").unwrap_or(&name);
    migration_path.with_file_name(format!("{}.json", base))
}

/// Load the data file at `path`, or an empty map when it does not exist.
pub fn load_data(path: &Path) -> CoreResult<TemplateData> {
    if !path.exists() {
        log::debug!("No migration data file {}", path.display());
        return Ok(TemplateData::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| CoreError::DataFileUnreadable {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| CoreError::DataFileInvalid {
        path: path.display().to_string(),
        source,
    })
}

/// Replace every `@key@` in `template` with its value from `data`.
///
/// Placeholders without a matching key are left untouched.
pub fn render(template: &str, data: &TemplateData) -> String {
    data.iter().fold(template.to_string(), |sql, (key, value)| {
        sql.replace(&format!("@{}@", key), value)
    })
}

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn normalize_whitespace(fragment: &str) -> String {
    fragment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split rendered SQL into normalized statements, each ending in `;`.
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(normalize_whitespace)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{};", stmt))
        .collect()
}

/// Read, render and split the DML migration `name` in `dir`.
pub fn render_migration(dir: &Path, name: &str) -> CoreResult<Vec<String>> {
    let path = dir.join(name);
    let template =
        std::fs::read_to_string(&path).map_err(|source| CoreError::TemplateUnreadable {
            path: path.display().to_string(),
            source,
        })?;

    let data = load_data(&data_file_path(&path))?;
    let statements = split_statements(&render(&template, &data));
    for stmt in &statements {
        log::debug!("-> Created statement from SQL '{}'", stmt);
    }
    Ok(statements)
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
