//! Parsers for the `k=v,k=v` family of encodings.

use super::types::{ParsedListParams, ParsedParams, WorkspaceBinding};
use crate::error::{Result, StageTimeError};

const ENTRY_SEPARATOR: char = ',';
const KEY_SEPARATOR: char = '=';
const VALUE_SEPARATOR: char = ';';

/// Number of `;`-separated fields after a workspace name: kind, short name, reference.
const WORKSPACE_FIELDS: usize = 3;

/// Parse a scalar parameter encoding such as `revision=main, debug=true`.
///
/// Keys and values are trimmed. A repeated key keeps the last value.
///
/// # Errors
///
/// `MalformedEncoding` if an entry has no `=` or an empty key.
pub fn parse_scalar_params(raw: &str) -> Result<ParsedParams> {
    let mut params = ParsedParams::new();

    for entry in entries(raw) {
        let (key, value) = split_key(entry, "params")?;
        params.insert(key, value.trim().to_string());
    }

    Ok(params)
}

/// Parse a list parameter encoding such as `targets=linux;darwin,tags=v1`.
///
/// Keys are trimmed; the remainder is trimmed as a whole and split on `;`.
/// Individual values are kept as written.
///
/// # Errors
///
/// `MalformedEncoding` if an entry has no `=` or an empty key.
pub fn parse_list_params(raw: &str) -> Result<ParsedListParams> {
    let mut params = ParsedListParams::new();

    for entry in entries(raw) {
        let (key, rest) = split_key(entry, "listparams")?;
        let values = rest
            .trim()
            .split(VALUE_SEPARATOR)
            .map(str::to_string)
            .collect();
        params.insert(key, values);
    }

    Ok(params)
}

/// Parse a workspace encoding such as `source=persistentVolumeClaim;claimName;git-pvc`.
///
/// All four fields are trimmed. Bindings keep their encoding order.
///
/// # Errors
///
/// `MalformedEncoding` if an entry has no `=`, an empty name, or anything
/// other than exactly three `;`-separated fields after the name.
pub fn parse_workspaces(raw: &str) -> Result<Vec<WorkspaceBinding>> {
    let mut workspaces = Vec::new();

    for entry in entries(raw) {
        let (name, rest) = split_key(entry, "workspaces")?;
        let fields: Vec<&str> = rest.split(VALUE_SEPARATOR).map(str::trim).collect();

        let [kind, short_name, reference] = fields.as_slice() else {
            return Err(StageTimeError::MalformedEncoding {
                field: "workspaces",
                entry: entry.to_string(),
                reason: format!(
                    "expected {} ';'-separated fields (kind;short-name;reference), found {}",
                    WORKSPACE_FIELDS,
                    fields.len()
                ),
            });
        };

        workspaces.push(WorkspaceBinding::new(name, *kind, *short_name, *reference));
    }

    Ok(workspaces)
}

/// Split a raw encoding into entries, treating blank input as no entries.
///
/// A dangling `,` still yields an empty entry, which is then rejected.
fn entries(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(ENTRY_SEPARATOR).collect()
}

/// Split an entry on its first `=`, returning the trimmed key and the raw remainder.
fn split_key<'a>(entry: &'a str, field: &'static str) -> Result<(String, &'a str)> {
    let Some((key, rest)) = entry.split_once(KEY_SEPARATOR) else {
        return Err(StageTimeError::MalformedEncoding {
            field,
            entry: entry.to_string(),
            reason: "missing '=' between key and value".to_string(),
        });
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(StageTimeError::MalformedEncoding {
            field,
            entry: entry.to_string(),
            reason: "empty key".to_string(),
        });
    }

    Ok((key.to_string(), rest))
}
