pub mod asset;
pub mod campaign;
pub mod customer;
pub mod insights;
pub mod lead;

use serde::Serialize;
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::apply_table_style;
use crate::db::{Entity, RecordId, Repository};

/// Render records as a styled table, or as pretty JSON when `format` is `json`
pub(crate) fn render_list<T, D, F>(
    items: &[T],
    format: &str,
    empty: &str,
    display: F,
) -> CliResult<String>
where
    T: Serialize,
    D: Tabled,
    F: Fn(&T) -> D,
{
    match format {
        "json" => Ok(serde_json::to_string_pretty(items)?),
        _ => {
            if items.is_empty() {
                return Ok(empty.to_string());
            }
            let mut table = Table::new(items.iter().map(display));
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Render one record as a Field/Value table, or as pretty JSON
pub(crate) fn render_fields<T: Serialize>(
    record: &T,
    format: &str,
    fields: &[(&str, String)],
) -> CliResult<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(record)?),
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (name, value) in fields {
                builder.push_record([*name, value.as_str()]);
            }
            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Overlay one optional field on a stored draft: `clear` empties it, a
/// given value replaces it, neither keeps it
pub(crate) fn overlay<T>(slot: &mut Option<T>, value: Option<T>, clear: bool) {
    if clear {
        *slot = None;
    } else if value.is_some() {
        *slot = value;
    }
}

/// Delete one row (requires --force flag for safety)
pub(crate) async fn delete_record<E, R>(repo: &R, id: RecordId, force: bool) -> CliResult<String>
where
    E: Entity,
    R: Repository<E>,
{
    if !force {
        return Err(CliError::InvalidInput {
            message: "Delete operation requires --force flag. This action is destructive and cannot be undone.".to_string(),
        });
    }

    match repo.delete(id).await? {
        0 => Ok(format!("No {} with id {}", E::ENTITY_TYPE, id)),
        _ => Ok(format!("✓ Deleted {}: {}", E::ENTITY_TYPE, id)),
    }
}
