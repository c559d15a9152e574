//! Marketing asset CLI commands

use clap::Args;
use tabled::Tabled;

use crate::cli::commands::{delete_record, overlay, render_fields, render_list};
use crate::cli::error::CliResult;
use crate::cli::utils::format_text;
use crate::db::{Asset, AssetDraft, Database, RecordId, Repository};

#[derive(Tabled)]
pub(crate) struct AssetDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: RecordId,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Type")]
    pub(crate) file_type: String,
    #[tabled(rename = "Path")]
    pub(crate) file_path: String,
    #[tabled(rename = "Description")]
    pub(crate) description: String,
}

impl From<&Asset> for AssetDisplay {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            name: format_text(asset.name.as_deref(), 30),
            file_type: format_text(asset.file_type.as_deref(), 10),
            file_path: format_text(asset.file_path.as_deref(), 40),
            description: format_text(asset.description.as_deref(), 40),
        }
    }
}

/// Fields of an asset
#[derive(Debug, Default, Args)]
pub struct AssetFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// File format, e.g. png, pdf, mp4
    #[arg(long = "type")]
    pub file_type: Option<String>,
    /// Where the file lives; stored as given
    #[arg(long = "path")]
    pub file_path: Option<String>,
}

impl From<AssetFields> for AssetDraft {
    fn from(fields: AssetFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            file_type: fields.file_type,
            file_path: fields.file_path,
        }
    }
}

/// Arguments of `asset update`; fields left out keep their stored value
#[derive(Debug, Default, Args)]
pub struct AssetChanges {
    #[command(flatten)]
    pub fields: AssetFields,
    #[arg(long, conflicts_with = "name")]
    pub clear_name: bool,
    #[arg(long, conflicts_with = "description")]
    pub clear_description: bool,
    #[arg(long, conflicts_with = "file_type")]
    pub clear_type: bool,
    #[arg(long, conflicts_with = "file_path")]
    pub clear_path: bool,
}

impl From<AssetFields> for AssetChanges {
    fn from(fields: AssetFields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }
}

impl AssetChanges {
    pub fn apply(self, draft: &mut AssetDraft) {
        let fields = self.fields;
        overlay(&mut draft.name, fields.name, self.clear_name);
        overlay(&mut draft.description, fields.description, self.clear_description);
        overlay(&mut draft.file_type, fields.file_type, self.clear_type);
        overlay(&mut draft.file_path, fields.file_path, self.clear_path);
    }
}

pub async fn list_assets<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let assets = db.assets().read_all().await?;
    render_list(&assets, format, "No assets found.", |a| AssetDisplay::from(a))
}

pub async fn get_asset<D: Database>(db: &D, id: RecordId, format: &str) -> CliResult<String> {
    let asset = db.assets().get(id).await?;
    render_fields(
        &asset,
        format,
        &[
            ("ID", asset.id.to_string()),
            ("Name", format_text(asset.name.as_deref(), 80)),
            ("Type", format_text(asset.file_type.as_deref(), 80)),
            ("Path", format_text(asset.file_path.as_deref(), 80)),
            ("Description", format_text(asset.description.as_deref(), 80)),
        ],
    )
}

pub async fn create_asset<D: Database>(db: &D, draft: AssetDraft) -> CliResult<String> {
    let asset = db.assets().create(&draft).await?;
    Ok(format!(
        "✓ Created asset: {} ({})",
        asset.name.as_deref().unwrap_or("unnamed"),
        asset.id
    ))
}

pub async fn update_asset<D: Database>(
    db: &D,
    id: RecordId,
    changes: AssetChanges,
) -> CliResult<String> {
    db.assets()
        .modify(id, |current| {
            let mut draft = current.draft();
            changes.apply(&mut draft);
            draft
        })
        .await?;
    Ok(format!("✓ Updated asset: {}", id))
}

pub async fn delete_asset<D: Database>(db: &D, id: RecordId, force: bool) -> CliResult<String> {
    delete_record::<Asset, _>(&db.assets(), id, force).await
}
