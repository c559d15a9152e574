//! Customer CLI commands

use clap::Args;
use tabled::Tabled;

use crate::cli::commands::{delete_record, overlay, render_fields, render_list};
use crate::cli::error::CliResult;
use crate::cli::utils::{format_text, truncate_with_ellipsis};
use crate::db::{Customer, CustomerDraft, Database, RecordId, Repository};

#[derive(Tabled)]
pub(crate) struct CustomerDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: RecordId,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Email")]
    pub(crate) email: String,
    #[tabled(rename = "Demographics")]
    pub(crate) demographics: String,
    #[tabled(rename = "Source")]
    pub(crate) acquisition_source: String,
}

impl From<&Customer> for CustomerDisplay {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: truncate_with_ellipsis(&customer.name, 30),
            email: customer.email.clone(),
            demographics: format_text(customer.demographics.as_deref(), 30),
            acquisition_source: format_text(customer.acquisition_source.as_deref(), 20),
        }
    }
}

/// Arguments of `customer create`
#[derive(Debug, Args)]
pub struct NewCustomer {
    #[arg(long)]
    pub name: String,
    /// Must not belong to another customer
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub demographics: Option<String>,
    /// Channel the customer was acquired through
    #[arg(long = "source")]
    pub acquisition_source: Option<String>,
}

impl From<NewCustomer> for CustomerDraft {
    fn from(args: NewCustomer) -> Self {
        Self {
            name: args.name,
            email: args.email,
            demographics: args.demographics,
            acquisition_source: args.acquisition_source,
        }
    }
}

/// Arguments of `customer update`; fields left out keep their stored value
#[derive(Debug, Default, Args)]
pub struct CustomerChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub demographics: Option<String>,
    #[arg(long = "source")]
    pub acquisition_source: Option<String>,
    #[arg(long, conflicts_with = "demographics")]
    pub clear_demographics: bool,
    #[arg(long, conflicts_with = "acquisition_source")]
    pub clear_source: bool,
}

impl CustomerChanges {
    pub fn apply(self, draft: &mut CustomerDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        overlay(&mut draft.demographics, self.demographics, self.clear_demographics);
        overlay(
            &mut draft.acquisition_source,
            self.acquisition_source,
            self.clear_source,
        );
    }
}

pub async fn list_customers<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let customers = db.customers().read_all().await?;
    render_list(&customers, format, "No customers found.", |c| {
        CustomerDisplay::from(c)
    })
}

pub async fn get_customer<D: Database>(db: &D, id: RecordId, format: &str) -> CliResult<String> {
    let customer = db.customers().get(id).await?;
    render_fields(
        &customer,
        format,
        &[
            ("ID", customer.id.to_string()),
            ("Name", customer.name.clone()),
            ("Email", customer.email.clone()),
            ("Demographics", format_text(customer.demographics.as_deref(), 80)),
            ("Source", format_text(customer.acquisition_source.as_deref(), 80)),
        ],
    )
}

pub async fn create_customer<D: Database>(db: &D, draft: CustomerDraft) -> CliResult<String> {
    let customer = db.customers().create(&draft).await?;
    Ok(format!(
        "✓ Created customer: {} ({})",
        customer.name, customer.id
    ))
}

pub async fn update_customer<D: Database>(
    db: &D,
    id: RecordId,
    changes: CustomerChanges,
) -> CliResult<String> {
    let customer = db
        .customers()
        .modify(id, |current| {
            let mut draft = current.draft();
            changes.apply(&mut draft);
            draft
        })
        .await?;
    Ok(format!("✓ Updated customer: {} ({})", customer.name, id))
}

pub async fn delete_customer<D: Database>(db: &D, id: RecordId, force: bool) -> CliResult<String> {
    delete_record::<Customer, _>(&db.customers(), id, force).await
}
