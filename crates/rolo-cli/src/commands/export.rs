use std::path::Path;

use rolo_core::vault::{VaultExportSummary, VaultExporter};

use crate::commands::common::Context;
use crate::error::CliError;

pub fn export_vault(ctx: &Context, vault: Option<&Path>) -> Result<VaultExportSummary, CliError> {
    let vault_root = ctx
        .config
        .resolve_vault_root(vault)
        .ok_or_else(|| CliError::VaultNotConfigured(ctx.config_path.display().to_string()))?;

    let contacts = ctx.store().load_contacts()?;
    let exporter = VaultExporter::new(&vault_root);
    tracing::info!(
        "Exporting {} contacts to {}",
        contacts.len(),
        exporter.contacts_dir().display()
    );
    Ok(exporter.export(&contacts)?)
}

pub fn run_export_vault(ctx: &Context, vault: Option<&Path>) -> Result<(), CliError> {
    let summary = export_vault(ctx, vault)?;
    println!(
        "Wrote {} notes ({} up to date, {} without id)",
        summary.written, summary.up_to_date, summary.without_id
    );
    Ok(())
}
