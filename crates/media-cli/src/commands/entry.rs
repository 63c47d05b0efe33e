//! Entry command handlers
//!
//! Each handler issues one request through [`ApiClient`] and prints the
//! response in the selected output format.

use anyhow::{bail, Context, Result};

use media_core::{Entry, NewEntry};

use crate::client::ApiClient;
use crate::output::{short_id, Output};
use crate::prompt::confirm;

/// Category name that lists the whole catalog
pub const ALL_CATEGORIES: &str = "All";

/// List entries, optionally limited to one category
pub async fn list(client: &ApiClient, category: Option<String>, output: &Output) -> Result<()> {
    let entries = fetch_entries(client, category.as_deref()).await?;
    output.print_entries(&entries);
    Ok(())
}

/// Entries in `category`; no category or "All" means the whole catalog
async fn fetch_entries(client: &ApiClient, category: Option<&str>) -> Result<Vec<Entry>> {
    match category {
        Some(c) if !c.eq_ignore_ascii_case(ALL_CATEGORIES) => client.list_by_category(c).await,
        _ => client.list_all().await,
    }
}

/// Look up the first entry with the given name
pub async fn search(client: &ApiClient, name: String, output: &Output) -> Result<()> {
    match client.search_by_name(&name).await? {
        Some(entry) => output.print_entry(&entry),
        None => output.not_found(&format!("name '{}'", name)),
    }
    Ok(())
}

/// Show a single entry
pub async fn show(client: &ApiClient, id: String, output: &Output) -> Result<()> {
    match client.get_by_id(&id).await? {
        Some(entry) => output.print_entry(&entry),
        None => output.not_found(&format!("id {}", id)),
    }
    Ok(())
}

/// Create a new entry
pub async fn add(client: &ApiClient, new: NewEntry, output: &Output) -> Result<()> {
    let missing = new.missing_fields();
    if !missing.is_empty() {
        bail!("Missing required fields: {}", missing.join(", "));
    }

    let entry = client
        .create(&new)
        .await
        .context("Failed to create entry")?
        .ok_or_else(|| anyhow::anyhow!("Server refused the entry"))?;

    output.success(&format!("Created entry: {}", entry.id));
    output.print_entry(&entry);

    Ok(())
}

/// Delete an entry
pub async fn delete(client: &ApiClient, id: String, yes: bool, output: &Output) -> Result<()> {
    let entry = client
        .get_by_id(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;

    if !yes && output.should_prompt() {
        println!("Delete entry: {} - {}", short_id(&entry.id), entry.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !client.delete(&id).await.context("Failed to delete entry")? {
        bail!("Entry not found: {}", id);
    }

    output.success(&format!("Deleted entry: {}", id));

    Ok(())
}
