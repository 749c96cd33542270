//! `inventory` handler.

use envprobe_core::InventoryCategory;
use envprobe_runtime::EnvProbeService;
use serde_json::json;
use strum::IntoEnumIterator;

use super::to_json;
use crate::error::CliError;

/// Execute the inventory command.
pub async fn execute(
    service: &EnvProbeService,
    category: Option<&str>,
    list: bool,
    json: bool,
) -> Result<String, CliError> {
    let category = match category {
        Some(category) if !list => category,
        _ => return list_categories(json),
    };

    let report = service.inventory(category).await?;
    if json {
        return to_json(&json!({ "category": category, "report": report }));
    }
    Ok(report.trim_end().to_string())
}

fn list_categories(json: bool) -> Result<String, CliError> {
    let names: Vec<&'static str> = InventoryCategory::iter().map(InventoryCategory::as_str).collect();
    if json {
        return to_json(&names);
    }
    Ok(names.join("\n"))
}
