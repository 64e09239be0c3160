use anyhow::{Context, Result};
use tracing::info;

use admin_client::config::Config;
use admin_client::logging::init_logging;
use admin_client::render::render_tree;
use admin_client::HttpRoleService;
use domain::services::RoleEditor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);

    info!("Starting role-permissions v{}", env!("CARGO_PKG_VERSION"));

    let role_id = std::env::args()
        .nth(1)
        .map(|arg| {
            arg.parse::<i64>()
                .with_context(|| format!("Invalid role id '{}'", arg))
        })
        .transpose()?;

    let service = HttpRoleService::new(&config.api)?;
    let editor = RoleEditor::load(&service, role_id)
        .await
        .context("Failed to load permissions")?;

    match role_id {
        Some(id) => info!(role_id = id, name = %editor.form.name, "Loaded role"),
        None => info!("No role id given, showing an empty selection"),
    }

    print!("{}", render_tree(&editor.permissions));
    Ok(())
}
