//! Reqx - Headless entry point
//!
//! Loads the persisted saved requests and variables, rebuilds the sidebar
//! tree and runs one command against them:
//!
//! - `reqx tree` prints the folder/request tree (default)
//! - `reqx resolve <text> [request-id]` resolves `${name}` placeholders
//! - `reqx migrate` rewrites the stored blobs in the current shape

use reqx_application::{
    LoadSavedRequests, LoadVariables, ResolutionContext, SaveSavedRequests, SaveVariables, Sidebar,
    VariableResolver,
};
use reqx_domain::{HttpMethod, NodeKind};
use reqx_infrastructure::{FileKeyValueStorage, StorageConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = StorageConfig::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        "Starting reqx v{}",
        env!("CARGO_PKG_VERSION")
    );
    let storage = FileKeyValueStorage::new(config);

    let snapshot = LoadSavedRequests::new(&storage).execute().await?;
    let variables = LoadVariables::new(&storage).execute().await?;
    let mut sidebar = Sidebar::from_snapshot(snapshot);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("tree") => print_tree(&mut sidebar),
        Some("resolve") => {
            let Some(text) = args.get(1) else {
                return Err("usage: reqx resolve <text> [request-id]".into());
            };
            let mut context = ResolutionContext::new();
            if let Some(request_id) = args.get(2) {
                context = context
                    .with_folder_hierarchy(sidebar.store().request_folder_chain(request_id))
                    .with_request(request_id.clone());
            }
            let result = VariableResolver::new(&variables.scope, &context).resolve(text);
            if !result.is_complete {
                tracing::warn!(undefined = ?result.unresolved, "Undefined variables");
            }
            println!("{}", result.resolved);
        }
        Some("migrate") => {
            SaveSavedRequests::new(&storage).execute(&sidebar.snapshot()).await?;
            SaveVariables::new(&storage).execute(&variables).await?;
        }
        Some(other) => return Err(format!("unknown command: {other}").into()),
    }

    Ok(())
}

fn print_tree(sidebar: &mut Sidebar) {
    sidebar.expand_all();
    let rows = sidebar.rows();
    if rows.is_empty() {
        println!("(no saved requests)");
        return;
    }
    for row in rows {
        let indent = "  ".repeat(row.depth as usize);
        match row.kind {
            NodeKind::Folder => println!("{indent}{}/", row.name),
            NodeKind::Request => {
                let method = row.method.map_or("", HttpMethod::as_str);
                println!("{indent}{method:<7} {}", row.name);
            }
        }
    }
}
