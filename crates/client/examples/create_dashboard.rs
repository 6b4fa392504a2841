//! Example: Creating a dashboard with a widget
//!
//! Creates a dashboard, adds a widget to it, renames the widget, reads the
//! dashboard back, then deletes it.
//!
//! ```bash
//! BLEEMEO_USER=me@example.com BLEEMEO_PASSWORD=... \
//!     cargo run -p bleemeo-client --example create_dashboard
//! ```

use anyhow::Context;
use bleemeo_client::{config, ApiClient};
use bleemeo_domain::{make_body_from, Graph, Resource};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct NewWidget<'a> {
    dashboard: &'a str,
    title: &'a str,
    graph: Graph,
}

#[derive(Debug, Deserialize)]
struct Dashboard {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    title: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let client = ApiClient::builder()
        .config(config::load_from_env()?)
        .build()
        .context("Failed to initialize client")?;

    let result = run(&client).await;

    client.logout().await.context("Logout")?;

    result
}

async fn run(client: &ApiClient) -> anyhow::Result<()> {
    let body = make_body_from(&serde_json::json!({"name": "My dashboard"}))?;
    let dashboard: Dashboard = serde_json::from_value(
        client.create(Resource::Dashboard, &body).await.context("Error creating dashboard")?,
    )?;
    println!("Successfully created dashboard: {dashboard:?}");

    let body = make_body_from(&NewWidget { dashboard: &dashboard.id, title: "My widget", graph: Graph::Line })?;
    let widget: Widget = serde_json::from_value(
        client.create(Resource::Widget, &body).await.context("Error creating widget")?,
    )?;
    println!("Successfully created widget: {widget:?}");

    let body = make_body_from(&serde_json::json!({"title": "CPU usage"}))?;
    let widget: Widget = serde_json::from_value(
        client.update(Resource::Widget, &widget.id, &body).await.context("Error updating widget")?,
    )?;
    println!("Renamed widget to {:?}", widget.title);

    let fields = vec!["id".to_string(), "name".to_string()];
    let fetched: Dashboard =
        serde_json::from_value(client.get(Resource::Dashboard, &dashboard.id, &fields).await?)?;
    println!("Dashboard {} is named {:?}", fetched.id, fetched.name);

    client.delete(Resource::Dashboard, &dashboard.id).await.context("Error deleting dashboard")?;
    println!("Deleted dashboard {}", dashboard.id);

    Ok(())
}
