//! Example: Listing active metrics
//!
//! Walks every active metric, fetching only the `id` and `label` fields:
//! the fewer fields requested, the faster the query.
//!
//! Run with credentials in the environment:
//!
//! ```bash
//! BLEEMEO_USER=me@example.com BLEEMEO_PASSWORD=... \
//!     cargo run -p bleemeo-client --example list_metrics
//! ```

use anyhow::Context;
use bleemeo_client::{config, ApiClient, ApiError};
use bleemeo_domain::{Params, Resource};
use tracing_subscriber::EnvFilter;

const MAX_SHOWN: usize = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let client = ApiClient::builder()
        .config(config::load_from_env()?)
        .build()
        .context("Failed to initialize client")?;

    let result = list(&client).await;

    client.logout().await.context("Logout")?;

    match result {
        Ok(count) => {
            println!("Successfully retrieved {count} metrics from API");
            Ok(())
        }
        Err(err) => Err(describe(err)),
    }
}

async fn list(client: &ApiClient) -> Result<usize, ApiError> {
    let params = Params::from([
        ("fields".to_string(), "id,label".to_string()),
        ("active".to_string(), "True".to_string()),
    ]);
    let mut metrics = client.iterator(Resource::Metric, params);
    let mut count = 0;

    while let Some(metric) = metrics.try_next().await? {
        if count == MAX_SHOWN {
            println!("Listing has more than {MAX_SHOWN} metrics, only the first {MAX_SHOWN} are shown");
            break;
        }
        count += 1;
        println!("-> {} {}", metric["id"], metric["label"]);
    }

    Ok(count)
}

fn describe(err: ApiError) -> anyhow::Error {
    if err.is_auth() {
        let code = err.auth_error_code().unwrap_or("-").to_string();
        let message = err.details().map(|d| d.message.clone()).unwrap_or_default();
        return anyhow::anyhow!("Authentication error: {code} / {message}");
    }

    if let Some(details) = err.details() {
        return anyhow::anyhow!("API error: {} - {}", details.status.as_u16(), details.message);
    }

    anyhow::Error::new(err).context("Iteration error")
}
