use std::time::Duration;

use retry_transport::{delay_fn, Attempt, RetryTransport, Verdict};
use tracing_subscriber::EnvFilter;

const MAX_ATTEMPTS: u64 = 4;

fn decide(attempt: &Attempt<'_>) -> Verdict {
    match attempt.response() {
        Some(response) if response.status().is_server_error() => {
            if attempt.count() < MAX_ATTEMPTS {
                Verdict::retry()
            } else {
                Verdict::ignore()
            }
        }
        Some(_) => Verdict::ignore(),
        None if attempt.count() < MAX_ATTEMPTS => Verdict::retry(),
        None => Verdict::abort(format!("gave up after {} attempts", attempt.count())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:9/unreachable".to_owned());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let transport = RetryTransport::new(client.clone())
        .with_decision(decide)
        .with_delay(delay_fn(|attempt| {
            Duration::from_millis(200 * attempt.count())
        }));

    let request = client.get(&url).build()?;
    match transport.execute(request).await {
        Ok(response) => println!("{} -> {}", url, response.status()),
        Err(err) => println!("{url} failed: {err}"),
    }

    Ok(())
}
