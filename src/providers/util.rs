use anyhow::{Context, Result, bail};
use std::time::Duration;
use tracing::debug;

/// GETs `url`, retrying transport failures and 5xx responses.
///
/// Makes at most `1 + retries` attempts, sleeping `delay_ms` between them.
/// Any other non-success status fails immediately.
pub async fn get_with_retry(
    client: &reqwest::Client,
    url: &str,
    retries: usize,
    delay_ms: u64,
) -> Result<reqwest::Response> {
    let mut attempt = 1;
    loop {
        let outcome = client.get(url).send().await;
        let retryable = match &outcome {
            Ok(response) if response.status().is_server_error() => true,
            Ok(_) => false,
            Err(_) => true,
        };

        if !retryable || attempt > retries {
            let response = outcome.with_context(|| format!("Request to {url} failed"))?;
            if !response.status().is_success() {
                bail!("Request to {url} returned status {}", response.status());
            }
            return Ok(response);
        }

        debug!("Attempt {attempt}/{retries} for {url} failed. Retrying...");
        attempt += 1;
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/flaky", server.uri());
        let response = get_with_retry(&client, &url, 3, 1).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/missing", server.uri());
        let err = get_with_retry(&client, &url, 3, 1).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/down", server.uri());
        assert!(get_with_retry(&client, &url, 2, 1).await.is_err());
    }
}
