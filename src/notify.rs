use tracing::{debug, warn};

/// Fires the static-site rebuild hook after a successful document write.
/// The data is already committed by the time this runs, so a failed hook is
/// logged and never fails the request.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn rebuild(&self, hook_url: Option<&str>) {
        let Some(url) = hook_url else {
            debug!("no rebuild hook configured, skipping");
            return;
        };
        match self.client.post(url).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                warn!(status = %resp.status(), url, "rebuild hook returned non-success status");
            }
            Err(e) => {
                warn!(error = %e, url, "failed to reach rebuild hook");
            }
        }
    }
}
