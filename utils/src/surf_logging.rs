use std::time::Instant;

use log::{debug, warn};
use surf::middleware::{Middleware, Next};
use surf::{Client, Request, Response};

/// Middleware logging every outgoing request with status and elapsed time.
pub struct SurfLogging;

#[surf::utils::async_trait]
impl Middleware for SurfLogging {
    async fn handle(&self, req: Request, client: Client, next: Next<'_>) -> surf::Result<Response> {
        let method = req.method();
        let url = req.url().clone();
        let start = Instant::now();

        match next.run(req, client).await {
            Ok(response) => {
                debug!(
                    "{} {} -> {} ({:?})",
                    method,
                    url,
                    response.status(),
                    start.elapsed()
                );
                Ok(response)
            }
            Err(err) => {
                warn!("{} {} failed: {} ({:?})", method, url, err, start.elapsed());
                Err(err)
            }
        }
    }
}
