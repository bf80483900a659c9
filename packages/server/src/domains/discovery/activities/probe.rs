use std::time::Duration;
use tracing::debug;

use crate::domains::discovery::models::DiscoveryResult;
use crate::kernel::BaseBoardClient;

/// Check whether `token` has a live board.
///
/// Any job list, even an empty one, makes the board valid. A 404 is recorded
/// as "Not found"; timeouts and other failures keep their message. Never fails.
pub async fn probe_board(board: &dyn BaseBoardClient, token: &str, timeout: Duration) -> DiscoveryResult {
    let board_url = board.board_url(token);
    let api_url = board.jobs_url(token);

    let result = match tokio::time::timeout(timeout, board.list_jobs(token)).await {
        Ok(Ok(jobs)) => DiscoveryResult::found(token, jobs.len(), board_url, api_url),
        Ok(Err(e)) => DiscoveryResult::failed(token, e.to_string(), board_url, api_url),
        Err(_) => DiscoveryResult::failed(
            token,
            format!("timeout of {}ms exceeded", timeout.as_millis()),
            board_url,
            api_url,
        ),
    };

    debug!(
        token = %token,
        valid = result.valid,
        job_count = result.job_count,
        error = ?result.error,
        "Probed board"
    );

    result
}
