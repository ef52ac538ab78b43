//! Viewport notifications as line-delimited JSON, one `ViewportSample` per
//! line, for hosts that can pipe into the bridge.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::sync::{SyncController, SyncError, ViewportSample};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    pub accepted: u64,
    pub rejected: u64,
}

pub async fn run_feed<R>(reader: R, controller: &SyncController) -> Result<FeedStats, SyncError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = FeedStats::default();
    let mut line_no = 0usize;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Viewport feed read error: {}", e);
                break;
            }
        };
        line_no += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<ViewportSample>(trimmed) {
            Ok(sample) => {
                controller.notify(sample)?;
                stats.accepted += 1;
            }
            Err(e) => {
                log::warn!("Ignoring viewport on line {}: {}", line_no, e);
                stats.rejected += 1;
            }
        }
    }

    Ok(stats)
}
