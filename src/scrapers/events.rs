use crate::error::SinkError;
use crate::scrapers::traits::ProgressSink;
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};

/// Idle keep-alive frame for event-stream transports
pub const HEARTBEAT_FRAME: &str = "event: ping\ndata: {}\n\n";

/// How often an idle event stream sends `HEARTBEAT_FRAME`
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Progress of a single run, in emission order.
/// Exactly one `Completed` or `Failed` ends a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProgressEvent {
    #[serde(rename_all = "camelCase")]
    Progress { message: String, percent: u8 },
    #[serde(rename_all = "camelCase")]
    Completed { record_count: usize },
    #[serde(rename_all = "camelCase")]
    Failed { message: String },
}

impl ProgressEvent {
    /// Name of the event on a server-sent event stream
    pub fn event_name(&self) -> &'static str {
        match self {
            ProgressEvent::Progress { .. } => "progress",
            ProgressEvent::Completed { .. } => "done",
            ProgressEvent::Failed { .. } => "error",
        }
    }

    /// Progress bar position carried by this event, if any
    pub fn percent(&self) -> Option<u8> {
        match self {
            ProgressEvent::Progress { percent, .. } => Some(*percent),
            ProgressEvent::Completed { .. } => Some(100),
            ProgressEvent::Failed { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress { .. })
    }

    /// Render as one server-sent event frame
    pub fn to_sse_frame(&self) -> String {
        let data = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        format!("event: {}\ndata: {}\n\n", self.event_name(), data)
    }
}

/// Write events to `out` as server-sent event frames until the sender side closes,
/// with a heartbeat frame every `heartbeat` in between
pub async fn stream_sse<W>(
    mut events: mpsc::UnboundedReceiver<ProgressEvent>,
    mut out: W,
    heartbeat: Duration,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut ticks = interval_at(Instant::now() + heartbeat, heartbeat);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => out.write_all(event.to_sse_frame().as_bytes()).await?,
                None => break,
            },
            _ = ticks.tick() => out.write_all(HEARTBEAT_FRAME.as_bytes()).await?,
        }
        out.flush().await?;
    }

    out.flush().await
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_event(&self, _event: &ProgressEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Forwards events to an unbounded channel so the run never waits on the consumer
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn on_event(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        self.tx
            .send(event.clone())
            .map_err(|_| SinkError("event receiver dropped".to_string()))
    }
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        self(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_follow_stream_contract() {
        let progress = ProgressEvent::Progress {
            message: "Fetching page 1...".to_string(),
            percent: 0,
        };
        assert_eq!(progress.event_name(), "progress");
        assert_eq!(ProgressEvent::Completed { record_count: 3 }.event_name(), "done");
        assert_eq!(
            ProgressEvent::Failed {
                message: "boom".to_string()
            }
            .event_name(),
            "error"
        );
    }

    #[test]
    fn sse_frame_carries_json_payload() {
        let frame = ProgressEvent::Completed { record_count: 20 }.to_sse_frame();
        assert_eq!(
            frame,
            "event: done\ndata: {\"type\":\"completed\",\"recordCount\":20}\n\n"
        );
    }

    #[test]
    fn completed_reports_full_progress() {
        assert_eq!(ProgressEvent::Completed { record_count: 0 }.percent(), Some(100));
        assert!(ProgressEvent::Completed { record_count: 0 }.is_terminal());
        assert_eq!(
            ProgressEvent::Failed {
                message: String::new()
            }
            .percent(),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn idle_stream_is_kept_alive_with_heartbeats() {
        let (sink, rx) = ChannelSink::new();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(40)).await;
            sink.on_event(&ProgressEvent::Completed { record_count: 2 }).unwrap();
        });

        let mut out = Vec::new();
        stream_sse(rx, &mut out, HEARTBEAT_INTERVAL).await.unwrap();

        let expected = format!(
            "{HEARTBEAT_FRAME}{HEARTBEAT_FRAME}{}",
            ProgressEvent::Completed { record_count: 2 }.to_sse_frame()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[tokio::test]
    async fn busy_stream_carries_only_event_frames() {
        let (sink, rx) = ChannelSink::new();
        let progress = ProgressEvent::Progress {
            message: "Fetching page 1...".to_string(),
            percent: 0,
        };
        sink.on_event(&progress).unwrap();
        drop(sink);

        let mut out = Vec::new();
        stream_sse(rx, &mut out, HEARTBEAT_INTERVAL).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), progress.to_sse_frame());
    }

    #[test]
    fn channel_sink_errors_once_receiver_is_gone() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        let err = sink
            .on_event(&ProgressEvent::Completed { record_count: 1 })
            .unwrap_err();
        assert!(err.to_string().contains("receiver dropped"));
    }
}
