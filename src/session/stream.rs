//! Incremental walk delivery.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc;

use crate::varbind::VarBind;

/// Receiving end of a streaming walk.
///
/// Yields bindings in tree order and ends once the producing walk has
/// returned, whatever the reason. The walk's own return value tells a clean
/// finish apart from a failure.
#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::Receiver<VarBind>,
}

impl ResultStream {
    /// Receive the next binding, or `None` once the walk has finished.
    pub async fn next(&mut self) -> Option<VarBind> {
        self.rx.recv().await
    }

    /// Drain the stream into a list.
    pub async fn collect(mut self) -> Vec<VarBind> {
        let mut out = Vec::new();
        while let Some(vb) = self.rx.recv().await {
            out.push(vb);
        }
        out
    }

    /// Stop accepting results.
    ///
    /// Bindings already queued can still be read. The producer notices on its
    /// next delivery attempt, which may be after one more request.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl Stream for ResultStream {
    type Item = VarBind;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Create a bounded hand-off queue for a streaming walk.
///
/// Pass the sender to [`Session::stream_walk`](crate::Session::stream_walk) or
/// [`Session::stream_bulk_walk`](crate::Session::stream_bulk_walk); the walk
/// drops it when it returns, which ends the stream. A capacity of zero is
/// raised to one.
pub fn result_channel(capacity: usize) -> (mpsc::Sender<VarBind>, ResultStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, ResultStream { rx })
}
