//! Subtree walks.
//!
//! Both strategies are written once against [`Sink`]: the blocking variants
//! collect into a `Vec`, the streaming variants push into an mpsc sender that
//! the walk owns and drops on return, which closes the stream on every exit
//! path.
//!
//! A walk ends without error when the agent steps past the root prefix,
//! returns `endOfMibView`, or has nothing more to return (an empty response,
//! or `noSuchName` from an SNMPv1 agent). Any other request error ends the
//! walk and is returned as is.

use std::future::Future;

use tokio::sync::mpsc;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::transport::Transport;
use crate::varbind::VarBind;

use super::Session;

/// Where a walk delivers its results.
trait Sink: Send {
    /// Deliver one binding. Returns `false` once nobody is listening.
    fn emit(&mut self, vb: VarBind) -> impl Future<Output = bool> + Send;
}

impl Sink for Vec<VarBind> {
    async fn emit(&mut self, vb: VarBind) -> bool {
        self.push(vb);
        true
    }
}

impl Sink for mpsc::Sender<VarBind> {
    async fn emit(&mut self, vb: VarBind) -> bool {
        self.send(vb).await.is_ok()
    }
}

impl<T: Transport, C: Codec> Session<T, C> {
    /// Walk the subtree under `root` with GETNEXT, one object per request.
    ///
    /// Returns the bindings in tree order. On error, results gathered so far
    /// are discarded.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example() -> snmp_walker::Result<()> {
    /// let session = snmp_walker::Session::connect("192.168.1.1", "public", snmp_walker::Version::V2c, 5).await?;
    /// for vb in session.walk("1.3.6.1.2.1.1").await? {
    ///     println!("{}", vb);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn walk(&self, root: &str) -> Result<Vec<VarBind>> {
        let mut results = Vec::new();
        self.run_walk(root, &mut results).await?;
        Ok(results)
    }

    /// Walk the subtree under `root` with GETNEXT, sending each binding to
    /// `tx` as soon as it arrives.
    ///
    /// `tx` is dropped when this returns, so the matching
    /// [`ResultStream`](super::ResultStream) ends on success and failure
    /// alike. If the stream is dropped early the walk stops after the request
    /// in flight and returns `Ok(())`.
    ///
    /// ```rust,no_run
    /// # async fn example(session: snmp_walker::Session) -> snmp_walker::Result<()> {
    /// let (tx, mut stream) = snmp_walker::result_channel(32);
    /// let producer = session.stream_walk("1.3.6.1.2.1.2.2", tx);
    /// let consumer = async {
    ///     while let Some(vb) = stream.next().await {
    ///         println!("{}", vb);
    ///     }
    /// };
    /// let (result, ()) = tokio::join!(producer, consumer);
    /// result?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn stream_walk(&self, root: &str, tx: mpsc::Sender<VarBind>) -> Result<()> {
        let mut tx = tx;
        self.run_walk(root, &mut tx).await
    }

    /// Walk the subtree under `root` with GETBULK, up to `max_repetitions`
    /// objects per request.
    ///
    /// Produces the same list as [`walk`](Self::walk) against a well-behaved
    /// agent, in fewer round trips. Not available in SNMPv1.
    pub async fn bulk_walk(&self, max_repetitions: u8, root: &str) -> Result<Vec<VarBind>> {
        let mut results = Vec::new();
        self.run_bulk_walk(max_repetitions, root, &mut results)
            .await?;
        Ok(results)
    }

    /// Streaming form of [`bulk_walk`](Self::bulk_walk).
    ///
    /// In-range bindings are sent as each batch is classified, before the
    /// next batch is requested. Closing semantics match
    /// [`stream_walk`](Self::stream_walk).
    pub async fn stream_bulk_walk(
        &self,
        max_repetitions: u8,
        root: &str,
        tx: mpsc::Sender<VarBind>,
    ) -> Result<()> {
        let mut tx = tx;
        self.run_bulk_walk(max_repetitions, root, &mut tx).await
    }

    async fn run_walk<S: Sink>(&self, root: &str, sink: &mut S) -> Result<()> {
        let root = Oid::parse(root)?;
        let mut cursor = root.clone();

        loop {
            let response = match self.get_next_oid(cursor.clone()).await {
                Ok(response) => response,
                Err(e) if self.is_end_of_tree(&e) => {
                    self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { cursor = %cursor }, "end of tree, stopping walk"));
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let Some(vb) = response.varbinds.into_iter().next() else {
                return Ok(());
            };

            if vb.value.is_end_of_mib_view() {
                self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { cursor = %cursor }, "endOfMibView, stopping walk"));
                return Ok(());
            }

            if !vb.oid.starts_with(&root) {
                self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { root = %root, oid = %vb.oid }, "root OID mismatch, stopping walk"));
                return Ok(());
            }

            // A reply that does not move forward would repeat forever.
            if vb.oid <= cursor {
                return Err(Error::NonIncreasingOid {
                    previous: cursor,
                    current: vb.oid,
                });
            }

            self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { oid = %vb.oid }, "moving to {}", vb.oid));
            cursor = vb.oid.clone();

            if !sink.emit(vb).await {
                tracing::debug!(target: "snmp_walker::walk", "result stream closed, stopping walk");
                return Ok(());
            }
        }
    }

    async fn run_bulk_walk<S: Sink>(
        &self,
        max_repetitions: u8,
        root: &str,
        sink: &mut S,
    ) -> Result<()> {
        let root = Oid::parse(root)?;

        // Seeds still to fetch. Each batch pushes at most one, so popping
        // keeps batches in depth-first order.
        let mut pending = vec![root.clone()];

        while let Some(seed) = pending.pop() {
            let response = match self
                .get_bulk_oids(0, max_repetitions, std::slice::from_ref(&seed))
                .await
            {
                Ok(response) => response,
                Err(e) if self.is_end_of_tree(&e) => {
                    self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { seed = %seed }, "end of tree, stopping bulk walk"));
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let last = response.varbinds.len().saturating_sub(1);
            let mut continue_from = None;

            for (i, vb) in response.varbinds.into_iter().enumerate() {
                if vb.value.is_end_of_mib_view() {
                    self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { oid = %vb.oid }, "endOfMibView, stopping bulk walk"));
                    return Ok(());
                }

                if !vb.oid.starts_with(&root) {
                    self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { root = %root, oid = %vb.oid }, "root OID mismatch, skipping"));
                    continue;
                }

                if i == last {
                    continue_from = Some(vb.oid.clone());
                }
                if !sink.emit(vb).await {
                    tracing::debug!(target: "snmp_walker::walk", "result stream closed, stopping bulk walk");
                    return Ok(());
                }
            }

            if let Some(next) = continue_from {
                if next <= seed {
                    return Err(Error::NonIncreasingOid {
                        previous: seed,
                        current: next,
                    });
                }
                self.trace_step(|| tracing::debug!(target: "snmp_walker::walk", { oid = %next }, "moving to {}", next));
                pending.push(next);
            }
        }

        Ok(())
    }

    fn trace_step(&self, event: impl FnOnce()) {
        if self.config.log.debug {
            event();
        }
    }
}
