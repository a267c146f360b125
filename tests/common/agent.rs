//! In-process SNMP agent for integration tests.
//!
//! [`SimAgent`] answers requests from a fixed MIB tree. It can sit directly
//! behind a session as its [`Transport`], or serve real UDP on loopback.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use snmp_walker::{
    BerCodec, Codec, Error, ErrorStatus, Oid, Packet, PduType, Result, Transport, Value, VarBind,
    Version,
};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// A read-only agent over an ordered MIB tree.
#[derive(Clone, Debug)]
pub struct SimAgent {
    tree: Arc<BTreeMap<Oid, Value>>,
    state: Arc<Mutex<AgentState>>,
    replies_tx: mpsc::UnboundedSender<Bytes>,
    replies_rx: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Bytes>>>,
}

#[derive(Debug, Default)]
struct AgentState {
    requests: Vec<Packet>,
    answer_limit: Option<usize>,
}

impl SimAgent {
    pub fn new(tree: BTreeMap<Oid, Value>) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            tree: Arc::new(tree),
            state: Arc::default(),
            replies_tx,
            replies_rx: Arc::new(tokio::sync::Mutex::new(replies_rx)),
        }
    }

    /// Stop answering after `n` requests, as if the agent went away.
    pub fn answer_only(self, n: usize) -> Self {
        self.state().answer_limit = Some(n);
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Packet> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    /// PDU types of the requests received so far.
    pub fn request_types(&self) -> Vec<PduType> {
        self.state().requests.iter().map(|p| p.pdu_type).collect()
    }

    fn state(&self) -> MutexGuard<'_, AgentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decode a request datagram and build the encoded reply.
    ///
    /// Returns `None` for garbage and for requests past the answer limit.
    pub fn handle(&self, data: &[u8]) -> Option<Bytes> {
        let request = BerCodec.decode(Bytes::copy_from_slice(data)).ok()?;
        {
            let mut state = self.state();
            state.requests.push(request.clone());
            if state
                .answer_limit
                .is_some_and(|limit| state.requests.len() > limit)
            {
                return None;
            }
        }
        BerCodec.encode(&self.respond(&request)).ok()
    }

    /// Answer `request` from the tree.
    pub fn respond(&self, request: &Packet) -> Packet {
        let oids: Vec<Oid> = request.varbinds.iter().map(|vb| vb.oid.clone()).collect();
        let reply = |varbinds| {
            Packet::response(
                request.version,
                request.community.clone(),
                request.request_id,
                varbinds,
            )
        };

        match request.pdu_type {
            PduType::GetRequest => {
                let mut varbinds = Vec::with_capacity(oids.len());
                for (i, oid) in oids.iter().enumerate() {
                    match self.tree.get(oid) {
                        Some(value) => varbinds.push(VarBind::new(oid.clone(), value.clone())),
                        None if request.version == Version::V1 => {
                            return reply(null_bindings(&oids))
                                .with_error(ErrorStatus::NoSuchName, i as i32 + 1);
                        }
                        None => varbinds.push(VarBind::new(oid.clone(), Value::NoSuchObject)),
                    }
                }
                reply(varbinds)
            }
            PduType::GetNextRequest => {
                let mut varbinds = Vec::with_capacity(oids.len());
                for (i, oid) in oids.iter().enumerate() {
                    match self.next_after(oid) {
                        Some(vb) => varbinds.push(vb),
                        None if request.version == Version::V1 => {
                            return reply(null_bindings(&oids))
                                .with_error(ErrorStatus::NoSuchName, i as i32 + 1);
                        }
                        None => varbinds.push(VarBind::new(oid.clone(), Value::EndOfMibView)),
                    }
                }
                reply(varbinds)
            }
            PduType::GetBulkRequest => reply(self.bulk(
                &oids,
                request.non_repeaters.max(0) as usize,
                request.max_repetitions.max(0) as usize,
            )),
            _ => reply(null_bindings(&oids)).with_error(ErrorStatus::GenErr, 0),
        }
    }

    fn next_after(&self, oid: &Oid) -> Option<VarBind> {
        self.tree
            .range((Bound::Excluded(oid.clone()), Bound::Unbounded))
            .next()
            .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()))
    }

    fn next_or_end(&self, oid: &Oid) -> VarBind {
        self.next_after(oid)
            .unwrap_or_else(|| VarBind::new(oid.clone(), Value::EndOfMibView))
    }

    fn bulk(&self, oids: &[Oid], non_repeaters: usize, max_repetitions: usize) -> Vec<VarBind> {
        let split = non_repeaters.min(oids.len());
        let mut varbinds: Vec<VarBind> =
            oids[..split].iter().map(|oid| self.next_or_end(oid)).collect();

        let mut cursors: Vec<Oid> = oids[split..].to_vec();
        if cursors.is_empty() {
            return varbinds;
        }
        for _ in 0..max_repetitions {
            let mut all_ended = true;
            for cursor in cursors.iter_mut() {
                let vb = self.next_or_end(cursor);
                if !vb.value.is_end_of_mib_view() {
                    all_ended = false;
                    *cursor = vb.oid.clone();
                }
                varbinds.push(vb);
            }
            if all_ended {
                break;
            }
        }
        varbinds
    }

    /// Serve the tree over UDP on an ephemeral loopback port.
    pub async fn serve_udp(self) -> std::io::Result<SocketAddr> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        tokio::spawn(async move {
            let mut buf = vec![0u8; 65_535];
            while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
                if let Some(reply) = self.handle(&buf[..len]) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });
        Ok(addr)
    }
}

fn null_bindings(oids: &[Oid]) -> Vec<VarBind> {
    oids.iter().cloned().map(VarBind::null).collect()
}

impl Transport for SimAgent {
    async fn send(&self, data: &[u8]) -> Result<()> {
        if let Some(reply) = self.handle(data) {
            let _ = self.replies_tx.send(reply);
        }
        Ok(())
    }

    async fn recv(&self) -> Result<Bytes> {
        let mut rx = self.replies_rx.lock().await;
        match rx.recv().await {
            Some(reply) => Ok(reply),
            None => std::future::pending().await,
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        SocketAddr::from(([192, 0, 2, 1], 161))
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], 0))
    }
}

/// True when `err` is a timeout.
pub fn is_timeout(err: &Error) -> bool {
    matches!(err, Error::Timeout { .. })
}
