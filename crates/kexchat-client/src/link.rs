//! Relay link: the WebSocket adapter.
//!
//! Turns the relay socket into a [`LinkEvent`] stream and an outbound frame
//! sink. The link announces the joining user as the very first outbound
//! frame, before any other traffic. Sends while disconnected fail fast; no
//! buffering, no auto-reconnect. Reconnecting is the caller's decision and
//! means a brand-new session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use kexchat_core::{destinations, ChatError, ChatEvent, Envelope, Result, Username};

use crate::channel::{
    create_link_event_channel, create_outbound_channel, ChannelConfig, LinkEventReceiver,
    LinkEventSender, OutboundReceiver, OutboundSender,
};
use crate::events::LinkEvent;

type RelaySocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ----------------------------------------------------------------------------
// Connection gauge
// ----------------------------------------------------------------------------

/// Shared, lock-free view of link state.
///
/// Lets the presentation side reject sends synchronously while the link is
/// down, without waiting on the dispatch loop.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGauge(Arc<AtomicBool>);

impl ConnectionGauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connected(&self, connected: bool) {
        self.0.store(connected, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ----------------------------------------------------------------------------
// Relay link
// ----------------------------------------------------------------------------

/// Handle to a live relay connection.
pub struct RelayLink {
    outbound: Option<OutboundSender>,
    gauge: ConnectionGauge,
}

impl RelayLink {
    /// Connect to the relay, announce the join, and start pumping frames.
    ///
    /// `LinkEvent::Connected` is guaranteed to be the first event on the
    /// returned receiver, and the join announcement the first frame on the
    /// wire.
    pub async fn connect(
        url: &Url,
        username: &Username,
        config: &ChannelConfig,
    ) -> Result<(Self, LinkEventReceiver)> {
        let (socket, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| ChatError::connect_failed(e.to_string()))?;
        let (mut sink, stream) = socket.split();

        // Join announcement goes out before anything else can be queued.
        let join = Envelope::new(destinations::ADD_USER, &ChatEvent::join(username))?;
        sink.send(Message::Text(join.encode()?))
            .await
            .map_err(|e| ChatError::send_failed(e.to_string()))?;
        debug!(user = %username, relay = %url, "joined relay");

        let gauge = ConnectionGauge::new();
        gauge.set_connected(true);

        let (event_sender, event_receiver) = create_link_event_channel(config);
        let (outbound_sender, outbound_receiver) = create_outbound_channel(config);

        if event_sender.send(LinkEvent::Connected).await.is_err() {
            return Err(ChatError::channel_error("link event receiver dropped during connect"));
        }

        tokio::spawn(read_loop(stream, event_sender, gauge.clone()));
        tokio::spawn(write_loop(sink, outbound_receiver, gauge.clone()));

        Ok((Self { outbound: Some(outbound_sender), gauge }, event_receiver))
    }

    /// Assemble a link from an already-running outbound channel and gauge.
    ///
    /// Lets the dispatch loop be driven without a socket behind it.
    pub fn from_parts(outbound: OutboundSender, gauge: ConnectionGauge) -> Self {
        Self { outbound: Some(outbound), gauge }
    }

    /// Queue an encoded frame for the relay.
    ///
    /// Fails fast with `TransportError::NotConnected` while the link is
    /// down; nothing is buffered for later.
    pub fn send(&self, frame: String) -> Result<()> {
        let Some(outbound) = self.outbound.as_ref().filter(|_| self.gauge.is_connected()) else {
            return Err(ChatError::not_connected());
        };
        outbound
            .try_send(frame)
            .map_err(|e| ChatError::send_failed(e.to_string()))
    }

    /// Tear the connection down.
    ///
    /// Dropping the outbound sender stops the writer, which closes the
    /// socket; the reader then emits its one `Disconnected` event.
    pub fn close(&mut self) {
        self.gauge.set_connected(false);
        self.outbound = None;
    }

    pub fn gauge(&self) -> ConnectionGauge {
        self.gauge.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.gauge.is_connected()
    }
}

// ----------------------------------------------------------------------------
// Socket pump tasks
// ----------------------------------------------------------------------------

/// Forward inbound text frames until the socket ends, then report the
/// disconnect exactly once.
async fn read_loop(mut stream: SplitStream<RelaySocket>, events: LinkEventSender, gauge: ConnectionGauge) {
    let reason = loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                if events.send(LinkEvent::Inbound { text }).await.is_err() {
                    break "link event receiver dropped".to_string();
                }
            }
            Some(Ok(Message::Close(_))) | None => break "closed by relay".to_string(),
            // Control frames are not part of the chat protocol.
            Some(Ok(_)) => {}
            Some(Err(e)) => break e.to_string(),
        }
    };
    gauge.set_connected(false);
    debug!(%reason, "relay read loop ended");
    let _ = events.send(LinkEvent::Disconnected { reason }).await;
}

/// Drain the outbound queue into the socket; close the socket when the
/// queue's sender side is dropped.
async fn write_loop(
    mut sink: SplitSink<RelaySocket, Message>,
    mut outbound: OutboundReceiver,
    gauge: ConnectionGauge,
) {
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = sink.send(Message::Text(frame)).await {
            warn!(error = %e, "relay write failed");
            gauge.set_connected(false);
            break;
        }
    }
    let _ = sink.close().await;
}
