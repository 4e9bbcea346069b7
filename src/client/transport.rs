/**
 * Client Transport
 *
 * The synchronization controller talks to the server through a `Connector`,
 * which opens a `Connection`: a pair of channels carrying decoded events in
 * each direction. The connection is considered lost when its incoming
 * channel closes.
 *
 * Intents are bounded by the connection buffer. Server events are not: the
 * socket is always read, even while the controller waits for room to send,
 * so a burst of echoes can never stall either side.
 *
 * `WsConnector` is the real implementation over `tokio-tungstenite`. Tests
 * provide their own connector built on `Connection::pair`.
 */
use crate::client::error::ClientError;
use crate::shared::{ClientEvent, ServerEvent};
use futures_util::future::BoxFuture;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

/// Buffer size of the intent direction of a connection
const CONNECTION_BUFFER: usize = 64;

/// An open connection, as seen by the controller
#[derive(Debug)]
pub struct Connection {
    /// Intents to send to the server
    pub outgoing: mpsc::Sender<ClientEvent>,
    /// Events received from the server; closes when the connection is lost
    pub incoming: mpsc::UnboundedReceiver<ServerEvent>,
}

/// The server-facing end of a `Connection`
#[derive(Debug)]
pub struct RemoteEnd {
    /// Intents sent by the controller
    pub incoming: mpsc::Receiver<ClientEvent>,
    /// Events to deliver to the controller
    pub outgoing: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    /// Create a connected pair of channels; `capacity` bounds queued intents
    pub fn pair(capacity: usize) -> (Connection, RemoteEnd) {
        let (intent_tx, intent_rx) = mpsc::channel(capacity);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Connection {
                outgoing: intent_tx,
                incoming: event_rx,
            },
            RemoteEnd {
                incoming: intent_rx,
                outgoing: event_tx,
            },
        )
    }
}

/// Opens connections to the board server
pub trait Connector: Send + Sync + 'static {
    fn connect(&self) -> BoxFuture<'_, Result<Connection, ClientError>>;
}

/// WebSocket connector
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for WsConnector {
    fn connect(&self) -> BoxFuture<'_, Result<Connection, ClientError>> {
        Box::pin(async move {
            let (ws, _) = connect_async(self.url.as_str()).await?;
            debug!("[Sync] Connected to {}", self.url);

            let (connection, remote) = Connection::pair(CONNECTION_BUFFER);
            tokio::spawn(pump(ws, remote));
            Ok(connection)
        })
    }
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Move frames between the socket and the connection channels
///
/// Reading and writing run independently, so a slow write never stops the
/// socket from being drained. Exits when either direction finishes; dropping
/// `remote` then signals the controller that the connection is gone.
async fn pump(ws: Socket, remote: RemoteEnd) {
    let (sink, stream) = ws.split();
    let RemoteEnd { incoming, outgoing } = remote;

    tokio::select! {
        _ = read_events(stream, outgoing) => {}
        _ = write_intents(sink, incoming) => {}
    }
}

async fn read_events(
    mut stream: SplitStream<Socket>,
    outgoing: mpsc::UnboundedSender<ServerEvent>,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match ServerEvent::decode(text.as_str()) {
                Ok(event) => {
                    if outgoing.send(event).is_err() {
                        return;
                    }
                }
                Err(e) => warn!("[Sync] Ignoring undecodable frame: {}", e),
            },
            Ok(Message::Close(_)) => return,
            Ok(_) => {}
            Err(e) => {
                debug!("[Sync] Socket error: {}", e);
                return;
            }
        }
    }
}

async fn write_intents(
    mut sink: SplitSink<Socket, Message>,
    mut incoming: mpsc::Receiver<ClientEvent>,
) {
    while let Some(event) = incoming.recv().await {
        let text = match event.encode() {
            Ok(text) => text,
            Err(e) => {
                warn!("[Sync] Failed to encode {}: {}", event.name(), e);
                continue;
            }
        };
        if let Err(e) = sink.send(Message::text(text)).await {
            debug!("[Sync] Failed to send {}: {}", event.name(), e);
            return;
        }
    }
    let _ = sink.close().await;
}
