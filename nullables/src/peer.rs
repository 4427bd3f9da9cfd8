//! Nullable peer: a scripted full node on loopback.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use quill_protocol::codec::HEADER_LEN;
use quill_protocol::{decode_message, encode_frame, frame_length, Message};
use quill_types::Peer;

/// What the stub does after reading a request.
#[derive(Clone, Debug)]
pub enum StubReply {
    /// Deliver this reply over the configured route.
    Reply(Message),
    /// Close the connection without replying.
    Silent,
    /// Keep the request connection open and never reply.
    Stall,
}

/// How replies travel back to the requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyRoute {
    /// Write the reply on the request connection.
    SameConnection,
    /// Connect back to the requester's `reply_port`.
    Callback,
    /// Connect back from the given local address first, posing as another
    /// host, then deliver the same reply as `Callback` does.
    CallbackAfterSpurious(IpAddr),
    /// Connect back only from the given local address.
    WrongHost(IpAddr),
}

type Responder = Arc<dyn Fn(&Message) -> StubReply + Send + Sync>;

/// An in-process peer speaking the wire protocol.
pub struct StubPeer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Message>>>,
    task: JoinHandle<()>,
}

impl StubPeer {
    /// Start a stub answering on the request connection.
    pub async fn synchronous<F>(responder: F) -> std::io::Result<Self>
    where
        F: Fn(&Message) -> StubReply + Send + Sync + 'static,
    {
        Self::spawn(ReplyRoute::SameConnection, responder).await
    }

    /// Start a stub answering through the requester's callback port.
    pub async fn callback<F>(responder: F) -> std::io::Result<Self>
    where
        F: Fn(&Message) -> StubReply + Send + Sync + 'static,
    {
        Self::spawn(ReplyRoute::Callback, responder).await
    }

    pub async fn spawn<F>(route: ReplyRoute, responder: F) -> std::io::Result<Self>
    where
        F: Fn(&Message) -> StubReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let responder: Responder = Arc::new(responder);

        let task = {
            let received = Arc::clone(&received);
            tokio::spawn(async move {
                while let Ok((stream, from)) = listener.accept().await {
                    let received = Arc::clone(&received);
                    let responder = Arc::clone(&responder);
                    tokio::spawn(async move {
                        if let Err(e) = serve(stream, from, route, responder, received).await {
                            tracing::debug!(from = %from, error = %e, "stub peer connection ended");
                        }
                    });
                }
            })
        };

        Ok(Self {
            addr,
            received,
            task,
        })
    }

    /// The address clients should dial.
    pub fn peer(&self) -> Peer {
        Peer::new(self.addr.ip().to_string(), self.addr.port())
    }

    /// Messages received so far, in arrival order.
    pub async fn received(&self) -> Vec<Message> {
        self.received.lock().await.clone()
    }

    /// Wait until at least `count` messages have arrived, up to `limit`.
    pub async fn wait_received(&self, count: usize, limit: Duration) -> Vec<Message> {
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            let seen = self.received().await;
            if seen.len() >= count || tokio::time::Instant::now() >= deadline {
                return seen;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for StubPeer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    from: SocketAddr,
    route: ReplyRoute,
    responder: Responder,
    received: Arc<Mutex<Vec<Message>>>,
) -> std::io::Result<()> {
    let Some(request) = read_message(&mut stream).await? else {
        return Ok(());
    };
    received.lock().await.push(request.clone());

    let reply = match responder(&request) {
        StubReply::Reply(msg) => msg,
        StubReply::Silent => return Ok(()),
        StubReply::Stall => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            return Ok(());
        }
    };
    let frame = encode_frame(&reply).map_err(invalid)?;

    match route {
        ReplyRoute::SameConnection => {
            stream.write_all(&frame).await?;
            stream.flush().await?;
        }
        ReplyRoute::Callback => {
            drop(stream);
            connect_back(from.ip(), request.reply_port, None, &frame).await?;
        }
        ReplyRoute::CallbackAfterSpurious(ip) => {
            drop(stream);
            connect_back(from.ip(), request.reply_port, Some(ip), &frame).await?;
            // Leave time for the requester to reject it before the real reply.
            tokio::time::sleep(Duration::from_millis(50)).await;
            connect_back(from.ip(), request.reply_port, None, &frame).await?;
        }
        ReplyRoute::WrongHost(ip) => {
            drop(stream);
            connect_back(from.ip(), request.reply_port, Some(ip), &frame).await?;
        }
    }
    Ok(())
}

async fn connect_back(
    host: IpAddr,
    port: u16,
    bind: Option<IpAddr>,
    frame: &[u8],
) -> std::io::Result<()> {
    let target = SocketAddr::new(host, port);
    let mut stream = match bind {
        Some(ip) => {
            let socket = TcpSocket::new_v4()?;
            socket.bind(SocketAddr::new(ip, 0))?;
            socket.connect(target).await?
        }
        None => TcpStream::connect(target).await?,
    };
    stream.write_all(frame).await?;
    stream.flush().await
}

async fn read_message(stream: &mut TcpStream) -> std::io::Result<Option<Message>> {
    let mut header = [0u8; HEADER_LEN];
    match stream.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let len = frame_length(header).map_err(invalid)?;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await?;
    decode_message(&body).map(Some).map_err(invalid)
}

fn invalid(e: quill_protocol::ProtocolError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, e)
}
