use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use trackgate_gt06::{build_heartbeat_packet, build_login_packet, build_voltage_info_packet};
use trackgate_model::DeviceId;
use trackgate_store::DeviceStateRepo;

use crate::command_handler::CommandHandler;
use crate::error::{is_disconnect_worthy, SessionError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const READ_BUF_LEN: usize = 4096;
const GT06_PROTOCOL: &str = "gt06";

/// The kind of payload a `send_data` call carries, used to select the
/// protocol-specific pre-send policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketType {
    Login,
    Heartbeat,
    Location,
    Command,
}

struct Inner {
    output_protocol: String,
    stream: Option<Arc<TcpStream>>,
    reader_task: Option<JoinHandle<()>>,
    heartbeat_task: Option<JoinHandle<()>>,
    cancel: Option<Arc<Notify>>,
}

/// One downstream TCP session per device: login handshake, heartbeat timer,
/// reconnect, and bidirectional command routing. All public operations
/// serialize through a single async mutex; internal reconnect-then-send
/// logic shares private helpers that take the already-locked state rather
/// than re-entering the lock.
pub struct Session {
    device_id: DeviceId,
    input_source: String,
    addresses: Arc<HashMap<String, (String, u16)>>,
    store: DeviceStateRepo,
    command_handler: Arc<dyn CommandHandler>,
    connected: AtomicBool,
    gt06_login_pending: AtomicBool,
    login_cleared: Notify,
    inner: Mutex<Inner>,
}

impl Session {
    pub fn new(
        device_id: DeviceId,
        input_source: String,
        output_protocol: String,
        addresses: Arc<HashMap<String, (String, u16)>>,
        store: DeviceStateRepo,
        command_handler: Arc<dyn CommandHandler>,
    ) -> Arc<Self> {
        Arc::new(Self {
            device_id,
            input_source,
            addresses,
            store,
            command_handler,
            connected: AtomicBool::new(false),
            gt06_login_pending: AtomicBool::new(false),
            login_cleared: Notify::new(),
            inner: Mutex::new(Inner {
                output_protocol,
                stream: None,
                reader_task: None,
                heartbeat_task: None,
                cancel: None,
            }),
        })
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Idempotent connect: resolves the downstream address for the current
    /// output protocol, opens a TCP connection, spawns the inbound reader,
    /// and performs protocol presentation (GT06 login).
    pub async fn connect(self: &Arc<Self>) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        self.do_connect(&mut inner).await
    }

    /// Sends `bytes`, reconnecting or switching protocol first as needed,
    /// and applying GT06's login-pending gate and pre-location voltage
    /// packet. Resets the heartbeat timer on success; disconnects on
    /// failure.
    pub async fn send_data(
        self: &Arc<Self>,
        bytes: &[u8],
        protocol: &str,
        packet_type: PacketType,
    ) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        if protocol != inner.output_protocol {
            self.do_disconnect(&mut inner).await;
            inner.output_protocol = protocol.to_string();
        }

        if inner.stream.is_none() {
            self.do_connect(&mut inner).await?;
        }

        if inner.output_protocol == GT06_PROTOCOL {
            if packet_type != PacketType::Login && self.gt06_login_pending.load(Ordering::Relaxed) {
                self.login_cleared.notified().await;
                let heartbeat = build_heartbeat_packet(true, 0);
                self.do_write(&mut inner, &heartbeat).await?;
            }

            if packet_type == PacketType::Location {
                let voltage = self
                    .store
                    .voltage(&self.input_source, &self.device_id)
                    .await?
                    .unwrap_or(trackgate_model::DEFAULT_VOLTAGE);
                let voltage_packet = build_voltage_info_packet(voltage, 0);
                self.do_write(&mut inner, &voltage_packet).await?;
            }
        }

        self.do_write(&mut inner, bytes).await
    }

    /// Idempotent disconnect: shuts down the socket, cancels the inbound
    /// reader and heartbeat tasks, clears connected state.
    pub async fn disconnect(&self) {
        let mut inner = self.inner.lock().await;
        self.do_disconnect(&mut inner).await;
    }

    async fn do_connect(self: &Arc<Self>, inner: &mut Inner) -> Result<(), SessionError> {
        if inner.stream.is_some() {
            return Ok(());
        }

        let (host, port) = self
            .addresses
            .get(&inner.output_protocol)
            .cloned()
            .ok_or_else(|| SessionError::UnknownProtocol(inner.output_protocol.clone()))?;

        let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect((host.as_str(), port)))
            .await
            .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;

        let stream = Arc::new(stream);
        let cancel = Arc::new(Notify::new());

        inner.stream = Some(stream.clone());
        inner.cancel = Some(cancel.clone());
        self.connected.store(true, Ordering::Relaxed);

        let reader = tokio::spawn(self.clone().inbound_reader_loop(stream, cancel));
        inner.reader_task = Some(reader);

        if inner.output_protocol == GT06_PROTOCOL {
            self.gt06_login_pending.store(true, Ordering::Relaxed);
            let imei = match self.device_id.gt06_effective_id() {
                Some(imei) => imei,
                None => {
                    self.do_disconnect(inner).await;
                    return Err(trackgate_gt06::CodecError::InvalidDeviceId(self.device_id.to_string()).into());
                }
            };
            let login_packet = match build_login_packet(imei, 0) {
                Ok(packet) => packet,
                Err(e) => {
                    self.do_disconnect(inner).await;
                    return Err(e.into());
                }
            };
            self.do_write(inner, &login_packet).await?;
        }

        Ok(())
    }

    async fn do_disconnect(&self, inner: &mut Inner) {
        if let Some(cancel) = inner.cancel.take() {
            cancel.notify_waiters();
        }
        if let Some(stream) = inner.stream.take() {
            let mut half = stream.as_ref();
            let _ = half.shutdown().await;
        }
        if let Some(task) = inner.heartbeat_task.take() {
            task.abort();
        }
        inner.reader_task = None;
        self.connected.store(false, Ordering::Relaxed);
        self.gt06_login_pending.store(false, Ordering::Relaxed);
    }

    async fn do_write(self: &Arc<Self>, inner: &mut Inner, bytes: &[u8]) -> Result<(), SessionError> {
        let Some(stream) = inner.stream.clone() else {
            return Err(SessionError::Io(std::io::Error::from(std::io::ErrorKind::NotConnected)));
        };

        let mut half = stream.as_ref();
        match half.write_all(bytes).await {
            Ok(()) => {
                self.rearm_heartbeat(inner);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(device_id = %self.device_id, error = %e, "send failed, disconnecting");
                self.do_disconnect(inner).await;
                Err(e.into())
            }
        }
    }

    fn rearm_heartbeat(self: &Arc<Self>, inner: &mut Inner) {
        if let Some(task) = inner.heartbeat_task.take() {
            task.abort();
        }
        let session = self.clone();
        inner.heartbeat_task = Some(tokio::spawn(async move {
            tokio::time::sleep(HEARTBEAT_INTERVAL).await;
            let heartbeat = build_heartbeat_packet(true, 0);
            let protocol = {
                let inner = session.inner.lock().await;
                inner.output_protocol.clone()
            };
            if let Err(e) = session.send_data(&heartbeat, &protocol, PacketType::Heartbeat).await {
                tracing::warn!(device_id = %session.device_id, error = %e, "heartbeat send failed");
            }
        }));
    }

    async fn inbound_reader_loop(self: Arc<Self>, stream: Arc<TcpStream>, cancel: Arc<Notify>) {
        let mut buf = vec![0u8; READ_BUF_LEN];
        let mut half = stream.as_ref();
        loop {
            let read = tokio::select! {
                _ = cancel.notified() => break,
                result = half.read(&mut buf) => result,
            };

            match read {
                Ok(0) => {
                    self.disconnect().await;
                    break;
                }
                Ok(n) => {
                    if self.gt06_login_pending.swap(false, Ordering::Relaxed) {
                        self.login_cleared.notify_one();
                        continue;
                    }
                    if let Some(command) = trackgate_gt06::decode_command_frame(&buf[..n]) {
                        self.command_handler.handle_command(&self.device_id, command).await;
                    }
                }
                Err(e) if is_disconnect_worthy(&e) => {
                    self.disconnect().await;
                    break;
                }
                Err(_) => continue,
            }
        }
    }
}
