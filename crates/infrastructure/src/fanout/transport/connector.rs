use bucketwire_domain::BoxError;
use http::uri::Scheme;
use http::Uri;
use hyper::rt::{Read, ReadBufCursor, Write};
use hyper_util::client::legacy::connect::{Connected, Connection, HttpConnector};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tower::Service;
use tracing::debug;

use super::tls::TlsSettings;

const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Dials the IP in the request URI and, for `https`, runs the TLS handshake
/// against a fixed server name instead of that IP.
#[derive(Clone)]
pub struct HostPinnedConnector {
    http: HttpConnector,
    tls: TlsConnector,
    server_name: Option<ServerName<'static>>,
    handshake_timeout: Duration,
}

impl HostPinnedConnector {
    pub fn new(
        http: HttpConnector,
        tls: &TlsSettings,
        server_name: Option<ServerName<'static>>,
    ) -> Self {
        Self {
            http,
            tls: TlsConnector::from(tls.config().clone()),
            server_name,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Bounds the TLS handshake separately from the TCP dial.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    fn server_name_for(&self, uri: &Uri) -> Result<ServerName<'static>, BoxError> {
        if let Some(name) = &self.server_name {
            return Ok(name.clone());
        }
        let host = uri
            .host()
            .ok_or_else(|| format!("missing host in {uri}"))?
            .trim_start_matches('[')
            .trim_end_matches(']');
        Ok(ServerName::try_from(host.to_string())?)
    }
}

impl Service<Uri> for HostPinnedConnector {
    type Response = HostStream;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<HostStream, BoxError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.http.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let server_name = if uri.scheme() == Some(&Scheme::HTTPS) {
            Some(self.server_name_for(&uri))
        } else {
            None
        };
        let connecting = self.http.call(uri);
        let tls = self.tls.clone();
        let handshake_timeout = self.handshake_timeout;

        Box::pin(async move {
            let tcp = connecting.await?;
            let Some(server_name) = server_name else {
                return Ok(HostStream::Plain(tcp));
            };
            let server_name = server_name?;

            let peer = tcp.inner().peer_addr().ok();
            let handshake = tls.connect(server_name.clone(), tcp.into_inner());
            let stream = tokio::time::timeout(handshake_timeout, handshake)
                .await
                .map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("TLS handshake with {peer:?} timed out"),
                    )
                })??;
            debug!(peer = ?peer, server_name = ?server_name, "TLS connection established");
            Ok(HostStream::Tls(TokioIo::new(stream)))
        })
    }
}

/// A connection produced by [`HostPinnedConnector`].
pub enum HostStream {
    Plain(TokioIo<TcpStream>),
    Tls(TokioIo<TlsStream<TcpStream>>),
}

impl Connection for HostStream {
    fn connected(&self) -> Connected {
        match self {
            HostStream::Plain(stream) => stream.inner().connected(),
            HostStream::Tls(stream) => stream.inner().get_ref().0.connected(),
        }
    }
}

impl Read for HostStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            HostStream::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            HostStream::Tls(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl Write for HostStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            HostStream::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            HostStream::Tls(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            HostStream::Plain(stream) => Pin::new(stream).poll_flush(cx),
            HostStream::Tls(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            HostStream::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            HostStream::Tls(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }

    fn is_write_vectored(&self) -> bool {
        match self {
            HostStream::Plain(stream) => stream.is_write_vectored(),
            HostStream::Tls(stream) => stream.is_write_vectored(),
        }
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            HostStream::Plain(stream) => Pin::new(stream).poll_write_vectored(cx, bufs),
            HostStream::Tls(stream) => Pin::new(stream).poll_write_vectored(cx, bufs),
        }
    }
}
