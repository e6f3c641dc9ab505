#![allow(dead_code)]

use async_trait::async_trait;
use bucketwire_application::ports::{
    empty_body, AddressCache, AddressSelector, HostTransport, IpResolver, RequestBody,
    ResponseBody, RoundTrip, TransportRegistry,
};
use bucketwire_domain::{BoxError, LookupError, TransportError};
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body::{Body, Frame};
use http_body_util::BodyExt;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

// ── resolver ───────────────────────────────────────────────────────────────

pub struct MockIpResolver {
    responses: Mutex<HashMap<String, Result<Vec<IpAddr>, LookupError>>>,
    call_count: AtomicU64,
}

impl MockIpResolver {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            call_count: AtomicU64::new(0),
        }
    }

    pub fn set_response(&self, host: &str, ips: &[&str]) {
        let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.responses
            .lock()
            .unwrap()
            .insert(host.to_string(), Ok(ips));
    }

    pub fn set_error(&self, host: &str, error: LookupError) {
        self.responses
            .lock()
            .unwrap()
            .insert(host.to_string(), Err(error));
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl IpResolver for MockIpResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, LookupError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.responses
            .lock()
            .unwrap()
            .get(host)
            .cloned()
            .unwrap_or_else(|| Err(LookupError::Failed(format!("no such host {}", host))))
    }
}

// ── cache ──────────────────────────────────────────────────────────────────

pub struct MockAddressCache {
    entries: Mutex<HashMap<String, HashSet<IpAddr>>>,
}

impl MockAddressCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn seed(&self, host: &str, ips: &[&str]) {
        let ips = ips.iter().map(|ip| ip.parse::<IpAddr>().unwrap());
        self.entries
            .lock()
            .unwrap()
            .entry(host.to_string())
            .or_default()
            .extend(ips);
    }

    pub fn contains(&self, host: &str) -> bool {
        self.entries.lock().unwrap().contains_key(host)
    }
}

impl AddressCache for MockAddressCache {
    fn add_and_get(&self, host: &str, addresses: &[IpAddr]) -> Vec<IpAddr> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.entry(host.to_string()).or_default();
        entry.extend(addresses.iter().copied());
        let mut all: Vec<IpAddr> = entry.iter().copied().collect();
        all.sort();
        all
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

// ── selector ───────────────────────────────────────────────────────────────

/// Always picks the last address, so tests can tell cached addresses from
/// freshly resolved ones.
pub struct LastAddressSelector {
    seen: Mutex<Vec<Vec<IpAddr>>>,
}

impl LastAddressSelector {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<Vec<IpAddr>> {
        self.seen.lock().unwrap().clone()
    }
}

impl AddressSelector for LastAddressSelector {
    fn select(&self, addresses: &[IpAddr]) -> Option<IpAddr> {
        self.seen.lock().unwrap().push(addresses.to_vec());
        addresses.last().copied()
    }

    fn name(&self) -> &'static str {
        "last"
    }
}

// ── transports ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub uri: String,
    pub host_header: Option<String>,
    pub method: http::Method,
}

pub struct RecordingTransport {
    server_name: Option<String>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    fail_with: Option<std::io::ErrorKind>,
}

impl RecordingTransport {
    pub fn new(requests: Arc<Mutex<Vec<RecordedRequest>>>) -> Self {
        Self {
            server_name: None,
            requests,
            fail_with: None,
        }
    }

    pub fn failing(requests: Arc<Mutex<Vec<RecordedRequest>>>, kind: std::io::ErrorKind) -> Self {
        Self {
            fail_with: Some(kind),
            ..Self::new(requests)
        }
    }
}

#[async_trait]
impl RoundTrip for RecordingTransport {
    async fn round_trip(
        &self,
        request: Request<RequestBody>,
    ) -> Result<Response<ResponseBody>, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            uri: request.uri().to_string(),
            host_header: request
                .headers()
                .get(http::header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            method: request.method().clone(),
        });

        if let Some(kind) = self.fail_with {
            return Err(TransportError::exchange(std::io::Error::new(
                kind,
                "simulated transport failure",
            )));
        }

        let mut response = Response::new(empty_body());
        *response.status_mut() = StatusCode::OK;
        Ok(response)
    }
}

impl HostTransport for RecordingTransport {
    fn tls_server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    fn set_tls_server_name(&mut self, host: &str) -> Result<(), TransportError> {
        self.server_name = Some(host.to_string());
        Ok(())
    }
}

pub struct MockTransportRegistry {
    transports: Mutex<HashMap<String, Arc<dyn HostTransport>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    created: AtomicU64,
    fail_exchange: Option<std::io::ErrorKind>,
}

impl MockTransportRegistry {
    pub fn new() -> Self {
        Self {
            transports: Mutex::new(HashMap::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
            created: AtomicU64::new(0),
            fail_exchange: None,
        }
    }

    pub fn failing(kind: std::io::ErrorKind) -> Self {
        Self {
            fail_exchange: Some(kind),
            ..Self::new()
        }
    }

    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn server_name_for(&self, host: &str) -> Option<String> {
        self.transports
            .lock()
            .unwrap()
            .get(host)
            .and_then(|t| t.tls_server_name().map(str::to_string))
    }
}

impl TransportRegistry for MockTransportRegistry {
    fn transport_for(&self, host: &str) -> Result<Arc<dyn HostTransport>, TransportError> {
        let mut transports = self.transports.lock().unwrap();
        if let Some(existing) = transports.get(host) {
            return Ok(Arc::clone(existing));
        }

        let mut transport = match self.fail_exchange {
            Some(kind) => RecordingTransport::failing(Arc::clone(&self.requests), kind),
            None => RecordingTransport::new(Arc::clone(&self.requests)),
        };
        transport.set_tls_server_name(host)?;
        self.created.fetch_add(1, Ordering::Relaxed);

        let transport: Arc<dyn HostTransport> = Arc::new(transport);
        transports.insert(host.to_string(), Arc::clone(&transport));
        Ok(transport)
    }

    fn len(&self) -> usize {
        self.transports.lock().unwrap().len()
    }
}

// ── bodies ─────────────────────────────────────────────────────────────────

/// Body that flags itself as released once dropped.
pub struct TrackedBody {
    data: Option<Bytes>,
    released: Arc<AtomicBool>,
}

impl TrackedBody {
    pub fn new(data: &'static [u8]) -> (RequestBody, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let body = Self {
            data: Some(Bytes::from_static(data)),
            released: Arc::clone(&released),
        };
        (body.boxed(), released)
    }
}

impl Body for TrackedBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.data.take().map(|data| Ok(Frame::data(data))))
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_none()
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

pub fn get(uri: &str) -> Request<RequestBody> {
    Request::builder().uri(uri).body(empty_body()).unwrap()
}

pub fn put(uri: &str, body: RequestBody) -> Request<RequestBody> {
    Request::builder()
        .method(http::Method::PUT)
        .uri(uri)
        .body(body)
        .unwrap()
}
