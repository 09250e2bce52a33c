//! Fire-and-forget auxiliary lookups.
//!
//! Each lookup runs as its own tokio task with a deadline. A newer request of
//! the same kind aborts the older task, and every finished task reports
//! through a channel. Failures arrive as "unavailable", never as errors.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::moon::MoonData;
use crate::protocol::AuxQuery;
use crate::request::Request;
use crate::source::{MoonSource, WeatherSource};
use crate::weather::WeatherStats;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxKind {
    Moon,
    Weather,
}

/// `None` means the provider failed, timed out, or had nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuxPayload {
    Moon(Option<MoonData>),
    Weather(Option<WeatherStats>),
}

impl AuxPayload {
    pub fn unavailable(kind: AuxKind) -> Self {
        match kind {
            AuxKind::Moon => AuxPayload::Moon(None),
            AuxKind::Weather => AuxPayload::Weather(None),
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            AuxPayload::Moon(data) => data.is_some(),
            AuxPayload::Weather(data) => data.is_some(),
        }
    }

    pub fn kind(&self) -> AuxKind {
        match self {
            AuxPayload::Moon(_) => AuxKind::Moon,
            AuxPayload::Weather(_) => AuxKind::Weather,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxUpdate {
    pub request: Request,
    pub key: String,
    pub payload: AuxPayload,
}

pub struct AuxDispatcher {
    moon: Arc<dyn MoonSource>,
    weather: Arc<dyn WeatherSource>,
    timeout: Duration,
    updates: mpsc::UnboundedSender<AuxUpdate>,
    in_flight: BTreeMap<AuxKind, (Request, JoinHandle<()>)>,
    last_request: Request,
}

impl AuxDispatcher {
    pub fn new(
        moon: Arc<dyn MoonSource>,
        weather: Arc<dyn WeatherSource>,
        timeout: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<AuxUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            moon,
            weather,
            timeout,
            updates: tx,
            in_flight: BTreeMap::new(),
            last_request: Request(0),
        };
        (dispatcher, rx)
    }

    /// Start moon and weather lookups for `query`, superseding older ones.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, query: AuxQuery, reference_year: i32) -> Request {
        self.last_request = self.last_request.next();
        let request = self.last_request;
        let key = query.key();
        debug!(request = request.0, %key, "aux lookups started");

        let moon = Arc::clone(&self.moon);
        let moon_task = self.spawn(AuxKind::Moon, request, key.clone(), async move {
            AuxPayload::Moon(settle("moon", moon.moon_data(query).await))
        });
        self.replace(AuxKind::Moon, request, moon_task);

        let weather = Arc::clone(&self.weather);
        let weather_task = self.spawn(AuxKind::Weather, request, key, async move {
            AuxPayload::Weather(settle("weather", weather.weather_stats(query, reference_year).await))
        });
        self.replace(AuxKind::Weather, request, weather_task);

        request
    }

    /// Abort everything still running. Returns how many tasks were aborted.
    pub fn cancel_all(&mut self) -> usize {
        let mut aborted = 0;
        for (_, (_, handle)) in std::mem::take(&mut self.in_flight) {
            if !handle.is_finished() {
                handle.abort();
                aborted += 1;
            }
        }
        aborted
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.values().filter(|(_, h)| !h.is_finished()).count()
    }

    pub fn last_request(&self) -> Request {
        self.last_request
    }

    fn replace(&mut self, kind: AuxKind, request: Request, handle: JoinHandle<()>) {
        if let Some((old, previous)) = self.in_flight.insert(kind, (request, handle)) {
            if !previous.is_finished() {
                debug!(request = old.0, ?kind, "superseded aux lookup aborted");
                previous.abort();
            }
        }
    }

    fn spawn<F>(&self, kind: AuxKind, request: Request, key: String, work: F) -> JoinHandle<()>
    where
        F: std::future::Future<Output = AuxPayload> + Send + 'static,
    {
        let tx = self.updates.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let payload = match tokio::time::timeout(timeout, work).await {
                Ok(payload) => payload,
                Err(_) => {
                    let err = FetchError::Timeout(timeout.as_millis() as u64);
                    warn!(request = request.0, %key, ?kind, "aux lookup abandoned: {err}");
                    AuxPayload::unavailable(kind)
                }
            };
            // Receiver gone means nobody is interested any more.
            let _ = tx.send(AuxUpdate { request, key, payload });
        })
    }
}

fn settle<T, E: std::fmt::Display>(what: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{what} lookup unavailable: {err}");
            None
        }
    }
}

impl Drop for AuxDispatcher {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;
    use foundation::GeoPoint;

    use super::{AuxDispatcher, AuxKind, AuxPayload, AuxUpdate};
    use crate::error::FetchError;
    use crate::moon::{MoonData, MoonInfo};
    use crate::protocol::AuxQuery;
    use crate::request::Request;
    use crate::source::{BoxFuture, MoonSource, WeatherSource};
    use crate::weather::WeatherStats;

    /// Answers after `delay`; a query at latitude 0 fails.
    struct FakeMoon {
        delay: Duration,
    }

    impl MoonSource for FakeMoon {
        fn moon_data(&self, query: AuxQuery) -> BoxFuture<'_, Result<MoonData, FetchError>> {
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                if query.point.lat == 0.0 {
                    return Err(FetchError::Status(503));
                }
                Ok(MoonData {
                    moon: MoonInfo {
                        phase_name: "New Moon".into(),
                        ..MoonInfo::default()
                    },
                    ..MoonData::default()
                })
            })
        }
    }

    struct FakeWeather {
        delay: Duration,
    }

    impl WeatherSource for FakeWeather {
        fn weather_stats(&self, _query: AuxQuery, _reference_year: i32) -> BoxFuture<'_, Result<WeatherStats, FetchError>> {
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                Ok(WeatherStats::default())
            })
        }
    }

    fn query(lat: f64) -> AuxQuery {
        AuxQuery::new(GeoPoint::new(lat, -3.0), NaiveDate::from_ymd_opt(2026, 8, 12).unwrap(), 20)
    }

    fn dispatcher(moon_delay_ms: u64, timeout_ms: u64) -> (AuxDispatcher, tokio::sync::mpsc::UnboundedReceiver<AuxUpdate>) {
        AuxDispatcher::new(
            Arc::new(FakeMoon {
                delay: Duration::from_millis(moon_delay_ms),
            }),
            Arc::new(FakeWeather {
                delay: Duration::from_millis(1),
            }),
            Duration::from_millis(timeout_ms),
        )
    }

    async fn recv(rx: &mut tokio::sync::mpsc::UnboundedReceiver<AuxUpdate>) -> AuxUpdate {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("update in time")
            .expect("channel open")
    }

    #[tokio::test]
    async fn both_lookups_report_back() {
        let (mut d, mut rx) = dispatcher(1, 1_000);
        let req = d.request(query(43.0), 2026);
        assert_eq!(req, Request(1));

        let mut kinds = vec![recv(&mut rx).await, recv(&mut rx).await];
        kinds.sort_by_key(|u| u.payload.kind());
        assert!(kinds.iter().all(|u| u.request == req && u.payload.is_available()));
        assert_eq!(kinds[0].payload.kind(), AuxKind::Moon);
        assert_eq!(kinds[1].payload.kind(), AuxKind::Weather);
    }

    #[tokio::test]
    async fn failures_arrive_as_unavailable() {
        let (mut d, mut rx) = dispatcher(1, 1_000);
        d.request(query(0.0), 2026);
        let mut updates = vec![recv(&mut rx).await, recv(&mut rx).await];
        updates.sort_by_key(|u| u.payload.kind());
        assert_eq!(updates[0].payload, AuxPayload::Moon(None));
        assert!(updates[1].payload.is_available());
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let (mut d, mut rx) = dispatcher(10_000, 50);
        d.request(query(43.0), 2026);
        let mut updates = vec![recv(&mut rx).await, recv(&mut rx).await];
        updates.sort_by_key(|u| u.payload.kind());
        assert_eq!(updates[0].payload, AuxPayload::unavailable(AuxKind::Moon));
    }

    #[tokio::test]
    async fn newer_request_supersedes_older() {
        let (mut d, mut rx) = dispatcher(200, 5_000);
        let first = d.request(query(43.0), 2026);
        let second = d.request(query(42.0), 2026);
        assert!(second > first);

        let mut moon_requests = Vec::new();
        while moon_requests.is_empty() {
            let update = recv(&mut rx).await;
            if update.payload.kind() == AuxKind::Moon {
                moon_requests.push(update.request);
            }
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
        while let Ok(update) = rx.try_recv() {
            if update.payload.kind() == AuxKind::Moon {
                moon_requests.push(update.request);
            }
        }
        assert_eq!(moon_requests, vec![second]);
    }

    #[tokio::test]
    async fn cancel_all_aborts_running_tasks() {
        let (mut d, mut rx) = dispatcher(10_000, 60_000);
        d.request(query(43.0), 2026);
        // Weather answers almost immediately; moon is still sleeping.
        let first = recv(&mut rx).await;
        assert_eq!(first.payload.kind(), AuxKind::Weather);
        assert!(d.cancel_all() >= 1);
        assert_eq!(d.in_flight(), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
