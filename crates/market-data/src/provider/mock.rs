//! Canned transport and clock shared by the adapter tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::clock::Clock;
use crate::errors::MarketDataError;
use crate::provider::{FetchRequest, FetchResponse, HttpTransport};

/// One scripted upstream outcome.
pub(crate) enum MockReply {
    Body(u16, String),
    Timeout,
}

#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, value: serde_json::Value) {
        self.push(MockReply::Body(200, value.to_string()));
    }

    pub(crate) fn push(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse, MarketDataError> {
        let provider = request.provider;
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Body(status, body)) => Ok(FetchResponse { status, body }),
            Some(MockReply::Timeout) | None => Err(MarketDataError::Timeout {
                provider: provider.to_string(),
            }),
        }
    }
}

pub(crate) struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub(crate) fn at_fixture_time() -> Self {
        Self(fixture_time())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Moves forward one second on every read.
pub(crate) struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub(crate) fn starting_at(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.0.lock().unwrap();
        let now = *current;
        *current = now + Duration::seconds(1);
        now
    }
}

pub(crate) fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
}
