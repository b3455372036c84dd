//! In-memory calendar and token fakes that record every call.
//!
//! Compiled for this crate's tests and, with the `testing` feature, for
//! downstream crates' tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use anyhow::{Result, anyhow};

use crate::remote::{CalendarApi, EventQuery, NewEvent, RemoteEvent, TokenSource};

#[derive(Default)]
pub struct FakeCalendar {
    events: Vec<RemoteEvent>,
    list_error: Option<String>,
    failing_inserts: HashSet<String>,
    failing_deletes: HashSet<String>,
    list_calls: Cell<usize>,
    queries: RefCell<Vec<EventQuery>>,
    inserted: RefCell<Vec<NewEvent>>,
    delete_attempts: RefCell<Vec<String>>,
    deleted: RefCell<Vec<String>>,
}

impl FakeCalendar {
    pub fn with_events(events: Vec<RemoteEvent>) -> Self {
        FakeCalendar {
            events,
            ..Default::default()
        }
    }

    pub fn failing_list(message: &str) -> Self {
        FakeCalendar {
            list_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Make inserts titled `summary` fail with "API Error".
    pub fn fail_insert_of(mut self, summary: &str) -> Self {
        self.failing_inserts.insert(summary.to_string());
        self
    }

    /// Make deletes of `id` fail with "API Error".
    pub fn fail_delete_of(mut self, id: &str) -> Self {
        self.failing_deletes.insert(id.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn queries(&self) -> Vec<EventQuery> {
        self.queries.borrow().clone()
    }

    pub fn inserted(&self) -> Vec<NewEvent> {
        self.inserted.borrow().clone()
    }

    pub fn delete_attempts(&self) -> Vec<String> {
        self.delete_attempts.borrow().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }
}

impl CalendarApi for FakeCalendar {
    async fn list_events(&self, _calendar_id: &str, query: &EventQuery) -> Result<Vec<RemoteEvent>> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.queries.borrow_mut().push(query.clone());

        match &self.list_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.events.clone()),
        }
    }

    async fn insert_event(&self, _calendar_id: &str, event: &NewEvent) -> Result<RemoteEvent> {
        if self.failing_inserts.contains(&event.summary) {
            return Err(anyhow!("API Error"));
        }

        let mut inserted = self.inserted.borrow_mut();
        inserted.push(event.clone());

        Ok(RemoteEvent {
            id: format!("created-{}", inserted.len()),
            title: event.summary.clone(),
            series_id: None,
        })
    }

    async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> Result<()> {
        self.delete_attempts.borrow_mut().push(event_id.to_string());

        if self.failing_deletes.contains(event_id) {
            return Err(anyhow!("API Error"));
        }

        self.deleted.borrow_mut().push(event_id.to_string());
        Ok(())
    }
}

pub struct FakeTokens {
    token: String,
    requests: Cell<usize>,
}

impl FakeTokens {
    pub fn new(token: &str) -> Self {
        FakeTokens {
            token: token.to_string(),
            requests: Cell::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl TokenSource for FakeTokens {
    async fn access_token(&self) -> Result<String> {
        self.requests.set(self.requests.get() + 1);
        Ok(self.token.clone())
    }
}
