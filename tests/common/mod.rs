//! Test doubles shared by the integration specs.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use onenote_import::auth::{AuthError, AuthProvider, Token};
use onenote_import::graph::PageStore;
use onenote_import::models::{ItemError, RemotePageRef};

/// One recorded `create_page` call.
#[derive(Debug, Clone)]
pub struct Call {
    pub title: String,
    pub parent_id: Option<String>,
    pub token: String,
}

/// In-memory page store with scripted per-title failures.
#[derive(Default)]
pub struct FakeStore {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<String, VecDeque<ItemError>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next attempts at `title` fail with `errors`, in order.
    pub fn fail(&self, title: &str, errors: Vec<ItemError>) {
        self.failures
            .lock()
            .unwrap()
            .insert(title.to_string(), errors.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.title).collect()
    }
}

#[async_trait]
impl PageStore for FakeStore {
    async fn create_page(
        &self,
        token: &Token,
        parent: Option<&RemotePageRef>,
        title: &str,
        _content: &str,
    ) -> Result<RemotePageRef, ItemError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                title: title.to_string(),
                parent_id: parent.map(|p| p.id.clone()),
                token: token.bearer().to_string(),
            });
            calls.len()
        };

        if let Some(queue) = self.failures.lock().unwrap().get_mut(title) {
            if let Some(err) = queue.pop_front() {
                return Err(err);
            }
        }

        Ok(RemotePageRef {
            id: format!("page-{}", n),
            title: title.to_string(),
            web_url: None,
        })
    }
}

/// Auth provider handing out numbered tokens.
#[derive(Default)]
pub struct FakeAuth {
    pub silent_calls: AtomicUsize,
    pub interactive_calls: AtomicUsize,
    pub fail_interactive: bool,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_interactive() -> Self {
        Self {
            fail_interactive: true,
            ..Self::default()
        }
    }

    pub fn interactive(&self) -> usize {
        self.interactive_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn get_token(&self, force_interactive: bool) -> Result<Token, AuthError> {
        if force_interactive {
            if self.fail_interactive {
                return Err(AuthError::Denied("user cancelled".into()));
            }
            let n = self.interactive_calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Token::new(format!("fresh-{}", n), 3600))
        } else {
            self.silent_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Token::new("cached", 3600))
        }
    }
}

pub fn token() -> Token {
    Token::new("cached", 3600)
}

pub const SAMPLE: &str = "\
COURSE: Rust Fundamentals
=========================

1. Week 1
   1.1. Ownership
   1.2. Borrowing
2. Week 2
   2.1. Traits
";
