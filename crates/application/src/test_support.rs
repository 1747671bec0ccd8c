//! Scripted exchanger shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ycs3_domain::{ExchangeError, LongLivedCredential, TokenValue};

use crate::ports::CredentialExchanger;

/// Returns scripted results in order, then numbered tokens `T<n>`.
#[derive(Debug, Default)]
pub struct ScriptedExchanger {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Result<TokenValue, ExchangeError>>>,
    delay: Option<Duration>,
}

impl ScriptedExchanger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn then(self, result: Result<TokenValue, ExchangeError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialExchanger for ScriptedExchanger {
    async fn exchange(&self, _secret: &LongLivedCredential) -> Result<TokenValue, ExchangeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(TokenValue::new(format!("T{call}"))))
    }
}
