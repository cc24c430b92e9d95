//! Retrying wrapper around any [`ModelCaller`].

use std::sync::Arc;

use async_trait::async_trait;

use super::{CallRequest, CallResponse, ModelCaller};
use crate::error::Result;
use crate::schema::Schema;
use crate::types::CallOptions;
use crate::util::RetryPolicy;

/// Retries retryable caller errors according to a [`RetryPolicy`].
#[derive(Clone)]
pub struct RetryingCaller {
    inner: Arc<dyn ModelCaller>,
    policy: RetryPolicy,
}

impl RetryingCaller {
    pub fn new(inner: Arc<dyn ModelCaller>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl ModelCaller for RetryingCaller {
    async fn call(
        &self,
        request: &CallRequest,
        options: &CallOptions,
        output: Option<&Schema>,
    ) -> Result<CallResponse> {
        self.policy
            .execute(|| self.inner.call(request, options, output))
            .await
    }
}

impl std::fmt::Debug for RetryingCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingCaller")
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgenticError;
    use crate::types::AssistantMessage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModelCaller for Flaky {
        async fn call(
            &self,
            _request: &CallRequest,
            _options: &CallOptions,
            _output: Option<&Schema>,
        ) -> Result<CallResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(AgenticError::RateLimited {
                    retry_after_ms: None,
                });
            }
            Ok(CallResponse {
                id: format!("resp-{n}"),
                message: AssistantMessage::text("ok"),
                ..Default::default()
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_from_transient_failures() {
        let inner = Arc::new(Flaky {
            failures: 2,
            calls: AtomicUsize::new(0),
        });
        let caller = RetryingCaller::new(inner.clone(), RetryPolicy::new(3, Duration::from_millis(50)));

        let response = caller
            .call(&CallRequest::default(), &CallOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(response.id, "resp-2");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn surfaces_error_when_budget_is_spent() {
        let inner = Arc::new(Flaky {
            failures: 5,
            calls: AtomicUsize::new(0),
        });
        let caller = RetryingCaller::new(inner.clone(), RetryPolicy::new(2, Duration::from_millis(50)));

        let err = caller
            .call(&CallRequest::default(), &CallOptions::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AgenticError::RateLimited { .. }));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
