//! BoxProviderCall -- object-safe dynamic dispatch wrapper for ProviderCall.
//!
//! 1. `ProviderCallDyn` is the object-safe twin of [`ProviderCall`] with a boxed future
//! 2. Blanket-impl `ProviderCallDyn` for all `T: ProviderCall`
//! 3. `BoxProviderCall` wraps `Box<dyn ProviderCallDyn>` and is itself a `ProviderCall`

use std::future::Future;
use std::pin::Pin;

use askrelay_types::provider::{ProviderError, ProviderResponse};
use askrelay_types::question::Question;

use super::call::ProviderCall;

type CallFuture<'a> = Pin<Box<dyn Future<Output = Result<ProviderResponse, ProviderError>> + Send + 'a>>;

/// Object-safe version of [`ProviderCall`].
pub trait ProviderCallDyn: Send + Sync {
    fn name(&self) -> &str;

    fn call_boxed<'a>(&'a self, question: &'a Question) -> CallFuture<'a>;
}

impl<T: ProviderCall> ProviderCallDyn for T {
    fn name(&self) -> &str {
        ProviderCall::name(self)
    }

    fn call_boxed<'a>(&'a self, question: &'a Question) -> CallFuture<'a> {
        Box::pin(self.call(question))
    }
}

/// Type-erased provider, chosen at startup from configuration.
pub struct BoxProviderCall {
    inner: Box<dyn ProviderCallDyn>,
}

impl BoxProviderCall {
    pub fn new<T: ProviderCall + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl ProviderCall for BoxProviderCall {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, question: &Question) -> Result<ProviderResponse, ProviderError> {
        self.inner.call_boxed(question).await
    }
}
