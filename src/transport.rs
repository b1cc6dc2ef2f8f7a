use std::{future::Future, pin::Pin, sync::Arc};

use reqwest::{Request, Response};

use crate::{Result, RetryError};

/// Boxed future returned by the pluggable collaborators.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Performs one request/response exchange.
///
/// `send` may be called any number of times with the same request. The
/// request is borrowed, never mutated.
pub trait Transport: Send + Sync {
    fn send<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Response>>;
}

/// Sends a copy of the request through the client's connection pool.
///
/// Every attempt, the first included, sends a copy. Requests with streaming
/// bodies cannot be copied and fail with [`RetryError::UnreplayableRequest`]
/// without being sent.
impl Transport for reqwest::Client {
    fn send<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let request = request
                .try_clone()
                .ok_or(RetryError::UnreplayableRequest)?;
            Ok(self.execute(request).await?)
        })
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Response>> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Response>> {
        (**self).send(request)
    }
}
