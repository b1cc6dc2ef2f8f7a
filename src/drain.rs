use reqwest::{Body, Response};

/// Reads and discards body chunks until end of stream or until at least
/// `limit` bytes were read. Returns the number of bytes discarded.
///
/// Reading a short body to the end hands its connection back to the pool;
/// [`release_body`] then drops whatever is left.
pub(crate) async fn drain_body(response: &mut Response, limit: u64) -> reqwest::Result<u64> {
    let mut drained = 0u64;
    while drained < limit {
        match response.chunk().await? {
            Some(chunk) => drained += chunk.len() as u64,
            None => break,
        }
    }
    Ok(drained)
}

/// Drops the body of `response`, keeping status, version, headers and
/// extensions on an empty replacement body.
pub(crate) fn release_body(response: Response) -> Response {
    let (parts, body) = http::Response::<Body>::from(response).into_parts();
    drop(body);
    Response::from(http::Response::from_parts(parts, Body::from(Vec::new())))
}
