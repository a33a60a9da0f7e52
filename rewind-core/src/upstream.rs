use std::future::Future;

/// Trait for the transport a round trip is forwarded to on a cache miss.
///
/// This is the "send one request, get one response or error" capability the
/// cache wraps. It is framework-agnostic: `rewind-tower` implements it for any
/// Tower service and `rewind-reqwest` for the rest of a reqwest middleware chain.
///
/// # Examples
///
/// ```rust,ignore
/// use rewind_core::Upstream;
/// use std::future::Ready;
///
/// struct StaticUpstream {
///     response: MyResponse,
/// }
///
/// impl Upstream<MyRequest> for StaticUpstream {
///     type Response = MyResponse;
///     type Future = Ready<Self::Response>;
///
///     fn call(&mut self, _req: MyRequest) -> Self::Future {
///         std::future::ready(self.response.clone())
///     }
/// }
/// ```
pub trait Upstream<Req> {
    /// The response type returned by the transport, usually a `Result`.
    type Response;

    /// The future that resolves to the response
    type Future: Future<Output = Self::Response> + Send;

    /// Send the request to the transport.
    fn call(&mut self, req: Req) -> Self::Future;
}
