//! Typed request/response interceptors, dispatched per method.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::descriptor::Method;
use crate::metadata::CallMetadata;

type Hook = Box<dyn Fn(&mut dyn Any, &mut CallMetadata) + Send + Sync>;

#[derive(Default)]
struct MethodHooks {
    pre: Vec<Hook>,
    post: Vec<Hook>,
}

/// Interceptor registry, populated while building the client and frozen for
/// its lifetime once construction finishes.
///
/// Hooks are registered per method. Request hooks run in registration order
/// before dispatch (before routing headers are derived, so a hook that edits
/// a resource name changes where the call routes); response hooks run in
/// reverse registration order, so the first-registered interceptor wraps the
/// call outermost.
#[derive(Default)]
pub struct Interceptors {
    hooks: HashMap<&'static str, MethodHooks>,
}

impl Interceptors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook that may inspect or mutate `M` requests and the
    /// outgoing call metadata.
    pub fn on_request<M, F>(&mut self, hook: F)
    where
        M: Method,
        F: Fn(&mut M::Request, &mut CallMetadata) + Send + Sync + 'static,
    {
        self.hooks
            .entry(M::DESCRIPTOR.name)
            .or_default()
            .pre
            .push(Box::new(move |message, metadata| {
                if let Some(request) = message.downcast_mut::<M::Request>() {
                    hook(request, metadata);
                }
            }));
    }

    /// Registers a hook that may inspect or mutate `M` responses.
    pub fn on_response<M, F>(&mut self, hook: F)
    where
        M: Method,
        F: Fn(&mut M::Response, &mut CallMetadata) + Send + Sync + 'static,
    {
        self.hooks
            .entry(M::DESCRIPTOR.name)
            .or_default()
            .post
            .push(Box::new(move |message, metadata| {
                if let Some(response) = message.downcast_mut::<M::Response>() {
                    hook(response, metadata);
                }
            }));
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn run_pre<M: Method>(
        &self,
        request: &mut M::Request,
        metadata: &mut CallMetadata,
    ) {
        if let Some(hooks) = self.hooks.get(M::DESCRIPTOR.name) {
            for hook in &hooks.pre {
                hook(request, metadata);
            }
        }
    }

    pub(crate) fn run_post<M: Method>(
        &self,
        response: &mut M::Response,
        metadata: &mut CallMetadata,
    ) {
        if let Some(hooks) = self.hooks.get(M::DESCRIPTOR.name) {
            for hook in hooks.post.iter().rev() {
                hook(response, metadata);
            }
        }
    }
}

impl fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptors")
            .field("methods", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::methods::{GetModel, ListModels};
    use crate::types::{GetModelRequest, Model};

    #[test]
    fn request_hooks_run_in_registration_order() {
        let mut interceptors = Interceptors::new();
        interceptors.on_request::<GetModel, _>(|request, _| request.name.push('a'));
        interceptors.on_request::<GetModel, _>(|request, _| request.name.push('b'));

        let mut request = GetModelRequest::default();
        let mut metadata = CallMetadata::new();
        interceptors.run_pre::<GetModel>(&mut request, &mut metadata);
        assert_eq!(request.name, "ab");
    }

    #[test]
    fn response_hooks_run_in_reverse_order() {
        let mut interceptors = Interceptors::new();
        interceptors.on_response::<GetModel, _>(|response, _| response.etag.push('a'));
        interceptors.on_response::<GetModel, _>(|response, _| response.etag.push('b'));

        let mut response = Model::default();
        let mut metadata = CallMetadata::new();
        interceptors.run_post::<GetModel>(&mut response, &mut metadata);
        assert_eq!(response.etag, "ba");
    }

    #[test]
    fn hooks_fire_only_for_their_method() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let mut interceptors = Interceptors::new();
        interceptors.on_request::<ListModels, _>(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let mut request = GetModelRequest::default();
        let mut metadata = CallMetadata::new();
        interceptors.run_pre::<GetModel>(&mut request, &mut metadata);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn hooks_may_append_metadata() {
        let mut interceptors = Interceptors::new();
        interceptors.on_request::<GetModel, _>(|_, metadata| {
            metadata.push("x-request-tag", "audit");
        });

        let mut request = GetModelRequest::default();
        let mut metadata = CallMetadata::new();
        interceptors.run_pre::<GetModel>(&mut request, &mut metadata);
        assert_eq!(metadata.get("x-request-tag"), Some("audit"));
    }
}
