//! The raw-dispatch seam between the call pipeline and the wire.
//!
//! Every transport, including caller-supplied ones, implements [`Transport`]
//! (or [`BlockingTransport`]): a single `unary` entry point taking the
//! request message and a [`CallContext`]. Service facades and the operations
//! client are generic over this trait, so adopting a custom transport is a
//! type parameter, not a runtime switch.
//!
//! ```ignore
//! struct LoopbackTransport;
//!
//! impl aiplatform::Transport for LoopbackTransport {
//!     fn unary<M: aiplatform::Method>(
//!         &self,
//!         _request: M::Request,
//!         _context: aiplatform::CallContext,
//!     ) -> Pin<Box<dyn Future<Output = aiplatform::Result<M::Response>> + Send + '_>> {
//!         Box::pin(async { Err(aiplatform::Error::config("loopback only")) })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::descriptor::Method;
use crate::errors::Result;
use crate::metadata::CallMetadata;

/// Everything the pipeline has decided about one attempt: the call metadata
/// to put on the wire and the deadline to propagate.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Ordered metadata, routing and auth headers included.
    pub metadata: CallMetadata,
    /// Attempt deadline, propagated to the server where the wire allows it.
    pub timeout: Option<Duration>,
}

impl CallContext {
    pub fn new(metadata: CallMetadata, timeout: Option<Duration>) -> Self {
        Self { metadata, timeout }
    }
}

/// Wire encoding a transport speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Proto,
    Json,
}

/// Registry entry describing one transport kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportKind {
    pub name: &'static str,
    pub wire: WireFormat,
    pub blocking: bool,
}

/// The transport kinds this crate can construct, keyed by name.
pub const TRANSPORT_REGISTRY: &[TransportKind] = &[
    TransportKind {
        name: "grpc",
        wire: WireFormat::Proto,
        blocking: false,
    },
    TransportKind {
        name: "grpc-blocking",
        wire: WireFormat::Proto,
        blocking: true,
    },
    TransportKind {
        name: "rest",
        wire: WireFormat::Json,
        blocking: false,
    },
    TransportKind {
        name: "rest-blocking",
        wire: WireFormat::Json,
        blocking: true,
    },
];

impl TransportKind {
    /// Looks a kind up by its registered name.
    pub fn from_name(name: &str) -> Option<&'static TransportKind> {
        TRANSPORT_REGISTRY.iter().find(|kind| kind.name == name)
    }
}

/// Cooperative-async dispatch.
pub trait Transport: Send + Sync + 'static {
    /// Dispatches one unary RPC and decodes the response.
    fn unary<M: Method>(
        &self,
        request: M::Request,
        context: CallContext,
    ) -> Pin<Box<dyn Future<Output = Result<M::Response>> + Send + '_>>;

    /// Registered kind name; caller-supplied transports report `custom`.
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// Releases transport resources. Dropping the transport has the same
    /// effect.
    fn close(&self) {}
}

/// Thread-blocking dispatch, same contract as [`Transport`].
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub trait BlockingTransport: Send + Sync + 'static {
    fn unary<M: Method>(&self, request: M::Request, context: CallContext) -> Result<M::Response>;

    fn kind(&self) -> &'static str {
        "custom"
    }

    fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_known_kinds() {
        let kind = TransportKind::from_name("grpc").unwrap();
        assert_eq!(kind.wire, WireFormat::Proto);
        assert!(!kind.blocking);

        let kind = TransportKind::from_name("rest-blocking").unwrap();
        assert_eq!(kind.wire, WireFormat::Json);
        assert!(kind.blocking);

        assert!(TransportKind::from_name("carrier-pigeon").is_none());
    }

    #[test]
    fn registry_names_are_unique() {
        for (i, kind) in TRANSPORT_REGISTRY.iter().enumerate() {
            assert!(
                TRANSPORT_REGISTRY[i + 1..]
                    .iter()
                    .all(|other| other.name != kind.name),
                "duplicate transport kind {}",
                kind.name
            );
        }
    }
}
