//! Binary transport over a tonic channel.
//!
//! One lazily-connected [`Channel`] per transport; each call clones it (the
//! clone shares the underlying connection) and dispatches through
//! [`tonic::client::Grpc`] with a codec that speaks [`ApiMessage`] rather
//! than generated stubs, so every method in the descriptor table goes
//! through the same path.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use bytes::{Buf, BufMut};
use tonic::transport::{Channel, ClientTlsConfig, Identity};

use crate::config::ResolvedConfig;
use crate::descriptor::Method;
use crate::endpoint::Scheme;
use crate::errors::{Error, Result, TransportError, TransportErrorKind};
use crate::metadata::CallMetadata;
use crate::status::error_from_tonic;
use crate::transport::{CallContext, Transport};
use crate::types::ApiMessage;

/// gRPC transport; the cooperative-async half of the binary pair.
#[derive(Clone)]
pub struct GrpcTransport {
    channel: Channel,
}

impl GrpcTransport {
    pub(crate) fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let mut endpoint = Channel::from_shared(config.endpoint.url())
            .map_err(|e| Error::config(format!("invalid endpoint: {e}")))?;
        if config.endpoint.scheme == Scheme::Https {
            let mut tls = ClientTlsConfig::new().with_enabled_roots();
            if config.use_client_cert {
                if let Some(source) = config.credentials.certificate_source() {
                    let identity = source.client_identity()?;
                    tls = tls.identity(Identity::from_pem(identity.cert_pem, identity.key_pem));
                }
            }
            endpoint = endpoint.tls_config(tls).map_err(|e| {
                TransportError::new(TransportErrorKind::Tls, "cannot configure TLS").with_source(e)
            })?;
        }
        Ok(Self {
            channel: endpoint.connect_lazy(),
        })
    }
}

impl Transport for GrpcTransport {
    fn unary<M: Method>(
        &self,
        request: M::Request,
        context: CallContext,
    ) -> Pin<Box<dyn Future<Output = Result<M::Response>> + Send + '_>> {
        Box::pin(async move {
            let mut grpc = tonic::client::Grpc::new(self.channel.clone());
            grpc.ready().await.map_err(|e| {
                TransportError::new(TransportErrorKind::Connect, "channel is not ready")
                    .with_source(e)
            })?;
            let mut wire_request = tonic::Request::new(request);
            write_metadata(wire_request.metadata_mut(), &context.metadata)?;
            if let Some(timeout) = context.timeout {
                wire_request.set_timeout(timeout);
            }
            let path = http::uri::PathAndQuery::from_static(M::DESCRIPTOR.grpc_path);
            let codec = ApiCodec::<M::Request, M::Response>::default();
            let response = grpc
                .unary(wire_request, path, codec)
                .await
                .map_err(error_from_tonic)?;
            Ok(response.into_inner())
        })
    }

    fn kind(&self) -> &'static str {
        "grpc"
    }
}

impl std::fmt::Debug for GrpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcTransport").finish_non_exhaustive()
    }
}

/// Copies call metadata into the outgoing header frame, keeping order and
/// duplicates.
fn write_metadata(map: &mut tonic::metadata::MetadataMap, metadata: &CallMetadata) -> Result<()> {
    for entry in metadata {
        let key = tonic::metadata::MetadataKey::from_bytes(entry.key.as_bytes())
            .map_err(|_| Error::validation("invalid metadata key", &entry.key))?;
        let value = tonic::metadata::MetadataValue::try_from(entry.value.as_str())
            .map_err(|_| Error::validation("invalid metadata value", &entry.key))?;
        map.append(key, value);
    }
    Ok(())
}

/// Codec bridging tonic and [`ApiMessage`], one instance per call.
pub(crate) struct ApiCodec<Req, Resp> {
    _marker: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> Default for ApiCodec<Req, Resp> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<Req, Resp> tonic::codec::Codec for ApiCodec<Req, Resp>
where
    Req: ApiMessage,
    Resp: ApiMessage,
{
    type Encode = Req;
    type Decode = Resp;
    type Encoder = ApiEncoder<Req>;
    type Decoder = ApiDecoder<Resp>;

    fn encoder(&mut self) -> Self::Encoder {
        ApiEncoder(PhantomData)
    }

    fn decoder(&mut self) -> Self::Decoder {
        ApiDecoder(PhantomData)
    }
}

pub(crate) struct ApiEncoder<T>(PhantomData<fn(T)>);

impl<T: ApiMessage> tonic::codec::Encoder for ApiEncoder<T> {
    type Item = T;
    type Error = tonic::Status;

    fn encode(
        &mut self,
        item: T,
        dst: &mut tonic::codec::EncodeBuf<'_>,
    ) -> std::result::Result<(), Self::Error> {
        let bytes = item
            .encode_proto()
            .map_err(|e| tonic::Status::internal(e.to_string()))?;
        dst.put_slice(&bytes);
        Ok(())
    }
}

pub(crate) struct ApiDecoder<T>(PhantomData<fn() -> T>);

impl<T: ApiMessage> tonic::codec::Decoder for ApiDecoder<T> {
    type Item = T;
    type Error = tonic::Status;

    fn decode(
        &mut self,
        src: &mut tonic::codec::DecodeBuf<'_>,
    ) -> std::result::Result<Option<Self::Item>, Self::Error> {
        let bytes = src.copy_to_bytes(src.remaining());
        let message =
            T::decode_proto(&bytes).map_err(|e| tonic::Status::internal(e.to_string()))?;
        Ok(Some(message))
    }
}
