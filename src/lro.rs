//! Client-side futures for long-running operations.
//!
//! Mutation RPCs return an [`OperationFuture`] seeded with the operation
//! record from the initial response. The future polls `GetOperation` through
//! the same transport (inheriting its retry behavior) with exponential
//! backoff, starting at 1s and growing by 1.5x per poll up to 60s. Once a
//! poll reports the operation done, the outcome is decoded through the
//! method's declared result schema and fixed; further polls never run.
//!
//! `cancel()` only asks the server to cancel. The future stays pending until
//! a later poll observes the operation finished with a `Cancelled` status.

use std::marker::PhantomData;
use std::time::Duration;

use crate::descriptor::LroMethod;
use crate::errors::{Error, Result, TransportError, TransportErrorKind};
use crate::operation::{Operation, Outcome};
use crate::options::CallOptions;
use crate::status::{Code, ServiceError};
use crate::transport::Transport;

const INITIAL_POLL_DELAY: Duration = Duration::from_secs(1);
const MAX_POLL_DELAY: Duration = Duration::from_secs(60);
const POLL_MULTIPLIER: f64 = 1.5;

fn next_poll_delay(current: Duration) -> Duration {
    current.mul_f64(POLL_MULTIPLIER).min(MAX_POLL_DELAY)
}

fn poll_deadline_error(name: &str) -> Error {
    TransportError::new(
        TransportErrorKind::Timeout,
        format!("deadline elapsed while polling operation {name}"),
    )
    .into()
}

/// Terminal state of an operation future.
enum State<R> {
    Pending,
    Done(Result<R, ServiceError>),
    Cancelled(ServiceError),
}

impl<R> State<R> {
    fn is_pending(&self) -> bool {
        matches!(self, State::Pending)
    }
}

/// Shared pending-to-terminal transition, used by both future flavors.
fn absorb<M: LroMethod>(
    state: &mut State<M::OperationResult>,
    last: &mut Operation,
    operation: Operation,
) -> Result<()> {
    // Once terminal, the outcome is fixed; late records are ignored.
    if !state.is_pending() {
        return Ok(());
    }
    if operation.done {
        *state = match &operation.outcome {
            Some(Outcome::Error(status)) if status.code == Code::Cancelled => {
                State::Cancelled(status.clone())
            }
            Some(Outcome::Error(status)) => State::Done(Err(status.clone())),
            Some(Outcome::Response(payload)) => State::Done(Ok(payload.decode()?)),
            // Operations over empty results may omit the response payload.
            None => State::Done(Ok(crate::types::ApiMessage::decode_proto(&[])?)),
        };
    }
    *last = operation;
    Ok(())
}

fn terminal_outcome<R: Clone>(name: &str, state: &State<R>) -> Result<R> {
    match state {
        State::Pending => Err(Error::config("operation outcome read before completion")),
        State::Done(Ok(result)) => Ok(result.clone()),
        State::Done(Err(status)) | State::Cancelled(status) => Err(Error::Operation {
            name: name.to_string(),
            status: status.clone(),
        }),
    }
}

/// Handle on a long-running operation started by an async client.
pub struct OperationFuture<M: LroMethod, T> {
    name: String,
    operations: crate::operations::OperationsClient<T>,
    options: CallOptions,
    state: State<M::OperationResult>,
    last: Operation,
    _method: PhantomData<fn() -> M>,
}

impl<M, T> OperationFuture<M, T>
where
    M: LroMethod,
    T: Transport,
{
    pub(crate) fn new(
        operation: Operation,
        operations: crate::operations::OperationsClient<T>,
        options: CallOptions,
    ) -> Result<Self> {
        let mut future = Self {
            name: operation.name.clone(),
            operations,
            options,
            state: State::Pending,
            last: Operation::default(),
            _method: PhantomData,
        };
        absorb::<M>(&mut future.state, &mut future.last, operation)?;
        Ok(future)
    }

    /// Server-assigned operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a terminal state has been observed.
    pub fn done(&self) -> bool {
        !self.state.is_pending()
    }

    /// Whether the server confirmed cancellation.
    pub fn cancelled(&self) -> bool {
        matches!(self.state, State::Cancelled(_))
    }

    /// Latest progress metadata, decoded through the method's metadata
    /// schema. `None` until the server attaches any.
    pub fn metadata(&self) -> Result<Option<M::OperationMetadata>> {
        self.last.metadata.as_ref().map(|p| p.decode()).transpose()
    }

    /// Issues one `GetOperation` poll (a no-op once done) and reports
    /// whether the operation has finished.
    pub async fn poll(&mut self) -> Result<bool> {
        if self.state.is_pending() {
            let operation = self
                .operations
                .get_operation(self.name.clone(), self.options.clone())
                .await?;
            absorb::<M>(&mut self.state, &mut self.last, operation)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(operation = %self.name, done = self.done(), "polled operation");
        }
        Ok(self.done())
    }

    /// Polls until the operation finishes, then returns its result.
    ///
    /// Equivalent to [`wait`](Self::wait) without a deadline.
    pub async fn result(&mut self) -> Result<M::OperationResult> {
        self.wait(None).await
    }

    /// Polls until the operation finishes or `deadline` elapses.
    pub async fn wait(&mut self, deadline: Option<Duration>) -> Result<M::OperationResult> {
        let started = tokio::time::Instant::now();
        let mut delay = INITIAL_POLL_DELAY;
        while self.state.is_pending() {
            if let Some(limit) = deadline {
                if started.elapsed() + delay > limit {
                    return Err(poll_deadline_error(&self.name));
                }
            }
            match &self.options.cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                },
                None => tokio::time::sleep(delay).await,
            }
            delay = next_poll_delay(delay);
            self.poll().await?;
        }
        terminal_outcome(&self.name, &self.state)
    }

    /// Asks the server to cancel the operation. Best-effort: the future
    /// stays pending until a subsequent poll confirms cancellation.
    pub async fn cancel(&self) -> Result<()> {
        self.operations
            .cancel_operation(self.name.clone(), self.options.clone())
            .await
    }
}

impl<M: LroMethod, T: Transport> std::fmt::Debug for OperationFuture<M, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationFuture")
            .field("name", &self.name)
            .field("done", &self.done())
            .finish_non_exhaustive()
    }
}

/// Blocking mirror of [`OperationFuture`].
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub struct BlockingOperationFuture<M: LroMethod, T> {
    name: String,
    operations: crate::blocking::BlockingOperationsClient<T>,
    options: CallOptions,
    state: State<M::OperationResult>,
    last: Operation,
    _method: PhantomData<fn() -> M>,
}

#[cfg(feature = "blocking")]
impl<M, T> BlockingOperationFuture<M, T>
where
    M: LroMethod,
    T: crate::transport::BlockingTransport,
{
    pub(crate) fn new(
        operation: Operation,
        operations: crate::blocking::BlockingOperationsClient<T>,
        options: CallOptions,
    ) -> Result<Self> {
        let mut future = Self {
            name: operation.name.clone(),
            operations,
            options,
            state: State::Pending,
            last: Operation::default(),
            _method: PhantomData,
        };
        absorb::<M>(&mut future.state, &mut future.last, operation)?;
        Ok(future)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn done(&self) -> bool {
        !self.state.is_pending()
    }

    pub fn cancelled(&self) -> bool {
        matches!(self.state, State::Cancelled(_))
    }

    pub fn metadata(&self) -> Result<Option<M::OperationMetadata>> {
        self.last.metadata.as_ref().map(|p| p.decode()).transpose()
    }

    pub fn poll(&mut self) -> Result<bool> {
        if self.state.is_pending() {
            let operation = self
                .operations
                .get_operation(self.name.clone(), self.options.clone())?;
            absorb::<M>(&mut self.state, &mut self.last, operation)?;
        }
        Ok(self.done())
    }

    pub fn result(&mut self) -> Result<M::OperationResult> {
        self.wait(None)
    }

    pub fn wait(&mut self, deadline: Option<Duration>) -> Result<M::OperationResult> {
        let started = std::time::Instant::now();
        let mut delay = INITIAL_POLL_DELAY;
        while self.state.is_pending() {
            if let Some(limit) = deadline {
                if started.elapsed() + delay > limit {
                    return Err(poll_deadline_error(&self.name));
                }
            }
            std::thread::sleep(delay);
            delay = next_poll_delay(delay);
            self.poll()?;
        }
        terminal_outcome(&self.name, &self.state)
    }

    pub fn cancel(&self) -> Result<()> {
        self.operations
            .cancel_operation(self.name.clone(), self.options.clone())
    }
}

#[cfg(feature = "blocking")]
impl<M: LroMethod, T: crate::transport::BlockingTransport> std::fmt::Debug
    for BlockingOperationFuture<M, T>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingOperationFuture")
            .field("name", &self.name)
            .field("done", &self.done())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::{DeleteModel, UploadModel};
    use crate::operation::Payload;
    use crate::types::{ApiMessage, UploadModelResponse};

    fn pending(name: &str) -> Operation {
        Operation {
            name: name.into(),
            done: false,
            metadata: None,
            outcome: None,
        }
    }

    #[test]
    fn backoff_grows_to_the_cap() {
        let mut delay = INITIAL_POLL_DELAY;
        let mut schedule = Vec::new();
        for _ in 0..12 {
            schedule.push(delay);
            delay = next_poll_delay(delay);
        }
        assert_eq!(schedule[0], Duration::from_secs(1));
        assert_eq!(schedule[1], Duration::from_millis(1500));
        assert!(schedule.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*schedule.last().unwrap(), MAX_POLL_DELAY);
    }

    #[test]
    fn absorb_fixes_the_first_terminal_outcome() {
        let mut state: State<UploadModelResponse> = State::Pending;
        let mut last = Operation::default();

        absorb::<UploadModel>(&mut state, &mut last, pending("op")).unwrap();
        assert!(state.is_pending());

        let response = UploadModelResponse {
            model: "projects/p/locations/l/models/m".into(),
            model_version_id: "1".into(),
        };
        let done = Operation {
            name: "op".into(),
            done: true,
            metadata: None,
            outcome: Some(Outcome::Response(Payload::Proto(prost_types::Any {
                type_url: "type.googleapis.com/google.cloud.aiplatform.v1.UploadModelResponse"
                    .into(),
                value: response.encode_proto().unwrap(),
            }))),
        };
        absorb::<UploadModel>(&mut state, &mut last, done).unwrap();
        assert_eq!(terminal_outcome("op", &state).unwrap(), response);

        // A contradictory later record must not reopen the outcome.
        absorb::<UploadModel>(&mut state, &mut last, pending("op")).unwrap();
        assert_eq!(terminal_outcome("op", &state).unwrap(), response);
    }

    #[test]
    fn absorb_maps_cancelled_status_to_cancelled_state() {
        let mut state: State<crate::types::Empty> = State::Pending;
        let mut last = Operation::default();
        let cancelled = Operation {
            name: "op".into(),
            done: true,
            metadata: None,
            outcome: Some(Outcome::Error(ServiceError::new(
                Code::Cancelled,
                "cancelled by caller",
            ))),
        };
        absorb::<DeleteModel>(&mut state, &mut last, cancelled).unwrap();
        assert!(matches!(state, State::Cancelled(_)));
        let err = terminal_outcome("op", &state).unwrap_err();
        assert_eq!(err.code(), Some(Code::Cancelled));
    }

    #[test]
    fn missing_response_payload_decodes_as_empty() {
        let mut state: State<crate::types::Empty> = State::Pending;
        let mut last = Operation::default();
        let done = Operation {
            name: "op".into(),
            done: true,
            metadata: None,
            outcome: None,
        };
        absorb::<DeleteModel>(&mut state, &mut last, done).unwrap();
        assert!(terminal_outcome("op", &state).is_ok());
    }
}
