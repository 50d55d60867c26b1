//! # Mock Collections & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of expectations instead of a store. Anything written against
//! [`RemoteCollection`](crate::RemoteCollection) can be tested with it, including failure
//! paths that a live API will not produce on demand.
//!
//! ## When to use which
//!
//! | Need | Tool |
//! |------|------|
//! | Canned answers, error injection | [`MockClient`] |
//! | Control *when* each answer arrives (out-of-order responses) | [`create_mock_client`] + `expect_*` helpers |
//! | Realistic paging over real records | [`ResourceActor`](crate::ResourceActor) |
//!
//! ## Injecting a failure
//!
//! ```rust
//! use catalog_framework::mock::MockClient;
//! use catalog_framework::{Entity, RemoteCollection, RemoteError};
//!
//! #[derive(Clone, Debug)] struct Tag { id: u32 }
//! #[derive(Debug, thiserror::Error)] #[error("tag error")] struct TagError;
//! impl Entity for Tag {
//!     type Id = u32; type Draft = (); type Patch = (); type Error = TagError;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_draft(id: u32, _: ()) -> Result<Self, TagError> { Ok(Self { id }) }
//!     fn apply_patch(&mut self, _: ()) -> Result<(), TagError> { Ok(()) }
//!     fn to_patch(&self) {}
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Tag>::new();
//!     mock.expect_list().return_err(RemoteError::Network("connection reset".into()));
//!
//!     let collection = mock.client();
//!     let result = RemoteCollection::list(&collection, 0, 10).await;
//!     assert!(matches!(result, Err(RemoteError::Network(_))));
//!     mock.verify();
//! }
//! ```
//!
//! Errors are given as [`RemoteError`] and translated into the actor-level
//! [`FrameworkError`] the channel carries, so they come back out of the
//! `RemoteCollection` impl as the same variant: `Network` stays `Network`,
//! `Http { status: 404 }` becomes a not-found, any other `Http` or `Decode` error becomes an
//! entity rejection carrying its message.

use crate::client::ResourceClient;
use crate::entity::Entity;
use crate::error::{FrameworkError, RemoteError};
use crate::message::ResourceRequest;
use crate::page::Page;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the answer to give it.
enum Expectation<T: Entity> {
    List {
        response: Result<Page<T>, FrameworkError>,
    },
    Get {
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T, FrameworkError>,
    },
    Update {
        response: Result<T, FrameworkError>,
    },
    Delete {
        response: Result<T, FrameworkError>,
    },
}

impl<T: Entity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::List { .. } => "list",
            Expectation::Get { .. } => "get",
            Expectation::Create { .. } => "create",
            Expectation::Update { .. } => "update",
            Expectation::Delete { .. } => "delete",
        }
    }
}

fn to_framework_error(error: RemoteError) -> FrameworkError {
    match error {
        RemoteError::Network(_) => FrameworkError::ActorClosed,
        RemoteError::Http { status: 404, message } => FrameworkError::NotFound(message),
        RemoteError::Http { message, .. } | RemoteError::Decode(message) => {
            FrameworkError::EntityError(Box::new(std::io::Error::other(message)))
        }
    }
}

/// A mock collection with an ordered queue of expectations.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Product>::new();
/// mock.expect_list().return_ok(Page::new(vec![phone], 194, 0, 10));
/// mock.expect_delete().return_ok(phone);
///
/// let session = CatalogSystem::start(config, Arc::new(mock.client()));
/// // drive the session...
/// mock.verify(); // every expectation was consumed
/// ```
pub struct MockClient<T: Entity> {
    client: ResourceClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Entity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MockClient<T> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = Arc::clone(&expectations);

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut exps = expectations_clone.lock().unwrap();
                let expectation = exps.pop_front();
                drop(exps); // Release lock before responding

                match (request, expectation) {
                    (ResourceRequest::List { respond_to, .. }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Delete { respond_to, .. }, Some(Expectation::Delete { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        panic!(
                            "Unexpected request {:?}, expected {}",
                            request,
                            expectation.as_ref().map_or("nothing", Expectation::name)
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Page<T>> {
        self.builder(|response| Expectation::List { response })
    }

    /// A `get` answered with `Ok(None)` surfaces as a 404 through `RemoteCollection`.
    pub fn expect_get(&mut self) -> ExpectationBuilder<T, Option<T>> {
        self.builder(|response| Expectation::Get { response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    /// The full record returned here reaches `RemoteCollection` callers as a patch of every field.
    pub fn expect_update(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Update { response })
    }

    pub fn expect_delete(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Delete { response })
    }

    /// Number of expectations not yet consumed.
    pub fn pending(&self) -> usize {
        self.expectations.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.pending();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn builder<R>(
        &mut self,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: Arc::clone(&self.expectations),
        }
    }
}

/// Builder returned by the `expect_*` methods; finish it with `return_ok` or `return_err`.
pub struct ExpectationBuilder<T: Entity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: Entity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: RemoteError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(Err(to_framework_error(error))));
    }
}

// =============================================================================
// MANUAL RESPONDERS
// =============================================================================

/// Creates a client and the raw receiver behind it.
///
/// The test pulls requests off the receiver with the `expect_*` helpers below and answers them
/// whenever it likes, which is how out-of-order responses are simulated.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Waits for the next request and returns it if it is a `list`.
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(u64, u64, oneshot::Sender<Result<Page<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List {
            skip,
            limit,
            respond_to,
        }) => Some((skip, limit, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `create`.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Draft, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `delete`.
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}
