//! # Mock Clients
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from
//! a queue of expectations instead of a running actor. Use it to test a service in
//! isolation from the aggregates it calls, and to inject failures that a live actor will
//! not produce on demand (a closed channel, a conflict, a slow dependency).
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | State | none, answers are scripted | real store |
//! | Error injection | `return_err(..)` | needs the right state |
//! | Use case | logic *around* the client | the actor itself, end-to-end flows |
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Payment { id: u32, amount: f64 }
//! #[derive(Debug)] struct PaymentCreate { amount: f64 }
//! #[derive(Debug)] struct PaymentUpdate;
//! #[derive(Debug)] enum PaymentAction {}
//! #[derive(Debug, thiserror::Error)] #[error("payment error")] struct PaymentError;
//!
//! #[async_trait]
//! impl ActorEntity for Payment {
//!     type Id = u32; type Create = PaymentCreate; type Update = PaymentUpdate;
//!     type Action = PaymentAction; type ActionResult = (); type Context = (); type Error = PaymentError;
//!     fn from_create_params(id: u32, p: PaymentCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, amount: p.amount })
//!     }
//!     async fn on_update(&mut self, _: PaymentUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, a: PaymentAction, _: &()) -> Result<(), Self::Error> { match a {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Payment>::new();
//!     mock.expect_create().return_err(FrameworkError::ActorClosed);
//!     mock.expect_get(1).return_ok(Some(Payment { id: 1, amount: 12.5 }));
//!
//!     let client = mock.client();
//!     assert!(client.create(PaymentCreate { amount: 12.5 }).await.unwrap_err().is_unavailable());
//!     assert_eq!(client.get(1).await.unwrap().unwrap().amount, 12.5);
//!     mock.verify();
//! }
//! ```
//!
//! Expectations are consumed in order. A request that does not match the next
//! expectation (wrong kind or wrong id) panics the mock task, which surfaces in the test as
//! [`FrameworkError::ActorDropped`].
//!
//! For asserting on the request payload itself, [`create_mock_client`] returns the raw
//! receiver and [`next_request`] pulls the next message off it.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum Expectation<T: ActorEntity> {
    Create(Result<T::Id, FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    Query(Result<Vec<T>, FrameworkError>),
    Update(T::Id, Result<T, FrameworkError>),
    Delete(T::Id, Result<(), FrameworkError>),
    Action(T::Id, Result<T::ActionResult, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Create(_) => "create".to_string(),
            Expectation::Get(id, _) => format!("get({})", id),
            Expectation::Query(_) => "query".to_string(),
            Expectation::Update(id, _) => format!("update({})", id),
            Expectation::Delete(id, _) => format!("delete({})", id),
            Expectation::Action(id, _) => format!("action({})", id),
        }
    }
}

fn describe_request<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { .. } => "create".to_string(),
        ResourceRequest::Get { id, .. } => format!("get({})", id),
        ResourceRequest::Query { .. } => "query".to_string(),
        ResourceRequest::Update { id, .. } => format!("update({})", id),
        ResourceRequest::Delete { id, .. } => format!("delete({})", id),
        ResourceRequest::Action { id, .. } => format!("action({})", id),
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// Answers one request from one expectation, panicking on a mismatch.
fn answer<T: ActorEntity>(request: ResourceRequest<T>, expectation: Option<Expectation<T>>) {
    let got = describe_request(&request);
    match (request, expectation) {
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get(want, response)))
            if id == want =>
        {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Query { respond_to, .. }, Some(Expectation::Query(response))) => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Some(Expectation::Update(want, response)),
        ) if id == want => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete(want, response)))
            if id == want =>
        {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Action { id, respond_to, .. },
            Some(Expectation::Action(want, response)),
        ) if id == want => {
            let _ = respond_to.send(response);
        }
        (_, Some(expected)) => {
            panic!("MockClient expected {} but got {}", expected.describe(), got);
        }
        (_, None) => panic!("MockClient got unexpected {}", got),
    }
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                answer(request, next);
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn expect<R>(
        &mut self,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.expect(Expectation::Create)
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.expect(move |r| Expectation::Get(id, r))
    }

    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.expect(Expectation::Query)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.expect(move |r| Expectation::Update(id, r))
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.expect(move |r| Expectation::Delete(id, r))
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.expect(move |r| Expectation::Action(id, r))
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap();
        if !remaining.is_empty() {
            let names: Vec<String> = remaining.iter().map(Expectation::describe).collect();
            panic!("Not all expectations were met: {:?}", names);
        }
    }
}

/// Completes an `expect_*` call with the scripted response.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.make)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

/// A client plus the receiver its requests arrive on.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// The next request sent through a client from [`create_mock_client`].
pub async fn next_request<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<ResourceRequest<T>> {
    receiver.recv().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Cart {
        id: u32,
        user_id: u32,
        items: u32,
    }

    #[derive(Debug)]
    struct CartCreate {
        user_id: u32,
    }

    #[derive(Debug)]
    struct CartUpdate;

    #[derive(Debug)]
    enum CartAction {
        Clear,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("cart error")]
    struct CartError;

    #[async_trait]
    impl ActorEntity for Cart {
        type Id = u32;
        type Create = CartCreate;
        type Update = CartUpdate;
        type Action = CartAction;
        type ActionResult = u32;
        type Context = ();
        type Error = CartError;

        fn from_create_params(id: u32, params: CartCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                user_id: params.user_id,
                items: 0,
            })
        }

        async fn on_update(&mut self, _: CartUpdate, _: &()) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn handle_action(&mut self, action: CartAction, _: &()) -> Result<u32, Self::Error> {
            match action {
                CartAction::Clear => {
                    self.items = 0;
                    Ok(0)
                }
            }
        }
    }

    #[tokio::test]
    async fn test_raw_receiver_sees_payload() {
        let (client, mut receiver) = create_mock_client::<Cart>(10);

        let task = tokio::spawn(async move { client.create(CartCreate { user_id: 7 }).await });

        match next_request(&mut receiver).await {
            Some(ResourceRequest::Create { params, respond_to }) => {
                assert_eq!(params.user_id, 7);
                respond_to.send(Ok(1)).unwrap();
            }
            other => panic!("expected create, got {:?}", other),
        }
        assert_eq!(task.await.unwrap().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expectations_answer_in_order() {
        let mut mock = MockClient::<Cart>::new();
        let cart = Cart {
            id: 1,
            user_id: 7,
            items: 2,
        };
        mock.expect_query().return_ok(vec![cart.clone()]);
        mock.expect_action(1).return_ok(0);
        mock.expect_delete(1).return_err(FrameworkError::NotFound("1".into()));

        let client = mock.client();
        let found = client
            .query(crate::Filter::new(|c: &Cart| c.user_id == 7))
            .await
            .unwrap();
        assert_eq!(found, vec![cart]);
        assert_eq!(client.perform_action(1, CartAction::Clear).await.unwrap(), 0);
        assert!(matches!(
            client.delete(1).await,
            Err(FrameworkError::NotFound(_))
        ));

        mock.verify();
    }

    #[tokio::test]
    async fn test_wrong_id_fails_the_call() {
        let mut mock = MockClient::<Cart>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
