//! # Generic Actor Server
//!
//! `ResourceActor` owns the in-memory store of one aggregate type and processes
//! requests sequentially, so entity state never needs a lock.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// This is the "server" half: it owns the `store` and the receiving end of the channel.
/// Every request is handled to completion before the next one is read, which gives each
/// aggregate the isolation a row lock would give it in a database.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies into `actor.run(context)`.
/// 3. **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Driver { id: u32, name: String }
/// #[derive(Debug)] struct DriverCreate { name: String }
/// #[derive(Debug)] struct DriverUpdate;
/// #[derive(Debug)] enum DriverAction {}
/// #[derive(Debug, thiserror::Error)] #[error("driver error")] struct DriverError;
///
/// #[async_trait]
/// impl ActorEntity for Driver {
///     type Id = u32;
///     type Create = DriverCreate;
///     type Update = DriverUpdate;
///     type Action = DriverAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = DriverError;
///
///     fn from_create_params(id: u32, p: DriverCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, name: p.name })
///     }
///     async fn on_update(&mut self, _: DriverUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: DriverAction, _: &()) -> Result<(), Self::Error> { match a {} }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Driver>::new(10);
///     tokio::spawn(actor.run(()));
///     let id = client.create(DriverCreate { name: "Dana".into() }).await.unwrap();
///     assert_eq!(client.get(id).await.unwrap().unwrap().name, "Dana");
/// }
/// ```
///
/// ## Operations
///
/// * **Create**: allocate the next id, build the entity, reject a duplicate
///   `unique_key` with [`FrameworkError::Conflict`], run `on_create`, then store it.
/// * **Get**: clone of the stored entity or `None`.
/// * **Query**: clones of every entity matching the filter, in no particular order.
/// * **Update**: run `on_update` on the stored entity, return the new state.
/// * **Delete**: run `on_delete`, then remove.
/// * **Action**: run `handle_action` on the stored entity, return its result.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    fn key_taken(&self, key: &str) -> bool {
        self.store
            .values()
            .any(|existing| existing.unique_key().as_deref() == Some(key))
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// The `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Cart" instead of "food_delivery::model::cart::Cart"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };

                    if let Some(key) = item.unique_key() {
                        if self.key_taken(&key) {
                            warn!(entity_type, %key, "Unique key taken");
                            let _ = respond_to.send(Err(FrameworkError::Conflict(key)));
                            continue;
                        }
                    }

                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    self.next_id += 1;
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Query { filter, respond_to } => {
                    let matches: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| filter.matches(item))
                        .cloned()
                        .collect();
                    debug!(entity_type, count = matches.len(), "Query");
                    let _ = respond_to.send(Ok(matches));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
