//! # ActorClient Trait
//!
//! Common surface for resource-specific clients: `get`, `require`, `list` and `delete`
//! built once on top of the generic `ResourceClient`, with the framework error mapped
//! into the resource's own error type.
use crate::{ActorEntity, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read/delete operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Driver { id: u32 }
/// #[derive(Debug)] struct DriverCreate;
/// #[derive(Debug)] struct DriverUpdate;
/// #[derive(Debug)] enum DriverAction {}
///
/// #[derive(Debug, thiserror::Error)]
/// enum DriverError {
///     #[error("driver {0} not found")]
///     NotFound(String),
///     #[error("{0}")]
///     Communication(String),
/// }
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
///     fn from_create_params(id: u32, _: DriverCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id })
///     }
///     async fn on_update(&mut self, _: DriverUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: DriverAction, _: &()) -> Result<(), Self::Error> { match a {} }
/// }
///
/// struct DriverClient { inner: ResourceClient<Driver> }
///
/// #[async_trait]
/// impl ActorClient<Driver> for DriverClient {
///     type Error = DriverError;
///
///     fn inner(&self) -> &ResourceClient<Driver> { &self.inner }
///
///     fn map_error(e: FrameworkError) -> DriverError {
///         DriverError::Communication(e.to_string())
///     }
///
///     fn not_found(id: &u32) -> DriverError { DriverError::NotFound(id.to_string()) }
/// }
///
/// async fn usage(client: DriverClient) {
///     // get(), require(), list() and delete() come for free
///     let _ = client.require(1).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// The error returned by [`ActorClient::require`] for a missing id.
    fn not_found(id: &T::Id) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch an entity by ID, failing when it does not exist.
    #[tracing::instrument(skip(self))]
    async fn require(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        match self.inner().get(id.clone()).await.map_err(Self::map_error)? {
            Some(item) => Ok(item),
            None => Err(Self::not_found(&id)),
        }
    }

    /// Every entity matching the filter.
    async fn list(&self, filter: Filter<T>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!(?filter, "Sending request");
        self.inner().query(filter).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
