use actor_framework::{ActorEntity, Filter, FrameworkError, ResourceActor};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Account {
    id: u32,
    email: String,
    verified: bool,
}

#[derive(Debug)]
struct AccountCreate {
    email: String,
}

#[derive(Debug)]
struct AccountUpdate {
    email: Option<String>,
}

#[derive(Debug)]
enum AccountAction {
    Verify,
}

#[derive(Debug, thiserror::Error)]
enum AccountError {
    #[error("invalid email: {0}")]
    InvalidEmail(String),
}

#[async_trait]
impl ActorEntity for Account {
    type Id = u32;
    type Create = AccountCreate;
    type Update = AccountUpdate;
    type Action = AccountAction;
    type ActionResult = bool;
    type Context = ();
    type Error = AccountError;

    fn from_create_params(id: u32, params: AccountCreate) -> Result<Self, Self::Error> {
        if !params.email.contains('@') {
            return Err(AccountError::InvalidEmail(params.email));
        }
        Ok(Self {
            id,
            email: params.email,
            verified: false,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.to_lowercase())
    }

    async fn on_update(
        &mut self,
        update: AccountUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(email) = update.email {
            self.email = email;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: AccountAction,
        _ctx: &Self::Context,
    ) -> Result<bool, Self::Error> {
        match action {
            AccountAction::Verify => {
                let changed = !self.verified;
                self.verified = true;
                Ok(changed)
            }
        }
    }
}

fn create(email: &str) -> AccountCreate {
    AccountCreate {
        email: email.to_string(),
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    // 1. Create
    let id: u32 = client.create(create("alice@example.com")).await.unwrap();
    assert_eq!(id, 1);

    // 2. Action is applied once
    assert!(client.perform_action(id, AccountAction::Verify).await.unwrap());
    assert!(!client.perform_action(id, AccountAction::Verify).await.unwrap());
    let account: Account = client.get(id).await.unwrap().unwrap();
    assert!(account.verified);

    // 3. Update
    let updated = client
        .update(
            id,
            AccountUpdate {
                email: Some("alicia@example.com".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "alicia@example.com");

    // 4. Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
    assert!(matches!(
        client.delete(id).await,
        Err(FrameworkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unique_key_rejects_duplicate_without_consuming_id() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    client.create(create("bob@example.com")).await.unwrap();
    let dup = client.create(create("BOB@example.com")).await;
    assert!(matches!(dup, Err(FrameworkError::Conflict(key)) if key == "bob@example.com"));

    let next = client.create(create("carol@example.com")).await.unwrap();
    assert_eq!(next, 2);
}

#[tokio::test]
async fn test_entity_error_is_recoverable_by_type() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create(create("not-an-email")).await.unwrap_err();
    let typed = err.downcast_entity::<AccountError>().unwrap();
    assert!(matches!(typed, AccountError::InvalidEmail(e) if e == "not-an-email"));
}

#[tokio::test]
async fn test_query_filters_inside_actor() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    tokio::spawn(actor.run(()));

    for email in ["a@x.io", "b@x.io", "c@y.io"] {
        client.create(create(email)).await.unwrap();
    }
    client.perform_action(2, AccountAction::Verify).await.unwrap();

    let mut on_x = client
        .query(Filter::new(|a: &Account| a.email.ends_with("@x.io")))
        .await
        .unwrap();
    on_x.sort_by_key(|a| a.id);
    assert_eq!(
        on_x.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let verified = client
        .query(Filter::new(|a: &Account| a.verified))
        .await
        .unwrap();
    assert_eq!(verified.len(), 1);
    assert_eq!(client.query(Filter::all()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_closed_actor_reports_unavailable() {
    let (actor, client) = ResourceActor::<Account>::new(10);
    drop(actor);

    let err = client.get(1).await.unwrap_err();
    assert!(err.is_unavailable());
}
