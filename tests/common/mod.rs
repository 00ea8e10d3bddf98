#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use eventdesk::domain::entities::{NewClientLogEntry, NewTenant, NewUser, Role, Tenant, User};
use eventdesk::domain::log_worker::run_log_worker;
use eventdesk::domain::repositories::Repositories;
use eventdesk::infrastructure::cache::NullCache;
use eventdesk::infrastructure::memory::memory_repositories;
use eventdesk::routes::unthrottled_router;
use eventdesk::state::AppState;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-signing-secret";

/// A seeded user together with a raw bearer token.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub token: String,
}

/// In-memory application with two tenants and one actor per role.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub repos: Repositories,
    /// Held so the log queue stays open until a test takes it.
    pub log_rx: Option<mpsc::Receiver<NewClientLogEntry>>,
    pub acme: Tenant,
    pub globex: Tenant,
    pub super_admin: Actor,
    pub acme_admin: Actor,
    pub acme_manager: Actor,
    pub acme_staff: Actor,
    pub globex_admin: Actor,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_queue_capacity(1_000).await
    }

    pub async fn with_queue_capacity(capacity: usize) -> Self {
        let repos = memory_repositories();
        let (log_tx, log_rx) = mpsc::channel(capacity);
        let state = AppState::new(
            repos.clone(),
            Arc::new(NullCache::new()),
            log_tx,
            TEST_SECRET.to_string(),
        );

        let acme = seed_tenant(&repos, "Acme Events", "acme").await;
        let globex = seed_tenant(&repos, "Globex", "globex").await;

        let super_admin =
            seed_actor(&repos, &state, None, "root@eventdesk.test", Role::SuperAdmin).await;
        let acme_admin =
            seed_actor(&repos, &state, Some(acme.id), "admin@acme.test", Role::TenantAdmin).await;
        let acme_manager =
            seed_actor(&repos, &state, Some(acme.id), "manager@acme.test", Role::Manager).await;
        let acme_staff =
            seed_actor(&repos, &state, Some(acme.id), "staff@acme.test", Role::Staff).await;
        let globex_admin = seed_actor(
            &repos,
            &state,
            Some(globex.id),
            "admin@globex.test",
            Role::TenantAdmin,
        )
        .await;

        let server = TestServer::new(unthrottled_router(state.clone())).unwrap();

        Self {
            server,
            state,
            repos,
            log_rx: Some(log_rx),
            acme,
            globex,
            super_admin,
            acme_admin,
            acme_manager,
            acme_staff,
            globex_admin,
        }
    }

    pub fn get(&self, path: &str, actor: &Actor) -> TestRequest {
        self.server.get(path).authorization_bearer(&actor.token)
    }

    pub fn post(&self, path: &str, actor: &Actor) -> TestRequest {
        self.server.post(path).authorization_bearer(&actor.token)
    }

    pub fn put(&self, path: &str, actor: &Actor) -> TestRequest {
        self.server.put(path).authorization_bearer(&actor.token)
    }

    pub fn patch(&self, path: &str, actor: &Actor) -> TestRequest {
        self.server.patch(path).authorization_bearer(&actor.token)
    }

    pub fn delete(&self, path: &str, actor: &Actor) -> TestRequest {
        self.server.delete(path).authorization_bearer(&actor.token)
    }

    /// Adds a user to `tenant_id` and issues a token for it.
    pub async fn actor(&self, tenant_id: Option<Uuid>, email: &str, role: Role) -> Actor {
        seed_actor(&self.repos, &self.state, tenant_id, email, role).await
    }

    /// Starts the background writer on the held receiver.
    pub fn spawn_log_worker(&mut self) -> JoinHandle<()> {
        let rx = self.log_rx.take().expect("log receiver already taken");
        tokio::spawn(run_log_worker(rx, self.repos.client_logs.clone(), 10))
    }

    /// Drops the receiver, closing the log queue.
    pub fn close_log_queue(&mut self) {
        self.log_rx.take();
    }
}

/// Sends the request on behalf of `tenant_id` via `X-Tenant-Id`.
pub fn as_tenant(request: TestRequest, tenant_id: Uuid) -> TestRequest {
    with_header(request, "x-tenant-id", &tenant_id.to_string())
}

pub fn with_header(request: TestRequest, name: &'static str, value: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static(name),
        HeaderValue::from_str(value).unwrap(),
    )
}

/// Asserts the common shape of a problem response and returns its body.
pub fn assert_problem(response: &axum_test::TestResponse, status: u16) -> Value {
    assert_eq!(response.status_code().as_u16(), status);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "application/problem+json"
    );

    let body = response.json::<Value>();
    assert_eq!(body["status"], status);
    assert!(body["type"].as_str().is_some());
    assert!(body["title"].as_str().is_some());
    assert!(body["correlationId"].as_str().is_some());
    assert!(body["timestamp"].as_str().is_some());
    body
}

/// Polls `check` until it holds or the deadline passes.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

async fn seed_tenant(repos: &Repositories, name: &str, slug: &str) -> Tenant {
    repos
        .tenants
        .create(NewTenant {
            name: name.to_string(),
            slug: slug.to_string(),
        })
        .await
        .unwrap()
}

async fn seed_actor(
    repos: &Repositories,
    state: &AppState,
    tenant_id: Option<Uuid>,
    email: &str,
    role: Role,
) -> Actor {
    let user = repos
        .users
        .create(NewUser {
            tenant_id,
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
            role,
        })
        .await
        .unwrap();
    let (_, token) = state
        .auth_service
        .issue_token(user.id, "integration tests")
        .await
        .unwrap();

    Actor { user, token }
}
