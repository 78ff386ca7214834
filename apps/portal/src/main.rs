//! Portal Host Entry Point
//!
//! Minimal host wiring for the session lifecycle engine: a file-backed
//! epoch store, session policies from the backend (or the built-in
//! defaults), and stdin as the activity source. Every line typed counts
//! as activity, `e` extends a running warning, `q` quits.
//!
//! Uses `anyhow` for startup errors; after startup the engine degrades
//! through its own fallback paths instead of erroring.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use kernel::id::UserId;
use platform::clock::SystemClock;
use platform::kv::FileKvStore;
use session::{
    ActivityConfig, ActivityTracker, DefaultClassPolicy, FixedPolicyStore, HttpPolicyStore,
    InputKind, KvEpochStore, LogoutHook, LogoutReason, ManagerConfig, PolicyStore, SessionClass,
    SessionContext, SessionManager, SessionPhase, SessionPolicy, SessionResult,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Policy source chosen at startup
enum PortalPolicyStore {
    Remote(HttpPolicyStore),
    Fixed(FixedPolicyStore),
}

impl PolicyStore for PortalPolicyStore {
    async fn fetch(&self, class: SessionClass) -> SessionResult<Option<SessionPolicy>> {
        match self {
            PortalPolicyStore::Remote(store) => store.fetch(class).await,
            PortalPolicyStore::Fixed(store) => store.fetch(class).await,
        }
    }
}

struct PortalLogout;

impl LogoutHook for PortalLogout {
    async fn logout(&self, reason: Option<LogoutReason>) {
        match reason {
            Some(reason) => tracing::info!(reason = %reason, "Host logout callback invoked"),
            None => tracing::info!("Host logout callback invoked (explicit)"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal=info,session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Session context from the environment
    let user_id = match env::var("PORTAL_USER_ID") {
        Ok(raw) => raw
            .parse::<UserId>()
            .context("PORTAL_USER_ID must be a UUID")?,
        Err(_) => UserId::new(),
    };
    let role = env::var("PORTAL_ROLE").unwrap_or_else(|_| "member".to_string());
    let permissions: Vec<String> = env::var("PORTAL_PERMISSIONS")
        .map(|raw| {
            raw.split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();

    // Epoch persistence survives restarts through a state file
    let state_path =
        env::var("PORTAL_STATE_FILE").unwrap_or_else(|_| "portal-state.json".to_string());
    let kv = FileKvStore::open(&state_path)
        .await
        .context("Failed to open the portal state file")?;

    let policy_store = match env::var("PORTAL_POLICY_URL") {
        Ok(url) => {
            tracing::info!(url = %url, "Fetching session policies from the backend");
            PortalPolicyStore::Remote(HttpPolicyStore::new(url))
        }
        Err(_) => PortalPolicyStore::Fixed(FixedPolicyStore::with_defaults()),
    };

    let context = SessionContext::new(user_id, &role, permissions);
    tracing::info!(user_id = %context.user_id, role = %context.role, "Starting session manager");

    let manager = SessionManager::new(
        context,
        ManagerConfig::default(),
        Arc::new(KvEpochStore::new(kv)),
        Arc::new(policy_store),
        Arc::new(DefaultClassPolicy),
        Arc::new(PortalLogout),
        Arc::new(SystemClock),
    );
    let handle = manager.spawn();

    println!("type to stay active, `e` to extend the warning, `q` to quit");

    // Render phase changes from the watch channel
    let mut view_rx = handle.subscribe();
    let mut render = tokio::spawn(async move {
        loop {
            {
                let view = view_rx.borrow_and_update().clone();
                match view.phase {
                    SessionPhase::Loading => {}
                    SessionPhase::Active => println!("session active ({} class)", view.class),
                    SessionPhase::Warning {
                        reason,
                        seconds_left,
                    } => println!("warning [{reason}]: logout in {seconds_left}s"),
                    SessionPhase::LoggedOut { reason } => {
                        match reason {
                            Some(reason) => println!("logged out: {reason}"),
                            None => println!("logged out"),
                        }
                        break;
                    }
                }
            }
            if view_rx.changed().await.is_err() {
                break;
            }
        }
    });

    // Feed stdin through the activity tracker
    let activity_handle = handle.clone();
    let mut tracker = ActivityTracker::new(ActivityConfig::default(), move |_| {
        activity_handle.record_activity();
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = &mut render => break,
            maybe_line = lines.next_line() => match maybe_line {
                Ok(Some(line)) => match line.trim() {
                    "q" => {
                        handle.shutdown();
                        break;
                    }
                    "e" => handle.extend_session(),
                    _ => {
                        tracker.observe(InputKind::Key);
                    }
                },
                Ok(None) => {
                    // stdin closed; tear down without logging out
                    handle.shutdown();
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    handle.shutdown();
                    break;
                }
            },
        }
    }

    render.abort();
    Ok(())
}
