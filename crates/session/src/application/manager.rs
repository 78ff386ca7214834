//! Session Manager
//!
//! Enforces the two session-expiry policies (rolling inactivity timeout
//! and absolute session duration) and coordinates the pre-logout warning
//! countdown.
//!
//! One spawned task owns the whole state machine
//! (`Loading -> Active -> Warning -> LoggedOut`) and every timer handle;
//! the host talks to it through a [`SessionHandle`] and watches
//! [`SessionView`] snapshots. Armed timers are best-effort triggers only:
//! remaining lifetime recomputed from the wall clock is the source of
//! truth, so a host suspended past its deadline (laptop sleep) is logged
//! out on the next periodic check.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use kernel::id::UserId;
use platform::clock::Clock;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Interval, MissedTickBehavior, Sleep};

use crate::application::begin_epoch::BeginEpochUseCase;
use crate::application::config::ManagerConfig;
use crate::application::resolve_policy::ResolvePolicyUseCase;
use crate::domain::entity::context::SessionContext;
use crate::domain::entity::epoch::SessionEpoch;
use crate::domain::entity::phase::SessionPhase;
use crate::domain::repository::{EpochStore, PolicyStore};
use crate::domain::services::ClassPolicy;
use crate::domain::value_object::logout_reason::LogoutReason;
use crate::domain::value_object::policy::SessionPolicy;
use crate::domain::value_object::session_class::SessionClass;

/// Host logout callback trait
#[trait_variant::make(LogoutHook: Send)]
pub trait LocalLogoutHook {
    /// Invoked exactly once per manager lifetime, after timers are
    /// cleared and the persisted epoch is removed.
    async fn logout(&self, reason: Option<LogoutReason>);
}

/// Commands accepted by the manager task
#[derive(Debug, Clone, Copy)]
enum Command {
    Activity,
    Extend,
    LogoutNow,
    Shutdown,
}

/// Published snapshot of the managed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub class: SessionClass,
    /// Effective policy; `None` while loading
    pub policy: Option<SessionPolicy>,
}

impl SessionView {
    fn loading(class: SessionClass) -> Self {
        Self {
            phase: SessionPhase::Loading,
            class,
            policy: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn show_warning(&self) -> bool {
        self.phase.is_warning()
    }

    pub fn warning_seconds_left(&self) -> Option<u64> {
        self.phase.warning_seconds_left()
    }

    pub fn logout_reason(&self) -> Option<LogoutReason> {
        self.phase.logout_reason()
    }
}

/// Host-facing handle to a running manager.
///
/// Commands are fire-and-forget; sending to a terminated manager is a
/// silent no-op. Dropping every handle tears the manager down.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<SessionView>,
}

impl SessionHandle {
    /// Report qualifying user activity (resets the inactivity timer
    /// while no warning is showing)
    pub fn record_activity(&self) {
        let _ = self.commands.send(Command::Activity);
    }

    /// Reset the inactivity timer as if fresh activity occurred
    pub fn reset_inactivity_timer(&self) {
        let _ = self.commands.send(Command::Activity);
    }

    /// Dismiss the warning and return to `Active`
    pub fn extend_session(&self) {
        let _ = self.commands.send(Command::Extend);
    }

    /// Force an immediate logout
    pub fn logout_now(&self) {
        let _ = self.commands.send(Command::LogoutNow);
    }

    /// Tear the manager down without logging out.
    ///
    /// Timers stop, but the persisted epoch survives so the absolute
    /// timer resumes where it left off on the next start.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    /// Subscribe to view snapshots
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// Current view snapshot
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }
}

/// Session manager, generic over its injectable seams.
pub struct SessionManager<E, P, H, C>
where
    E: EpochStore + Send + Sync + 'static,
    P: PolicyStore + Send + Sync + 'static,
    H: LogoutHook + Send + Sync + 'static,
    C: Clock,
{
    context: SessionContext,
    config: ManagerConfig,
    epoch_store: Arc<E>,
    policy_store: Arc<P>,
    class_policy: Arc<dyn ClassPolicy>,
    hook: Arc<H>,
    clock: Arc<C>,
}

impl<E, P, H, C> SessionManager<E, P, H, C>
where
    E: EpochStore + Send + Sync + 'static,
    P: PolicyStore + Send + Sync + 'static,
    H: LogoutHook + Send + Sync + 'static,
    C: Clock,
{
    pub fn new(
        context: SessionContext,
        config: ManagerConfig,
        epoch_store: Arc<E>,
        policy_store: Arc<P>,
        class_policy: Arc<dyn ClassPolicy>,
        hook: Arc<H>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            context,
            config,
            epoch_store,
            policy_store,
            class_policy,
            hook,
            clock,
        }
    }

    /// Spawn the manager task and return the host-facing handle.
    pub fn spawn(self) -> SessionHandle {
        let class = self
            .class_policy
            .resolve(self.context.role, &self.context.permissions);

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(SessionView::loading(class));

        tokio::spawn(run(self, class, commands_rx, view_tx));

        SessionHandle {
            commands: commands_tx,
            view: view_rx,
        }
    }
}

/// Named timer handles owned by the manager task.
///
/// Every transition boundary goes through `clear_all` or `clear_warning`
/// so no timer survives a state it no longer applies to.
struct Timers {
    inactivity: Option<Pin<Box<Sleep>>>,
    absolute_warning: Option<Pin<Box<Sleep>>>,
    absolute_expiry: Option<Pin<Box<Sleep>>>,
    warning_fallback: Option<Pin<Box<Sleep>>>,
    countdown: Option<Interval>,
}

impl Timers {
    fn idle() -> Self {
        Self {
            inactivity: None,
            absolute_warning: None,
            absolute_expiry: None,
            warning_fallback: None,
            countdown: None,
        }
    }

    fn clear_all(&mut self) {
        *self = Self::idle();
    }

    fn clear_warning(&mut self) {
        self.warning_fallback = None;
        self.countdown = None;
    }
}

/// Await an optional sleep; an unarmed slot never resolves.
async fn armed(slot: &mut Option<Pin<Box<Sleep>>>) {
    match slot {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Await an optional interval tick; an unarmed slot never resolves.
async fn armed_tick(slot: &mut Option<Interval>) {
    match slot {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

enum Event {
    Command(Option<Command>),
    CountdownTick,
    WarningDeadline,
    InactivityDeadline,
    AbsoluteWarningDeadline,
    AbsoluteDeadline,
    ValidityTick,
}

struct Engine<E, H, C>
where
    E: EpochStore + Send + Sync + 'static,
    H: LogoutHook + Send + Sync + 'static,
    C: Clock,
{
    user_id: UserId,
    class: SessionClass,
    policy: SessionPolicy,
    epoch: SessionEpoch,
    config: ManagerConfig,
    epoch_store: Arc<E>,
    hook: Arc<H>,
    clock: Arc<C>,
    phase: SessionPhase,
    timers: Timers,
    validity: Interval,
    view_tx: watch::Sender<SessionView>,
}

async fn run<E, P, H, C>(
    manager: SessionManager<E, P, H, C>,
    class: SessionClass,
    mut commands: mpsc::UnboundedReceiver<Command>,
    view_tx: watch::Sender<SessionView>,
) where
    E: EpochStore + Send + Sync + 'static,
    P: PolicyStore + Send + Sync + 'static,
    H: LogoutHook + Send + Sync + 'static,
    C: Clock,
{
    // Loading: resolve policy and epoch. Neither can fail; both degrade.
    let policy = ResolvePolicyUseCase::new(manager.policy_store.clone())
        .execute(class)
        .await;
    let epoch = BeginEpochUseCase::new(manager.epoch_store.clone(), manager.config.epoch_max_age)
        .execute(&manager.context.user_id, manager.clock.now())
        .await;

    tracing::info!(
        user_id = %manager.context.user_id,
        class = %class,
        started_at = %epoch.started_at,
        "Session manager started"
    );

    let mut validity = time::interval_at(
        time::Instant::now() + manager.config.validity_check_interval,
        manager.config.validity_check_interval,
    );
    validity.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut engine = Engine {
        user_id: manager.context.user_id,
        class,
        policy,
        epoch,
        config: manager.config,
        epoch_store: manager.epoch_store,
        hook: manager.hook,
        clock: manager.clock,
        phase: SessionPhase::Loading,
        timers: Timers::idle(),
        validity,
        view_tx,
    };

    engine.activate();
    // A resumed epoch may already be expired or inside the warning window
    if engine.enforce_absolute().await {
        return;
    }

    loop {
        let event = {
            let Engine {
                timers, validity, ..
            } = &mut engine;
            let Timers {
                inactivity,
                absolute_warning,
                absolute_expiry,
                warning_fallback,
                countdown,
            } = timers;

            tokio::select! {
                biased;
                cmd = commands.recv() => Event::Command(cmd),
                _ = armed_tick(countdown) => Event::CountdownTick,
                _ = armed(warning_fallback) => Event::WarningDeadline,
                _ = armed(inactivity) => Event::InactivityDeadline,
                _ = armed(absolute_warning) => Event::AbsoluteWarningDeadline,
                _ = armed(absolute_expiry) => Event::AbsoluteDeadline,
                _ = validity.tick() => Event::ValidityTick,
            }
        };

        match event {
            // A closed channel means every handle is gone; treat as teardown
            Event::Command(None) | Event::Command(Some(Command::Shutdown)) => {
                engine.shutdown();
                return;
            }
            Event::Command(Some(Command::Activity)) => engine.on_activity(),
            Event::Command(Some(Command::Extend)) => {
                engine.extend();
                if engine.enforce_hard_expiry().await {
                    return;
                }
            }
            Event::Command(Some(Command::LogoutNow)) => {
                engine.logout(None).await;
                return;
            }
            Event::CountdownTick => {
                if engine.on_countdown_tick().await {
                    return;
                }
            }
            Event::WarningDeadline => {
                if engine.on_warning_deadline().await {
                    return;
                }
            }
            Event::InactivityDeadline => engine.on_inactivity_deadline(),
            Event::AbsoluteWarningDeadline => engine.on_absolute_warning_deadline(),
            Event::AbsoluteDeadline | Event::ValidityTick => {
                if engine.enforce_absolute().await {
                    return;
                }
            }
        }
    }
}

impl<E, H, C> Engine<E, H, C>
where
    E: EpochStore + Send + Sync + 'static,
    H: LogoutHook + Send + Sync + 'static,
    C: Clock,
{
    fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            class: self.class,
            policy: Some(self.policy),
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view());
    }

    /// Absolute lifetime remaining, recomputed from the wall clock
    fn remaining(&self) -> Duration {
        self.epoch
            .remaining(self.clock.now(), self.policy.session_duration)
    }

    fn arm_inactivity(&mut self) {
        self.timers.inactivity = Some(Box::pin(time::sleep(self.policy.inactivity_deadline())));
    }

    fn arm_absolute(&mut self) {
        let remaining = self.remaining();
        self.timers.absolute_expiry = Some(Box::pin(time::sleep(remaining)));
        self.timers.absolute_warning = remaining
            .checked_sub(self.policy.warning_grace)
            .map(|until_warning| -> Pin<Box<Sleep>> { Box::pin(time::sleep(until_warning)) });
    }

    fn activate(&mut self) {
        self.timers.clear_all();
        self.phase = SessionPhase::Active;
        self.arm_inactivity();
        self.arm_absolute();
        self.publish();
    }

    fn on_activity(&mut self) {
        // Activity resets the inactivity timer only, and only while no
        // warning is showing. The absolute deadline never moves.
        if self.phase.is_active() {
            self.arm_inactivity();
        }
    }

    fn on_inactivity_deadline(&mut self) {
        self.enter_warning(LogoutReason::Inactivity);
    }

    fn on_absolute_warning_deadline(&mut self) {
        self.enter_warning(LogoutReason::SessionExpired);
    }

    fn enter_warning(&mut self, reason: LogoutReason) {
        // At most one warning countdown at a time
        if !self.phase.is_active() {
            return;
        }
        self.timers.inactivity = None;
        self.timers.absolute_warning = None;

        let tick = self.config.countdown_tick;
        self.timers.countdown = Some(time::interval_at(time::Instant::now() + tick, tick));
        self.timers.warning_fallback = Some(Box::pin(time::sleep(self.policy.warning_grace)));

        let seconds_left = self.policy.warning_seconds();
        self.phase = SessionPhase::Warning {
            reason,
            seconds_left,
        };
        tracing::info!(reason = %reason, seconds_left, "Session warning started");
        self.publish();
    }

    fn extend(&mut self) {
        if !self.phase.is_warning() {
            return;
        }
        self.timers.clear_warning();
        self.phase = SessionPhase::Active;
        self.arm_inactivity();
        self.arm_absolute();
        tracing::debug!("Session extended, warning cleared");
        self.publish();
    }

    async fn on_countdown_tick(&mut self) -> bool {
        let SessionPhase::Warning {
            reason,
            seconds_left,
        } = self.phase
        else {
            return false;
        };

        let seconds_left = seconds_left.saturating_sub(1);
        if seconds_left == 0 {
            self.logout(Some(reason)).await;
            return true;
        }
        self.phase = SessionPhase::Warning {
            reason,
            seconds_left,
        };
        self.publish();
        false
    }

    async fn on_warning_deadline(&mut self) -> bool {
        // Safety net in case countdown ticks were lost
        let SessionPhase::Warning { reason, .. } = self.phase else {
            return false;
        };
        self.logout(Some(reason)).await;
        true
    }

    /// Force logout when the recomputed remaining lifetime hits zero.
    async fn enforce_hard_expiry(&mut self) -> bool {
        if self.phase.is_logged_out() {
            return true;
        }
        if self.remaining().is_zero() {
            self.logout(Some(LogoutReason::SessionExpired)).await;
            return true;
        }
        false
    }

    /// Periodic validity check: recomputed remaining time is the source
    /// of truth, armed timers are best-effort triggers.
    async fn enforce_absolute(&mut self) -> bool {
        if self.enforce_hard_expiry().await {
            return true;
        }
        let remaining = self.remaining();
        if self.phase.is_active() {
            if remaining <= self.policy.warning_grace {
                self.enter_warning(LogoutReason::SessionExpired);
            } else {
                // Re-anchor armed deadlines to the recomputed remaining
                // time; they drift when the host was suspended.
                self.arm_absolute();
            }
        }
        false
    }

    async fn logout(&mut self, reason: Option<LogoutReason>) {
        if self.phase.is_logged_out() {
            return;
        }
        self.timers.clear_all();
        self.phase = SessionPhase::LoggedOut { reason };

        if let Err(e) = self.epoch_store.clear(&self.user_id).await {
            tracing::warn!(
                user_id = %self.user_id,
                error = %e,
                "Failed to clear persisted epoch on logout"
            );
        }

        self.hook.logout(reason).await;

        match reason {
            Some(reason) => tracing::info!(user_id = %self.user_id, reason = %reason, "Session logged out"),
            None => tracing::info!(user_id = %self.user_id, "Session logged out by host"),
        }
        self.publish();
    }

    fn shutdown(&mut self) {
        // Teardown is not a logout: timers stop, the persisted epoch
        // stays so the absolute timer survives a host restart.
        self.timers.clear_all();
        tracing::debug!(user_id = %self.user_id, "Session manager shut down");
    }
}
