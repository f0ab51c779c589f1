//! Browser driver for the session-liveness state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Watches the identity in [`AuthContext`]: when a token appears the monitor
//! is started, activity listeners are attached to the window and a timer task
//! begins; when it disappears everything is torn down. Commands returned by
//! the monitor are executed here and their results fed back.
//!
//! The requests issued here use a client without the logout hook, so the
//! monitor alone decides which failures end the session.

#[cfg(feature = "hydrate")]
use leptos::prelude::*;

use crate::state::auth::AuthContext;
#[cfg(feature = "hydrate")]
use crate::state::session::{ResponseVerdict, SessionCommand, SessionMonitor, SessionPhase, TerminationReason};

#[cfg(feature = "hydrate")]
thread_local! {
    static LISTENERS: std::cell::RefCell<Vec<Box<dyn FnOnce()>>> = const { std::cell::RefCell::new(Vec::new()) };
}

/// Tie the monitor's lifecycle to identity presence. Call once at the root.
pub fn install_session_driver(auth: AuthContext) {
    #[cfg(feature = "hydrate")]
    {
        Effect::new(move |previous: Option<Option<String>>| {
            let token = auth.state.with(|s| s.token().map(str::to_owned));
            if previous.as_ref() != Some(&token) {
                stop(auth);
                if token.is_some() {
                    start(auth);
                }
            }
            token
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = auth;
    }
}

#[cfg(feature = "hydrate")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(feature = "hydrate")]
fn start(auth: AuthContext) {
    let now = now_ms();
    let mut commands = Vec::new();
    let mut epoch = 0;
    auth.monitor.update_value(|m| {
        commands = m.start(now);
        epoch = m.epoch();
    });
    if commands.is_empty() {
        return;
    }
    log::info!("session monitoring started (run {epoch})");
    attach_listeners(auth);
    for command in commands {
        dispatch(auth, command);
    }
    leptos::task::spawn_local(tick_loop(auth, epoch));
}

#[cfg(feature = "hydrate")]
fn stop(auth: AuthContext) {
    let was_running = auth
        .monitor
        .with_value(|m| m.phase() != SessionPhase::Inactive);
    auth.monitor.update_value(SessionMonitor::stop);
    LISTENERS.with(|listeners| {
        for remove in listeners.borrow_mut().drain(..) {
            remove();
        }
    });
    if was_running {
        log::info!("session monitoring stopped");
    }
}

/// Pointer, key, scroll and touch events on the window count as activity.
#[cfg(feature = "hydrate")]
fn attach_listeners(auth: AuthContext) {
    use leptos::ev;

    let on_activity = move || {
        let now = now_ms();
        let mut command = None;
        auth.monitor.update_value(|m| command = m.on_activity(now));
        if let Some(command) = command {
            dispatch(auth, command);
        }
    };

    let handles = [
        window_event_listener(ev::mousedown, move |_| on_activity()),
        window_event_listener(ev::mousemove, move |_| on_activity()),
        window_event_listener(ev::keypress, move |_| on_activity()),
        window_event_listener(ev::scroll, move |_| on_activity()),
        window_event_listener(ev::touchstart, move |_| on_activity()),
        window_event_listener(ev::click, move |_| on_activity()),
    ];
    LISTENERS.with(|listeners| {
        let mut listeners = listeners.borrow_mut();
        for handle in handles {
            listeners.push(Box::new(move || handle.remove()));
        }
    });
}

/// Sleep until the monitor's next deadline and tick it, for as long as the
/// run that spawned this task is current.
#[cfg(feature = "hydrate")]
async fn tick_loop(auth: AuthContext, epoch: u64) {
    loop {
        let wakeup = auth
            .monitor
            .try_with_value(|m| if m.epoch() == epoch { m.next_wakeup_ms() } else { None })
            .flatten();
        let Some(wakeup) = wakeup else {
            break;
        };
        let delay = wakeup.saturating_sub(now_ms());
        gloo_timers::future::sleep(std::time::Duration::from_millis(delay)).await;

        let mut command = None;
        let mut current = false;
        auth.monitor.try_update_value(|m| {
            current = m.epoch() == epoch;
            if current {
                command = m.on_tick(now_ms());
            }
        });
        if !current {
            break;
        }
        if let Some(command) = command {
            dispatch(auth, command);
        }
    }
}

#[cfg(feature = "hydrate")]
fn dispatch(auth: AuthContext, command: SessionCommand) {
    match command {
        SessionCommand::CheckStatus { epoch } => leptos::task::spawn_local(async move {
            let result = auth.plain_api().check_session_status().await;
            if let Err(e) = &result {
                log::warn!("session status check failed: {e}");
            }
            let mut verdict = ResponseVerdict::Stale;
            auth.monitor.update_value(|m| verdict = m.on_status(epoch, result.is_ok()));
            match (verdict, result) {
                (ResponseVerdict::Accepted, Ok(status)) => auth.set_session(&status),
                (ResponseVerdict::Terminate(reason), _) => terminate(auth, reason),
                _ => {}
            }
        }),
        SessionCommand::Ping { epoch } => leptos::task::spawn_local(async move {
            let result = auth.plain_api().ping_session().await;
            let unauthorized = matches!(&result, Err(e) if e.status() == Some(401));
            if let Err(e) = &result {
                log::debug!("session ping failed: {e}");
            }
            let mut verdict = ResponseVerdict::Stale;
            auth.monitor.update_value(|m| verdict = m.on_ping(epoch, unauthorized));
            if let ResponseVerdict::Terminate(reason) = verdict {
                terminate(auth, reason);
            }
        }),
        SessionCommand::Logout(reason) => terminate(auth, reason),
    }
}

#[cfg(feature = "hydrate")]
fn terminate(auth: AuthContext, reason: TerminationReason) {
    log::warn!("session terminated: {reason}");
    auth.logout();
}
