//! Session-liveness state machine.
//!
//! DESIGN
//! ======
//! Pure state: the clock is passed into every transition as milliseconds and
//! the machine answers with the commands the caller must run (status check,
//! keep-alive ping, logout). The browser driver in
//! `util::session_driver` owns the real timers and listeners and feeds the
//! results back in.
//!
//! Every monitoring run carries an epoch. Commands are stamped with it and
//! responses for an older epoch are reported as stale, so a request that was
//! in flight across a logout/login cycle cannot affect the new run.
//!
//! TRADE-OFFS
//! ==========
//! The client gives up after 19 s of inactivity while the server expires the
//! session after 20 s. The one-second margin keeps the client from pinging a
//! session the server is about to drop.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Idle time after the last activity that ends the session.
pub const INACTIVITY_TIMEOUT_MS: u64 = 19_000;
/// Minimum spacing between keep-alive pings.
pub const PING_INTERVAL_MS: u64 = 10_000;
/// Period of the server-side session-status check.
pub const STATUS_POLL_INTERVAL_MS: u64 = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No identity; nothing armed.
    #[default]
    Inactive,
    /// Identity present; deadline and poll armed.
    Monitoring,
    /// Logout requested; waiting for the identity to clear.
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    Inactivity,
    StatusCheckFailed,
    PingUnauthorized,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Inactivity => "inactivity timeout",
            Self::StatusCheckFailed => "session status check failed",
            Self::PingUnauthorized => "keep-alive ping rejected",
        })
    }
}

/// Work the caller must perform on behalf of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    CheckStatus { epoch: u64 },
    Ping { epoch: u64 },
    Logout(TerminationReason),
}

/// How the caller should treat a response it fed back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseVerdict {
    /// Issued by an earlier run; drop it.
    Stale,
    /// Current run; apply the payload, if any.
    Accepted,
    /// Current run and fatal; run the logout procedure.
    Terminate(TerminationReason),
}

#[derive(Clone, Debug, Default)]
pub struct SessionMonitor {
    phase: SessionPhase,
    epoch: u64,
    deadline_ms: u64,
    next_status_ms: u64,
    last_ping_ms: Option<u64>,
}

impl SessionMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Identity became present. Returns the entry commands: an immediate
    /// status check followed by the first keep-alive ping.
    ///
    /// A no-op unless the machine is `Inactive`; a terminated run must be
    /// cleared with [`SessionMonitor::stop`] first.
    pub fn start(&mut self, now_ms: u64) -> Vec<SessionCommand> {
        if self.phase != SessionPhase::Inactive {
            return Vec::new();
        }
        self.epoch += 1;
        self.phase = SessionPhase::Monitoring;
        self.deadline_ms = now_ms + INACTIVITY_TIMEOUT_MS;
        self.next_status_ms = now_ms + STATUS_POLL_INTERVAL_MS;
        self.last_ping_ms = None;

        let mut commands = vec![SessionCommand::CheckStatus { epoch: self.epoch }];
        commands.extend(self.on_activity(now_ms));
        commands
    }

    /// Identity became absent. Disarms everything and invalidates
    /// in-flight responses.
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Inactive {
            return;
        }
        self.epoch += 1;
        self.phase = SessionPhase::Inactive;
        self.last_ping_ms = None;
    }

    /// User activity: push the deadline out and ping if the throttle allows.
    pub fn on_activity(&mut self, now_ms: u64) -> Option<SessionCommand> {
        if self.phase != SessionPhase::Monitoring {
            return None;
        }
        if now_ms >= self.deadline_ms {
            return Some(self.terminate(TerminationReason::Inactivity));
        }
        self.deadline_ms = now_ms + INACTIVITY_TIMEOUT_MS;
        let ping_due = self
            .last_ping_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= PING_INTERVAL_MS);
        if !ping_due {
            return None;
        }
        self.last_ping_ms = Some(now_ms);
        Some(SessionCommand::Ping { epoch: self.epoch })
    }

    /// Timer wakeup: expire the deadline or issue the periodic status check.
    pub fn on_tick(&mut self, now_ms: u64) -> Option<SessionCommand> {
        if self.phase != SessionPhase::Monitoring {
            return None;
        }
        if now_ms >= self.deadline_ms {
            return Some(self.terminate(TerminationReason::Inactivity));
        }
        if now_ms >= self.next_status_ms {
            // A throttled tab can wake late; resume the cadence from now.
            self.next_status_ms = (self.next_status_ms + STATUS_POLL_INTERVAL_MS).max(now_ms + 1);
            return Some(SessionCommand::CheckStatus { epoch: self.epoch });
        }
        None
    }

    /// Result of a status check issued under `epoch`. Any failure is fatal.
    pub fn on_status(&mut self, epoch: u64, ok: bool) -> ResponseVerdict {
        if !self.is_current(epoch) {
            return ResponseVerdict::Stale;
        }
        if ok {
            ResponseVerdict::Accepted
        } else {
            self.verdict(TerminationReason::StatusCheckFailed)
        }
    }

    /// Result of a ping issued under `epoch`. Only an explicit rejection of
    /// the session is fatal; other failures are left to the status check.
    pub fn on_ping(&mut self, epoch: u64, unauthorized: bool) -> ResponseVerdict {
        if !self.is_current(epoch) {
            return ResponseVerdict::Stale;
        }
        if unauthorized {
            self.verdict(TerminationReason::PingUnauthorized)
        } else {
            ResponseVerdict::Accepted
        }
    }

    /// When the driver should next call [`SessionMonitor::on_tick`].
    #[must_use]
    pub fn next_wakeup_ms(&self) -> Option<u64> {
        (self.phase == SessionPhase::Monitoring).then(|| self.deadline_ms.min(self.next_status_ms))
    }

    /// Milliseconds of idle time left before the deadline.
    #[must_use]
    pub fn idle_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        (self.phase == SessionPhase::Monitoring).then(|| self.deadline_ms.saturating_sub(now_ms))
    }

    fn is_current(&self, epoch: u64) -> bool {
        epoch == self.epoch && self.phase == SessionPhase::Monitoring
    }

    fn verdict(&mut self, reason: TerminationReason) -> ResponseVerdict {
        self.phase = SessionPhase::Terminated;
        ResponseVerdict::Terminate(reason)
    }

    fn terminate(&mut self, reason: TerminationReason) -> SessionCommand {
        self.phase = SessionPhase::Terminated;
        SessionCommand::Logout(reason)
    }
}
