//! Logging and alerting facade.
//!
//! Events go to the `application_log` table and are mirrored to `tracing`;
//! severities strictly below the configured threshold are additionally handed
//! to a [`Notifier`] for external delivery. The recorder only calls this
//! interface, it does not implement delivery itself.

use diesel::prelude::*;
use diesel::{RunQueryDsl, SqliteConnection};

use crate::models::NewApplicationLog;
use crate::schema::application_log;

/// External notification sink for severe events.
pub trait Notifier {
    /// Deliver one severe event. Best effort; failures are the sink's problem.
    fn notify(&self, facility: &str, level: i32, message: &str);
}

/// Default notifier: emits a tracing error naming the configured target.
pub struct LogNotifier {
    /// Opaque delivery target from the configuration, if any.
    pub target: Option<String>,
}

impl Notifier for LogNotifier {
    fn notify(&self, facility: &str, level: i32, message: &str) {
        match &self.target {
            Some(to) => {
                tracing::error!(facility, level, to = %to, "alert: {message}");
            }
            None => {
                tracing::error!(facility, level, "alert (no target configured): {message}");
            }
        }
    }
}

/// Run-scoped logging facade.
pub struct AlertLog {
    run_id: i32,
    notify_below: i32,
    notifier: Box<dyn Notifier>,
}

impl AlertLog {
    /// Build a facade for one run. `notify_below` follows the syslog
    /// convention: severities strictly below it trigger the notifier.
    pub fn new(run_id: i32, notify_below: i32, notifier: Box<dyn Notifier>) -> Self {
        Self {
            run_id,
            notify_below,
            notifier,
        }
    }

    /// Write one event: `application_log` row, tracing mirror, and external
    /// notification when severe enough.
    pub fn write(
        &self,
        conn: &mut SqliteConnection,
        facility: &str,
        level: i32,
        message: &str,
    ) -> QueryResult<()> {
        let stamp = chrono::Utc::now().to_rfc3339();
        diesel::insert_into(application_log::table)
            .values(&NewApplicationLog {
                run_id: self.run_id,
                time_stamp: &stamp,
                facility,
                level,
                event: message,
            })
            .execute(conn)?;

        match level {
            0..=3 => tracing::error!(facility, "{message}"),
            4 => tracing::warn!(facility, "{message}"),
            5 | 6 => tracing::info!(facility, "{message}"),
            _ => tracing::debug!(facility, "{message}"),
        }

        if level < self.notify_below {
            self.notifier.notify(facility, level, message);
        }

        Ok(())
    }

    /// Service a fatal error: warning-level event plus a final stop marker,
    /// emitted before the run terminates.
    pub fn write_fatal(
        &self,
        conn: &mut SqliteConnection,
        facility: &str,
        message: &str,
    ) -> QueryResult<()> {
        self.write(conn, facility, 4, message)?;
        self.write(conn, facility, 6, "stop")
    }
}
