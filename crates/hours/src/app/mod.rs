//! App-layer composition root for the interactive views.
//!
//! [`App`] owns the [`Model`], runs storage [`Command`]s on the tokio runtime,
//! and feeds their [`Message`]s back through [`update::handle_message`].

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::timestamp::truncate_to_second;
use crate::infra::db::Database;

pub mod command;
pub mod list;
pub mod message;
pub mod model;
pub mod update;

#[cfg(test)]
pub(crate) mod fixtures;

pub use command::Command;
pub use message::Message;
pub use model::Model;

/// Interactive application state plus the channel that carries command
/// results back to the event loop.
pub struct App {
    pub model: Model,
    clock: Arc<dyn Clock>,
    database: Database,
    message_rx: mpsc::UnboundedReceiver<Message>,
    message_tx: mpsc::UnboundedSender<Message>,
}

impl App {
    /// Creates the app with empty lists. Call [`App::start`] to load them.
    pub fn new(database: Database, clock: Arc<dyn Clock>, min_log_secs: i64) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();

        Self {
            model: Model::new(min_log_secs),
            clock,
            database,
            message_rx,
            message_tx,
        }
    }

    /// Issues the initial fetches.
    pub fn start(&self) {
        self.dispatch(update::init_commands());
    }

    /// Current local time without sub-second precision.
    pub fn now(&self) -> OffsetDateTime {
        truncate_to_second(self.clock.now())
    }

    /// Reduces one command result and dispatches its follow-ups.
    pub fn handle_message(&mut self, message: Message) {
        let commands = update::handle_message(&mut self.model, message);
        self.dispatch(commands);
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        update::handle_resize(&mut self.model, width, height);
    }

    /// Runs each command on its own task; results arrive through
    /// [`App::next_message`].
    pub fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            debug!(?command, "dispatching command");

            let database = self.database.clone();
            let message_tx = self.message_tx.clone();
            tokio::spawn(async move {
                let message = command.execute(&database).await;
                let _ = message_tx.send(message);
            });
        }
    }

    /// Waits for the next command result.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.message_rx.recv().await
    }

    /// Returns a command result if one is already queued.
    pub fn try_next_message(&mut self) -> Option<Message> {
        self.message_rx.try_recv().ok()
    }

    pub fn should_quit(&self) -> bool {
        self.model.should_quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::{MIN_LOG_SECS, NOW};
    use crate::domain::clock::FixedClock;

    async fn new_test_app() -> App {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NOW));
        let database = Database::open_in_memory(Arc::clone(&clock))
            .await
            .expect("failed to open in-memory db");

        App::new(database, clock, MIN_LOG_SECS)
    }

    #[tokio::test]
    async fn test_start_loads_tasks_and_active_details() {
        // Arrange
        let mut app = new_test_app().await;
        app.database
            .create_task("Write report")
            .await
            .expect("failed to create task");

        // Act
        app.start();
        for _ in 0..4 {
            let message = app.next_message().await.expect("channel closed");
            app.handle_message(message);
        }

        // Assert
        assert_eq!(app.model.tasks.len(), 1);
        assert!(app.model.inactive_tasks.is_empty());
        assert!(!app.model.focus_tracked_on_load);
    }

    #[tokio::test]
    async fn test_dispatch_delivers_created_task() {
        // Arrange
        let mut app = new_test_app().await;

        // Act
        app.dispatch(vec![Command::CreateTask {
            summary: "Review PR".to_string(),
        }]);
        let message = app.next_message().await.expect("channel closed");
        app.handle_message(message);

        // Assert
        assert_eq!(
            app.model.tasks.selected().map(|task| task.summary.as_str()),
            Some("Review PR")
        );
    }

    #[tokio::test]
    async fn test_now_drops_sub_second_precision() {
        // Arrange
        let app = new_test_app().await;

        // Act
        let now = app.now();

        // Assert
        assert_eq!(now.nanosecond(), 0);
    }
}
