//! Chain handlers wrapping the session.

use crate::session::{Outcome, Session};
use async_trait::async_trait;
use relay_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Logs each line in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            sender = %message.sender,
            target = %message.target,
            message_content = %message.content,
            received_at = %message.created_at,
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = %message.id,
            response = ?response,
            "Processed message"
        );
        Ok(())
    }
}

/// Terminal handler: hands the line to [`Session::dispatch`]. Spawned queries are left running;
/// the gate tracks them.
pub struct RelayHandler {
    session: Arc<Session>,
}

impl RelayHandler {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Handler for RelayHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let outcome = self.session.dispatch(message).await;
        debug!(outcome = ?outcome, "Dispatched");
        Ok(match outcome {
            Outcome::Ignored => HandlerResponse::Ignore,
            Outcome::Directive(kind) => HandlerResponse::Reply(kind.to_string()),
            Outcome::QuerySpawned(_) => HandlerResponse::Reply("query".to_string()),
            Outcome::Blocked | Outcome::Busy | Outcome::Empty | Outcome::CommandsDisabled => {
                HandlerResponse::Stop
            }
        })
    }
}
