use crate::handlers::{LoggingHandler, RelayHandler};
use crate::session::Session;
use handler_chain::HandlerChain;
use relay_core::Message;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Logging first, then the session.
pub fn build_handler_chain(session: Arc<Session>) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(RelayHandler::new(session)))
}

/// Feeds inbound lines through the chain one at a time until the transport closes the channel,
/// then waits for an in-flight query to finish.
#[instrument(skip(session, inbound))]
pub async fn run_bot(session: Arc<Session>, mut inbound: mpsc::Receiver<Message>) {
    let chain = build_handler_chain(Arc::clone(&session));
    info!(
        nickname = %session.nickname(),
        channel = %session.channel(),
        "Bot started"
    );

    while let Some(message) = inbound.recv().await {
        if let Err(e) = chain.handle(&message).await {
            error!(error = %e, sender = %message.sender, "Handler chain failed");
        }
    }

    info!("Inbound closed, waiting for in-flight reply");
    session.gate().wait_idle().await;
    info!("Bot stopped");
}
