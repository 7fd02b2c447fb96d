//! # Handler chain
//!
//! Runs every handler's `before` hook in order (any `false` stops the chain), then `handle` until
//! one returns Stop or Reply, then every `after` hook in reverse order with the final response.

use relay_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered list of handlers sharing one message.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler (runs in order; first Stop/Reply ends handler phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs before hooks, the handle phase, then after hooks in reverse. Returns the first Stop or
    /// Reply, or Continue when no handler ended the phase.
    #[instrument(skip(self, message))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(
            sender = %message.sender,
            target = %message.target,
            message_id = %message.id,
            "step: handler_chain started"
        );

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            if !handler.before(message).await? {
                info!(
                    sender = %message.sender,
                    handler = %handler_name,
                    "step: handler before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(message).await?;
            debug!(
                handler = %handler_name,
                response = ?response,
                "Handler processed"
            );
            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    info!(
                        sender = %message.sender,
                        handler = %handler_name,
                        "step: handler chain stopped by handler"
                    );
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(message, &final_response).await?;
        }

        info!(
            sender = %message.sender,
            message_id = %message.id,
            "step: handler_chain finished"
        );

        Ok(final_response)
    }
}

// Integration tests live in tests/handler_chain_test.rs
