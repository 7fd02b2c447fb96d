//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: before hook stopping the chain, Reply stopping the handle phase and reaching after hooks,
//! and before/after ordering across several handlers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use handler_chain::HandlerChain;
use relay_core::{Handler, HandlerResponse, Message};

fn create_test_message(content: &str) -> Message {
    Message::incoming("alice", "#lobby", content)
}

struct CountingHandler {
    handle_count: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Handler for CountingHandler {
    async fn handle(&self, _message: &Message) -> relay_core::Result<HandlerResponse> {
        self.handle_count.fetch_add(1, Ordering::SeqCst);
        Ok(HandlerResponse::Continue)
    }
}

/// **Test: An empty chain answers Continue.**
#[tokio::test]
async fn test_empty_chain_continues() {
    let chain = HandlerChain::new();
    assert!(chain.is_empty());
    let result = chain.handle(&create_test_message("hi")).await.unwrap();
    assert_eq!(result, HandlerResponse::Continue);
}

/// **Test: A before hook returning false stops the chain; handle is never reached.**
#[tokio::test]
async fn test_before_false_stops_chain() {
    struct Gatekeeper;

    #[async_trait::async_trait]
    impl Handler for Gatekeeper {
        async fn before(&self, _message: &Message) -> relay_core::Result<bool> {
            Ok(false)
        }
    }

    let handle_count = Arc::new(AtomicUsize::new(0));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Gatekeeper))
        .add_handler(Arc::new(CountingHandler {
            handle_count: handle_count.clone(),
        }));

    let result = chain.handle(&create_test_message("hi")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(handle_count.load(Ordering::SeqCst), 0);
}

/// **Test: Reply ends the handle phase; later handlers are skipped and after hooks see the reply.**
#[tokio::test]
async fn test_reply_stops_handle_phase_and_reaches_after() {
    struct Replier;

    #[async_trait::async_trait]
    impl Handler for Replier {
        async fn handle(&self, _message: &Message) -> relay_core::Result<HandlerResponse> {
            Ok(HandlerResponse::Reply("pong".to_string()))
        }
    }

    struct Observer {
        seen: Arc<Mutex<Vec<HandlerResponse>>>,
    }

    #[async_trait::async_trait]
    impl Handler for Observer {
        async fn after(
            &self,
            _message: &Message,
            response: &HandlerResponse,
        ) -> relay_core::Result<()> {
            self.seen.lock().unwrap().push(response.clone());
            Ok(())
        }
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let handle_count = Arc::new(AtomicUsize::new(0));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Observer { seen: seen.clone() }))
        .add_handler(Arc::new(Replier))
        .add_handler(Arc::new(CountingHandler {
            handle_count: handle_count.clone(),
        }));

    let result = chain.handle(&create_test_message("ping")).await.unwrap();

    assert_eq!(result, HandlerResponse::Reply("pong".to_string()));
    assert_eq!(handle_count.load(Ordering::SeqCst), 0);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![HandlerResponse::Reply("pong".to_string())]
    );
}

/// **Test: before hooks run first→last, after hooks last→first.**
#[tokio::test]
async fn test_hook_order() {
    struct OrderHandler {
        name: &'static str,
        order: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl Handler for OrderHandler {
        async fn before(&self, _message: &Message) -> relay_core::Result<bool> {
            self.order.lock().unwrap().push(format!("before_{}", self.name));
            Ok(true)
        }

        async fn after(
            &self,
            _message: &Message,
            _response: &HandlerResponse,
        ) -> relay_core::Result<()> {
            self.order.lock().unwrap().push(format!("after_{}", self.name));
            Ok(())
        }
    }

    let order = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(OrderHandler {
            name: "first",
            order: order.clone(),
        }))
        .add_handler(Arc::new(OrderHandler {
            name: "second",
            order: order.clone(),
        }));

    chain.handle(&create_test_message("hi")).await.unwrap();

    assert_eq!(
        *order.lock().unwrap(),
        vec!["before_first", "before_second", "after_second", "after_first"]
    );
}
