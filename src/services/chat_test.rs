use super::*;
use crate::rate_limit::RateLimitConfig;
use crate::state::test_helpers::sample_hotel;

fn request(session_id: Uuid, message: &str) -> ChatRequest {
    ChatRequest { session_id, message: message.into() }
}

fn assistant() -> SimulatedAssistant {
    SimulatedAssistant::new(Duration::ZERO)
}

#[test]
fn simulated_reply_quotes_the_question() {
    assert_eq!(
        simulated_reply("parking"),
        "You asked about \"parking\". Here's a helpful response from the AI."
    );
}

#[tokio::test]
async fn replies_when_enabled() {
    let hotel = sample_hotel();
    let reply = handle_message(&assistant(), &RateLimiter::new(), &hotel, &request(Uuid::new_v4(), " Is breakfast included? "))
        .await
        .unwrap();
    assert_eq!(reply.role, "assistant");
    assert_eq!(reply.content, simulated_reply("Is breakfast included?"));
}

#[tokio::test]
async fn disabled_hotel_rejects_chat() {
    let mut hotel = sample_hotel();
    hotel.chatbot_enabled = false;
    let err = handle_message(&assistant(), &RateLimiter::new(), &hotel, &request(Uuid::new_v4(), "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Disabled));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let err = handle_message(&assistant(), &RateLimiter::new(), &sample_hotel(), &request(Uuid::new_v4(), "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::EmptyMessage));
}

#[tokio::test]
async fn session_is_rate_limited() {
    let limiter = RateLimiter::with_config(RateLimitConfig {
        per_client_limit: 2,
        per_client_window: std::time::Duration::from_secs(60),
        global_limit: 100,
        global_window: std::time::Duration::from_secs(60),
    });
    let hotel = sample_hotel();
    let session = Uuid::new_v4();

    for _ in 0..2 {
        handle_message(&assistant(), &limiter, &hotel, &request(session, "hi")).await.unwrap();
    }
    let err = handle_message(&assistant(), &limiter, &hotel, &request(session, "hi")).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another visitor is unaffected.
    assert!(handle_message(&assistant(), &limiter, &hotel, &request(Uuid::new_v4(), "hi")).await.is_ok());
}

#[tokio::test]
async fn simulated_assistant_waits_for_typing_delay() {
    let slow = SimulatedAssistant::new(Duration::from_millis(40));
    let started = std::time::Instant::now();
    let reply = slow.reply(&sample_hotel(), "late checkout").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(40));
    assert_eq!(reply, simulated_reply("late checkout"));
}
