//! `lightnavi chat` — Interactive or single-message session.
//!
//! The terminal is the presentation layer: it renders turns, shows a loading
//! marker while the session awaits the service, and feeds each line to the
//! orchestrator. It holds no extraction or merge logic of its own.
//!
//! Input keeps being read while a call is outstanding. Lines typed during the
//! wait go to the orchestrator, which rejects them as busy; they are never
//! replayed after the reply arrives.

use std::io::Write;
use std::sync::Arc;

use lightnavi_agent::{ContextSummary, DialogueOrchestrator, IgnoreReason, Submission};
use lightnavi_config::AppConfig;
use lightnavi_core::event::{DomainEvent, EventBus};
use lightnavi_core::service::RecommendationService;
use lightnavi_service::HttpRecommendationService;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::render::render_turn;

/// Run one utterance through the session, driving the call ourselves so the
/// loading marker reflects the awaiting-response state.
///
/// `input` is polled alongside the call; every line read meanwhile is handed
/// to the orchestrator and reported as ignored.
async fn exchange<R>(
    dialogue: &mut DialogueOrchestrator,
    service: &dyn RecommendationService,
    utterance: &str,
    input: &mut Lines<R>,
) -> std::io::Result<Submission>
where
    R: AsyncBufRead + Unpin,
{
    let request = match dialogue.begin(utterance) {
        Ok(request) => request,
        Err(reason) => return Ok(Submission::Ignored(reason)),
    };

    eprint!("  ...");
    let call = service.recommend(request);
    tokio::pin!(call);

    let mut input_open = true;
    let result = loop {
        tokio::select! {
            result = &mut call => break result,
            line = input.next_line(), if input_open => match line? {
                Some(line) => {
                    if let Err(IgnoreReason::Busy) = dialogue.begin(&line) {
                        eprint!("\r  (waiting for the previous reply, input ignored)\n  ...");
                    }
                }
                None => input_open = false,
            },
        }
    };
    eprint!("\r     \r");

    Ok(dialogue.resolve(result))
}

/// Log every session event at debug level until the bus is dropped.
async fn log_events(mut events: broadcast::Receiver<Arc<DomainEvent>>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let payload = serde_json::to_string(event.as_ref()).unwrap_or_default();
                debug!(event = event.name(), %payload, "Session event");
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_last_turn(dialogue: &DialogueOrchestrator, limit: usize) {
    if let Some(turn) = dialogue.log().last() {
        println!();
        print!("{}", render_turn(turn, limit));
        println!();
    }
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let limit = config.session.candidate_display_limit;

    let service = Arc::new(HttpRecommendationService::from_config(&config)?);
    let event_bus = Arc::new(EventBus::default());
    tokio::spawn(log_events(event_bus.subscribe()));
    let mut dialogue = DialogueOrchestrator::from_config(service.clone(), event_bus, &config);
    debug!(
        session = %dialogue.session_id(),
        endpoint = %config.chat_url(),
        "Session started"
    );

    if let Some(msg) = message {
        // Single message mode: nothing else to read while waiting
        let mut no_input = BufReader::new(io::empty()).lines();
        match exchange(&mut dialogue, service.as_ref(), &msg, &mut no_input).await? {
            Submission::Ignored(_) => return Err("Message is empty".into()),
            _ => print_last_turn(&dialogue, limit),
        }
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        LightNavi — Interactive Session        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Service:   {}", config.chat_url());
    println!("  Commands:  /context  /reset  exit");

    print_last_turn(&dialogue, limit);
    prompt()?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        match line {
            "exit" | "quit" | "/exit" | "/quit" | ":q" => break,
            "/context" => {
                println!();
                print!("{}", ContextSummary::from(dialogue.context()));
                println!();
            }
            "/reset" => {
                if dialogue.reset().is_ok() {
                    print_last_turn(&dialogue, limit);
                }
            }
            _ => {
                let outcome =
                    exchange(&mut dialogue, service.as_ref(), line, &mut lines).await?;
                if !matches!(outcome, Submission::Ignored(_)) {
                    print_last_turn(&dialogue, limit);
                }
            }
        }

        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn slow_backend() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "承知しました"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        server
    }

    fn session(server: &MockServer) -> (Arc<HttpRecommendationService>, DialogueOrchestrator) {
        let service = Arc::new(
            HttpRecommendationService::new(server.uri(), "/api/chat", Duration::from_secs(5))
                .unwrap(),
        );
        let dialogue = DialogueOrchestrator::new(service.clone(), Arc::new(EventBus::default()));
        (service, dialogue)
    }

    #[tokio::test]
    async fn lines_typed_while_waiting_are_rejected_not_queued() {
        let server = slow_backend().await;
        let (service, mut dialogue) = session(&server);
        let mut typed_ahead = BufReader::new("物件名：B\n天井高：3m\n".as_bytes()).lines();

        let outcome = exchange(&mut dialogue, service.as_ref(), "物件名：A", &mut typed_ahead)
            .await
            .unwrap();

        assert_eq!(outcome, Submission::Answered);
        // Typed-ahead input was consumed during the wait.
        assert!(typed_ahead.next_line().await.unwrap().is_none());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
        // welcome + user + reply: the rejected lines left no trace
        assert_eq!(dialogue.log().len(), 3);
        assert_eq!(dialogue.context().property_name.as_deref(), Some("A"));
        assert_eq!(dialogue.context().ceiling_height, None);
    }

    #[tokio::test]
    async fn blank_utterance_never_reaches_the_service() {
        let server = slow_backend().await;
        let (service, mut dialogue) = session(&server);
        let mut no_input = BufReader::new(io::empty()).lines();

        let outcome = exchange(&mut dialogue, service.as_ref(), "   ", &mut no_input)
            .await
            .unwrap();

        assert_eq!(outcome, Submission::Ignored(IgnoreReason::Empty));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn event_logger_stops_when_bus_is_dropped() {
        let bus = EventBus::default();
        let logger = tokio::spawn(log_events(bus.subscribe()));
        bus.publish(DomainEvent::ServiceFailed {
            session_id: "s1".into(),
            error_message: "boom".into(),
            timestamp: chrono::Utc::now(),
        });
        drop(bus);

        tokio::time::timeout(Duration::from_secs(1), logger)
            .await
            .expect("logger should finish")
            .unwrap();
    }
}
