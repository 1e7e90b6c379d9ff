mod shell;
mod utils;

use agent_host::{AssistantDrawer, ConversationController, SubmitOutcome, QUICK_ACTIONS};
use anyhow::Result;
use providers::CompletionGateway;
use shared::views::AppView;
use shell::{Command, Transcript, HELP};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (mut settings, loaded) = utils::load_settings_or_default();
    if !loaded {
        tracing::info!("no settings file found, using defaults");
    }
    settings.override_credential(utils::env_credential());

    let gateway = CompletionGateway::gemini(&settings.gemini)?;
    if !gateway.has_credential() {
        tracing::warn!("no Gemini API key configured; set GEMINI_API_KEY or API_KEY");
    }
    tracing::info!(model = gateway.model(), "assistant ready");

    let controller = ConversationController::new(Arc::new(gateway), Handle::current());
    let drawer = AssistantDrawer::new(controller);
    run(drawer, &settings.user_name).await
}

async fn run(mut drawer: AssistantDrawer, user_name: &str) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut transcript = Transcript::default();

    println!("SyncSpace - {} (type /help)", drawer.view().display_name());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle(&mut drawer, &mut transcript, Command::parse(&line), user_name) {
                    break;
                }
                render(&drawer, &mut transcript);
            }
            _ = ticker.tick() => {
                if drawer.controller_mut().poll() > 0 {
                    render(&drawer, &mut transcript);
                }
            }
        }
    }

    if drawer.controller().is_pending() {
        tracing::info!("exiting with a reply still outstanding");
    }
    Ok(())
}

/// Apply one command. Returns false when the shell should exit.
fn handle(
    drawer: &mut AssistantDrawer,
    transcript: &mut Transcript,
    command: Command,
    user_name: &str,
) -> bool {
    match command {
        Command::Empty => {}
        Command::Quit => return false,
        Command::Help => println!("{}", HELP),
        Command::View(name) => match AppView::from_str(&name) {
            Some(view) => {
                drawer.set_view(view);
                println!("-- {}", view.display_name());
            }
            None => println!("unknown view: {}", name),
        },
        Command::Ask(prompt) => {
            let fresh = !drawer.is_open();
            let outcome = drawer.ask_ai(&prompt);
            // A hidden drawer only restarts the log when the prompt went out
            if fresh && outcome.is_sent() {
                transcript.clear();
            }
            report(outcome);
        }
        Command::Open => {
            drawer.open();
            show_zero_state(drawer, user_name);
        }
        Command::Close => {
            drawer.close();
            println!("-- assistant hidden");
        }
        Command::Toggle => {
            drawer.toggle();
            if drawer.is_open() {
                show_zero_state(drawer, user_name);
            } else {
                println!("-- assistant hidden");
            }
        }
        Command::Quick(id) => {
            if drawer.apply_quick_action(&id) {
                println!("input: {}", drawer.input());
            } else {
                println!("unknown quick action: {}", id);
            }
        }
        Command::Reset => {
            drawer.controller_mut().reset();
            transcript.clear();
            println!("-- conversation cleared");
        }
        Command::Send(text) => {
            if !drawer.is_open() {
                drawer.open();
            }
            // Typing after a quick action completes its template
            let template = drawer.input().to_string();
            drawer.set_input(format!("{}{}", template, text));
            let outcome = drawer.send_input();
            if !outcome.is_sent() {
                drawer.set_input(template);
            }
            report(outcome);
        }
        Command::Unknown(name) => println!("unknown command: /{} (try /help)", name),
    }
    true
}

fn report(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Sent => {}
        SubmitOutcome::Blank => println!("nothing to send"),
        SubmitOutcome::Busy => println!("still waiting for the last reply"),
        SubmitOutcome::AlreadySeeded => println!("prompt already sent"),
    }
}

fn show_zero_state(drawer: &AssistantDrawer, user_name: &str) {
    if let Some(greeting) = drawer.greeting(user_name) {
        println!("{}", greeting);
        for action in QUICK_ACTIONS {
            println!("  /quick {:<8} {}", action.id, action.label);
        }
    }
}

fn render(drawer: &AssistantDrawer, transcript: &mut Transcript) {
    for line in transcript.take_new(drawer.controller().messages()) {
        println!("{}", line);
    }
    if drawer.controller().is_pending() {
        println!("  ...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use providers::Completion;
    use shared::agent_api::Turn;

    struct Echo;

    #[async_trait]
    impl Completion for Echo {
        async fn complete(&self, _history: &[Turn], prompt: &str, _context: Option<&str>) -> String {
            format!("re: {}", prompt)
        }
    }

    fn drawer() -> AssistantDrawer {
        AssistantDrawer::new(ConversationController::new(Arc::new(Echo), Handle::current()))
    }

    #[tokio::test]
    async fn test_blank_ask_on_hidden_drawer_does_not_reprint_log() {
        let mut d = drawer();
        let mut transcript = Transcript::default();

        assert!(handle(&mut d, &mut transcript, Command::Ask("first".into()), "Matt"));
        d.controller_mut().settle().await;
        assert_eq!(transcript.take_new(d.controller().messages()).len(), 2);

        handle(&mut d, &mut transcript, Command::Close, "Matt");
        handle(&mut d, &mut transcript, Command::Ask(String::new()), "Matt");

        assert_eq!(d.controller().messages().len(), 2);
        assert!(transcript.take_new(d.controller().messages()).is_empty());
    }

    #[tokio::test]
    async fn test_ask_on_hidden_drawer_prints_fresh_log() {
        let mut d = drawer();
        let mut transcript = Transcript::default();

        handle(&mut d, &mut transcript, Command::Ask("first".into()), "Matt");
        d.controller_mut().settle().await;
        transcript.take_new(d.controller().messages());
        handle(&mut d, &mut transcript, Command::Close, "Matt");

        handle(&mut d, &mut transcript, Command::Ask("second".into()), "Matt");
        d.controller_mut().settle().await;

        let lines = transcript.take_new(d.controller().messages());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("You: second"));
    }

    #[tokio::test]
    async fn test_quit_stops_the_shell() {
        let mut d = drawer();
        let mut transcript = Transcript::default();
        assert!(!handle(&mut d, &mut transcript, Command::Quit, "Matt"));
    }
}
