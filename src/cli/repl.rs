//! Line-mode chat loop

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::ChatTransport;
use crate::core::config::Settings;
use crate::core::scheduler::TokioScheduler;
use crate::core::session::{ConversationSession, SessionUpdate};
use crate::ui::renderer::{render_error, render_message};
use crate::ui::syntax::{Highlighter, PlainHighlighter, SyntectHighlighter};
use crate::ui::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Submit(String),
    Cancel,
    New,
    Quit,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/cancel" => ReplCommand::Cancel,
            "/new" => ReplCommand::New,
            "/quit" | "/exit" => ReplCommand::Quit,
            _ => ReplCommand::Submit(line.to_string()),
        }
    }
}

/// Writes session updates to a terminal-like sink.
pub struct ReplPrinter<W: Write> {
    out: W,
    markdown: bool,
    theme: Theme,
    highlighter: Box<dyn Highlighter>,
    shown: usize,
    failed: bool,
}

impl<W: Write> ReplPrinter<W> {
    pub fn new(out: W, markdown: bool, theme: Theme, highlighter: Box<dyn Highlighter>) -> Self {
        Self {
            out,
            markdown,
            theme,
            highlighter,
            shown: 0,
            failed: false,
        }
    }

    pub fn from_settings(out: W, settings: &Settings) -> Self {
        let highlighter: Box<dyn Highlighter> = if settings.syntax {
            Box::new(SyntectHighlighter::new())
        } else {
            Box::new(PlainHighlighter)
        };
        Self::new(
            out,
            settings.markdown,
            Theme::from_name(&settings.theme),
            highlighter,
        )
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn show(&mut self, update: &SessionUpdate) -> io::Result<()> {
        match update {
            SessionUpdate::Streaming(text) => {
                let fresh = text.get(self.shown..).unwrap_or(text);
                write!(self.out, "{fresh}")?;
                self.out.flush()?;
                self.shown = text.len();
            }
            SessionUpdate::MessageAppended(message) if message.is_assistant() => {
                if std::mem::take(&mut self.failed) {
                    for line in render_error(&message.content, &self.theme) {
                        writeln!(self.out, "{line}")?;
                    }
                } else if self.markdown {
                    // The revealed words were raw; follow them with the rendered reply
                    if self.shown > 0 {
                        writeln!(self.out)?;
                    }
                    let lines = render_message(
                        message,
                        &self.theme,
                        self.highlighter.as_ref(),
                        true,
                    );
                    for line in lines {
                        writeln!(self.out, "{line}")?;
                    }
                } else {
                    let rest = message.content.get(self.shown..).unwrap_or_default();
                    writeln!(self.out, "{rest}")?;
                }
                self.shown = 0;
                self.out.flush()?;
            }
            SessionUpdate::MessageAppended(_) => {}
            SessionUpdate::RequestFailed(_) => {
                self.shown = 0;
                self.failed = true;
            }
        }
        Ok(())
    }

    /// Forget partially printed text, e.g. after the reveal was dropped.
    pub fn interrupt(&mut self) -> io::Result<()> {
        if self.shown > 0 {
            writeln!(self.out)?;
            self.shown = 0;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub async fn run(transport: Arc<dyn ChatTransport>, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let mut session = ConversationSession::new(transport, Arc::new(TokioScheduler))
        .with_tick_interval(settings.tick_interval);
    let mut printer = ReplPrinter::from_settings(io::stdout(), settings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            updates = session.next_update() => {
                for update in &updates {
                    if let SessionUpdate::RequestFailed(summary) = update {
                        for line in render_error(&format!("Error: {summary}"), printer.theme()) {
                            eprintln!("{line}");
                        }
                    }
                    printer.show(update)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match ReplCommand::parse(&line) {
                    ReplCommand::Quit => break,
                    ReplCommand::Cancel => {
                        let updates = session.cancel();
                        if updates.is_empty() {
                            printer.interrupt()?;
                        }
                        for update in &updates {
                            printer.show(update)?;
                        }
                    }
                    ReplCommand::New => {
                        session.reset();
                        printer.interrupt()?;
                        println!("Started a new conversation.");
                    }
                    ReplCommand::Submit(text) => {
                        if text.trim().is_empty() {
                            continue;
                        }
                        if !session.submit(text) {
                            eprintln!("Still answering; type /cancel to stop the reply.");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Message, MessageId, Role};

    fn printer(markdown: bool) -> ReplPrinter<Vec<u8>> {
        ReplPrinter::new(
            Vec::new(),
            markdown,
            Theme::monochrome(),
            Box::new(PlainHighlighter),
        )
    }

    fn output(printer: ReplPrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).expect("utf8")
    }

    fn assistant(text: &str) -> SessionUpdate {
        SessionUpdate::MessageAppended(Message::new(MessageId(2), Role::Assistant, text))
    }

    #[test]
    fn commands_parse() {
        assert_eq!(ReplCommand::parse("/cancel"), ReplCommand::Cancel);
        assert_eq!(ReplCommand::parse(" /new "), ReplCommand::New);
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse("/unknown thing"),
            ReplCommand::Submit("/unknown thing".into())
        );
    }

    #[test]
    fn raw_mode_prints_only_new_words() {
        let mut p = printer(false);
        p.show(&SessionUpdate::Streaming("a".into())).expect("show");
        p.show(&SessionUpdate::Streaming("a b".into())).expect("show");
        p.show(&assistant("a b")).expect("show");

        assert_eq!(output(p), "a b\n");
    }

    #[test]
    fn markdown_mode_reveals_words_then_prints_rendered_message() {
        let mut p = printer(true);
        for prefix in ["Here", "Here is", "Here is the", "Here is the **answer**"] {
            p.show(&SessionUpdate::Streaming(prefix.into())).expect("show");
        }
        let revealed = String::from_utf8(p.out.clone()).expect("utf8");
        assert_eq!(revealed, "Here is the **answer**");

        p.show(&assistant("Here is the **answer**")).expect("show");
        assert_eq!(
            output(p),
            "Here is the **answer**\nHere is the answer\n"
        );
    }

    #[test]
    fn markdown_message_without_reveal_has_no_leading_newline() {
        let mut p = printer(true);
        p.show(&assistant("# Hi\n- **one**")).expect("show");
        assert_eq!(output(p), "Hi\n- one\n");
    }

    #[test]
    fn failure_diagnostic_is_printed_verbatim() {
        let mut p = printer(true);
        p.show(&SessionUpdate::RequestFailed("HTTP 500".into()))
            .expect("show");
        p.show(&assistant("Sorry, **no**.")).expect("show");
        p.show(&assistant("# Next")).expect("show");
        assert_eq!(output(p), "Sorry, **no**.\nNext\n");
    }

    #[test]
    fn user_messages_are_not_echoed() {
        let mut p = printer(false);
        p.show(&SessionUpdate::MessageAppended(Message::new(
            MessageId(1),
            Role::User,
            "hello",
        )))
        .expect("show");
        assert_eq!(output(p), "");
    }

    #[test]
    fn interrupt_ends_partial_line() {
        let mut p = printer(false);
        p.show(&SessionUpdate::Streaming("half".into())).expect("show");
        p.interrupt().expect("interrupt");
        p.interrupt().expect("interrupt");
        assert_eq!(output(p), "half\n");
    }
}
