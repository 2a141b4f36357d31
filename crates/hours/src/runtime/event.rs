use std::time::Duration;

use crossterm::event::Event;
use tokio::sync::mpsc;

use crate::app::{App, Message};
use crate::runtime::{EventResult, key_handler};

pub(crate) fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::poll(Duration::from_millis(250)) {
                Ok(true) => {
                    if let Ok(event) = crossterm::event::read()
                        && event_tx.send(event).is_err()
                    {
                        break;
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    });
}

/// Waits for a terminal event, a command result, or the redraw tick, then
/// handles everything already queued before the next frame.
pub(crate) async fn process_events(
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    tick: &mut tokio::time::Interval,
) -> EventResult {
    enum LoopSignal {
        Event(Option<Event>),
        Message(Option<Message>),
        Tick,
    }

    let signal = tokio::select! {
        biased;
        event = event_rx.recv() => LoopSignal::Event(event),
        message = app.next_message() => LoopSignal::Message(message),
        _ = tick.tick() => LoopSignal::Tick,
    };
    match signal {
        LoopSignal::Event(Some(event)) => process_event(app, event),
        // The reader thread only stops when the terminal is gone.
        LoopSignal::Event(None) => return EventResult::Quit,
        LoopSignal::Message(Some(message)) => app.handle_message(message),
        LoopSignal::Message(None) | LoopSignal::Tick => {}
    }
    if app.should_quit() {
        return EventResult::Quit;
    }

    while let Ok(event) = event_rx.try_recv() {
        process_event(app, event);
        if app.should_quit() {
            return EventResult::Quit;
        }
    }
    while let Some(message) = app.try_next_message() {
        app.handle_message(message);
    }

    EventResult::Continue
}

fn process_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => key_handler::handle_key_event(app, key),
        Event::Resize(width, height) => app.handle_resize(width, height),
        _ => {}
    }
}
