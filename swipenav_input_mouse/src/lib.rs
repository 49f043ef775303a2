#[macro_use]
extern crate lazy_static;

use rdev::{Event, EventType};
use std::{
    error::Error,
    sync::{
        mpsc,
        mpsc::{Receiver, Sender},
        Arc, Mutex,
    },
    thread,
    time::{Duration, Instant},
};
use swipenav_core::{Button, Machine, PointerEvent};
use tracing::{debug, error, warn};

/// How long after replaying a click its events are let through to the system
const REPLAY_WINDOW: Duration = Duration::from_millis(100);
// Delay between the replayed press and release
const CLICK_DELAY: u64 = 20;

/// A mouse event as reported by the system hook, before positions are filled in
#[derive(Debug, Clone, Copy, PartialEq)]
enum RawInput {
    Press(Button),
    Release(Button),
    Move(f64, f64),
}

/// Listen to the system mouse as a pointer machine
///
/// The hook is process-wide, so every mouse machine sees the same events. Presses and releases
/// of the trigger button are kept from other applications so drawing a gesture does not also
/// open a context menu; `release_click` gives one back.
pub struct MouseMachine {
    last_x: f64,
    last_y: f64,
}

impl MouseMachine {
    pub fn new(trigger: Button) -> Self {
        match HOOK.trigger.lock() {
            Ok(mut t) => *t = trigger,
            Err(_) => error!("mouse hook state poisoned, trigger stays unchanged"),
        }
        Self {
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    /// Turns a raw input into a pointer event. Button events carry no position, so they use
    /// the last position the pointer moved to.
    fn handle_input(&mut self, input: RawInput) -> PointerEvent {
        match input {
            RawInput::Move(x, y) => {
                self.last_x = x;
                self.last_y = y;
                PointerEvent::Move { x, y }
            }
            RawInput::Press(button) => PointerEvent::Down {
                button,
                x: self.last_x,
                y: self.last_y,
            },
            RawInput::Release(button) => PointerEvent::Up {
                button,
                x: self.last_x,
                y: self.last_y,
            },
        }
    }
}

fn from_rdev_button(button: rdev::Button) -> Button {
    match button {
        rdev::Button::Left => Button::Left,
        rdev::Button::Right => Button::Right,
        rdev::Button::Middle => Button::Middle,
        rdev::Button::Unknown(code) => Button::Other(code),
    }
}

fn to_rdev_button(button: Button) -> rdev::Button {
    match button {
        Button::Left => rdev::Button::Left,
        Button::Right => rdev::Button::Right,
        Button::Middle => rdev::Button::Middle,
        Button::Other(code) => rdev::Button::Unknown(code),
    }
}

/// Converts a native event, ignoring everything except mouse buttons and movement
fn convert_event(event_type: &EventType) -> Option<RawInput> {
    match *event_type {
        EventType::ButtonPress(button) => Some(RawInput::Press(from_rdev_button(button))),
        EventType::ButtonRelease(button) => Some(RawInput::Release(from_rdev_button(button))),
        EventType::MouseMove { x, y } => Some(RawInput::Move(x, y)),
        _ => None,
    }
}

/// What the hook does with an event
#[derive(Debug, Clone, Copy, PartialEq)]
enum Verdict {
    /// Pass to the machine and on to the system
    Forward,
    /// Pass to the machine only
    Swallow,
    /// A replayed click: pass to the system only
    Replay,
}

fn verdict(input: &RawInput, trigger: Button, replaying: bool) -> Verdict {
    match *input {
        RawInput::Press(b) | RawInput::Release(b) if b == trigger => {
            if replaying {
                Verdict::Replay
            } else {
                Verdict::Swallow
            }
        }
        _ => Verdict::Forward,
    }
}

/// State shared with the hook thread
struct Hook {
    sender: Arc<Mutex<Sender<RawInput>>>,
    receiver: Arc<Mutex<Receiver<RawInput>>>,
    trigger: Mutex<Button>,
    replayed_at: Mutex<Option<Instant>>,
}

lazy_static! {
    static ref HOOK: Hook = {
        // spawn the grabber here so it's not duplicated
        thread::spawn(|| {
            if let Err(e) = rdev::grab(handle_event) {
                error!("couldn't grab system events: {:?}", e);
            }
        });

        let (sender, receiver) = mpsc::channel();
        Hook {
            sender: Arc::new(Mutex::new(sender)),
            receiver: Arc::new(Mutex::new(receiver)),
            trigger: Mutex::new(Button::default()),
            replayed_at: Mutex::new(None),
        }
    };
}

impl Machine for MouseMachine {
    fn read(&mut self) -> Result<PointerEvent, Box<dyn Error>> {
        let receiver = HOOK
            .receiver
            .lock()
            .map_err(|_| "mouse event receiver poisoned")?;
        // wait for the next mouse event
        let input = receiver.recv()?;
        Ok(self.handle_input(input))
    }

    fn release_click(&mut self, button: Button) {
        debug!("no gesture, replaying {} click", button);
        if let Ok(mut replayed_at) = HOOK.replayed_at.lock() {
            *replayed_at = Some(Instant::now());
        }

        let button = to_rdev_button(button);
        for event_type in &[EventType::ButtonPress(button), EventType::ButtonRelease(button)] {
            if let Err(e) = rdev::simulate(event_type) {
                warn!("couldn't replay click: {:?}", e);
                return;
            }
            thread::sleep(Duration::from_millis(CLICK_DELAY));
        }
    }
}

/// Handle a native event
///
/// This is used in rdev::grab, which only takes a fn pointer, which forces the use of
/// Arc<Mutex> and lazy static. Returning None keeps the event from the system.
fn handle_event(event: Event) -> Option<Event> {
    let input = match convert_event(&event.event_type) {
        Some(input) => input,
        None => return Some(event),
    };

    let trigger = HOOK.trigger.lock().map_or(Button::default(), |t| *t);
    let replaying = HOOK
        .replayed_at
        .lock()
        .map_or(false, |t| t.map_or(false, |at| at.elapsed() < REPLAY_WINDOW));

    let v = verdict(&input, trigger, replaying);
    if v != Verdict::Replay {
        if let Ok(sender) = HOOK.sender.lock() {
            // the receiver lives in the same static, so sending cannot fail
            let _ = sender.send(input);
        }
    }

    match v {
        Verdict::Swallow => None,
        Verdict::Forward | Verdict::Replay => Some(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> MouseMachine {
        MouseMachine {
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    #[test]
    fn convert_mouse_events() {
        assert_eq!(
            convert_event(&EventType::ButtonPress(rdev::Button::Right)),
            Some(RawInput::Press(Button::Right))
        );
        assert_eq!(
            convert_event(&EventType::ButtonRelease(rdev::Button::Unknown(4))),
            Some(RawInput::Release(Button::Other(4)))
        );
        assert_eq!(
            convert_event(&EventType::MouseMove { x: 3.0, y: 4.0 }),
            Some(RawInput::Move(3.0, 4.0))
        );
    }

    #[test]
    fn convert_ignores_other_events() {
        assert_eq!(convert_event(&EventType::KeyPress(rdev::Key::KeyA)), None);
        assert_eq!(
            convert_event(&EventType::Wheel {
                delta_x: 0,
                delta_y: 1
            }),
            None
        );
    }

    #[test]
    fn buttons_round_trip() {
        for b in &[Button::Left, Button::Right, Button::Middle, Button::Other(7)] {
            assert_eq!(from_rdev_button(to_rdev_button(*b)), *b);
        }
    }

    #[test]
    fn trigger_clicks_are_swallowed() {
        let trigger = Button::Right;
        assert_eq!(
            verdict(&RawInput::Press(Button::Right), trigger, false),
            Verdict::Swallow
        );
        assert_eq!(
            verdict(&RawInput::Release(Button::Right), trigger, false),
            Verdict::Swallow
        );
    }

    #[test]
    fn other_events_are_forwarded() {
        let trigger = Button::Right;
        assert_eq!(
            verdict(&RawInput::Press(Button::Left), trigger, false),
            Verdict::Forward
        );
        assert_eq!(
            verdict(&RawInput::Release(Button::Middle), trigger, true),
            Verdict::Forward
        );
        assert_eq!(
            verdict(&RawInput::Move(10.0, 10.0), trigger, false),
            Verdict::Forward
        );
        assert_eq!(
            verdict(&RawInput::Press(Button::Right), Button::Middle, false),
            Verdict::Forward
        );
    }

    #[test]
    fn replayed_clicks_reach_the_system() {
        assert_eq!(
            verdict(&RawInput::Press(Button::Right), Button::Right, true),
            Verdict::Replay
        );
        assert_eq!(
            verdict(&RawInput::Release(Button::Right), Button::Right, true),
            Verdict::Replay
        );
    }

    #[test]
    fn buttons_use_last_position() {
        let mut m = machine();
        assert_eq!(
            m.handle_input(RawInput::Press(Button::Right)),
            PointerEvent::Down {
                button: Button::Right,
                x: 0.0,
                y: 0.0
            }
        );
        m.handle_input(RawInput::Move(120.0, 40.0));
        m.handle_input(RawInput::Move(130.0, -60.0));
        assert_eq!(
            m.handle_input(RawInput::Release(Button::Right)),
            PointerEvent::Up {
                button: Button::Right,
                x: 130.0,
                y: -60.0
            }
        );
    }

    #[test]
    fn moves_pass_through() {
        let mut m = machine();
        assert_eq!(
            m.handle_input(RawInput::Move(5.5, 6.5)),
            PointerEvent::Move { x: 5.5, y: 6.5 }
        );
    }
}
