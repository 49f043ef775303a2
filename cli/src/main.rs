use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::{error::Error, fs::File, io::BufReader, path::Path, process};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use swipenav_core::{
    ActionMap, ActionSurface, Gesture, GestureSession, Machine, Outcome, PointerEvent,
    TrailRecorder,
};
use swipenav_input_stdin::{MachineError, TextMachine};
use swipenav_recognizer::{TemplateRecognizer, TemplateSet};

mod config;
mod feedback;

use config::{Config, StdoutController};
use feedback::LogFeedback;

fn main() {
    let matches = App::new("swipenav")
        .version("0.1.0")
        .about(
            "Mouse gesture navigation. Hold the trigger button (right by default), draw a
stroke made of up/down/left/right segments and release to run the bound action.",
        )
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("config")
                .long("config")
                .global(true)
                .takes_value(true)
                .help("Config file (defaults to <config dir>/swipenav/config.toml)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Log every gesture step"),
        )
        .arg(
            Arg::with_name("stdin")
                .long("stdin")
                .global(true)
                .help("Type pointer events on stdin instead of using the mouse"),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Recognize gestures and run their actions (default)")
                .arg(
                    Arg::with_name("stdout")
                        .long("stdout")
                        .help("Print actions instead of pressing shortcuts"),
                )
                .arg(
                    Arg::with_name("replay")
                        .long("replay")
                        .takes_value(true)
                        .value_name("FILE")
                        .help("Read pointer events from a file, one per line"),
                ),
        )
        .subcommand(
            SubCommand::with_name("record")
                .about("Draw one stroke and save it as a template for the template recognizer")
                .arg(
                    Arg::with_name("GESTURE")
                        .required(true)
                        .help("Gesture the stroke stands for, such as up+right or UD_REPEAT"),
                )
                .arg(
                    Arg::with_name("templates")
                        .long("templates")
                        .takes_value(true)
                        .help("Template file to add to"),
                ),
        )
        .subcommand(SubCommand::with_name("list").about("Show which action each gesture runs"))
        .get_matches();

    let (name, sub) = matches.subcommand();
    let global_flag =
        |flag: &str| matches.is_present(flag) || sub.map_or(false, |m| m.is_present(flag));

    // RUST_LOG wins over --verbose
    let default_level = if global_flag("verbose") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = sub
        .and_then(|m| m.value_of("config"))
        .or_else(|| matches.value_of("config"));
    let config = match config::load_from(config_path.map(Path::new)) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let use_stdin = global_flag("stdin");
    let result = match (name, sub) {
        ("record", Some(m)) => record(&config, m, use_stdin),
        ("list", _) => list(&config),
        (_, m) => run(&config, m, use_stdin),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(config: &Config, args: Option<&ArgMatches>, use_stdin: bool) -> Result<(), Box<dyn Error>> {
    let use_stdout = args.map_or(false, |m| m.is_present("stdout"));
    let mut machine: Box<dyn Machine> = match args.and_then(|m| m.value_of("replay")) {
        Some(path) => {
            info!("Replaying pointer events from {}", path);
            Box::new(TextMachine::from_reader(BufReader::new(File::open(path)?)))
        }
        None => config.get_input_machine(use_stdin),
    };
    let mut controller = config.get_output_controller(use_stdout)?;

    let mut session = GestureSession::new(config.get_recognizer()?, config.action_map()?)
        .with_trigger(config.trigger)
        .with_feedback(Box::new(LogFeedback));

    info!("Ready. Hold the {} button and draw a gesture", session.trigger());
    loop {
        let event = match machine.read() {
            Ok(event) => event,
            Err(e) if is_end_of_input(&*e) => {
                info!("End of input");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        step(&mut session, &mut *machine, &mut controller, event);
    }
}

/// Run one event through the session. A trigger click that drew no gesture goes back to the
/// system, so a plain click still opens the context menu.
fn step<S: ActionSurface + ?Sized>(
    session: &mut GestureSession,
    machine: &mut dyn Machine,
    surface: &mut S,
    event: PointerEvent,
) -> Outcome {
    let outcome = session.handle(event, surface);
    if let Outcome::Finished { gesture: None, .. } = outcome {
        machine.release_click(session.trigger());
    }
    outcome
}

fn record(config: &Config, args: &ArgMatches, use_stdin: bool) -> Result<(), Box<dyn Error>> {
    let gesture: Gesture = args.value_of("GESTURE").unwrap_or_default().parse()?;
    let path = match args.value_of("templates") {
        Some(p) => Path::new(p).to_path_buf(),
        None => config.templates_path()?,
    };

    let mut machine = config.get_input_machine(use_stdin);
    let recorder = TrailRecorder::new();
    // nothing is bound, so finishing the stroke runs no action
    let recognizer = config.segment_recognizer()?;
    let mut session = GestureSession::new(Box::new(recognizer), ActionMap::empty())
        .with_trigger(config.trigger)
        .with_trail(Box::new(recorder.clone()));

    info!(
        "Hold the {} button and draw {} ({})",
        session.trigger(),
        gesture,
        gesture.arrows()
    );
    loop {
        let event = match machine.read() {
            Ok(event) => event,
            Err(e) if is_end_of_input(&*e) => {
                return Err("input ended before a stroke was drawn".into());
            }
            Err(e) => return Err(e),
        };
        let outcome = session.handle(event, &mut StdoutController);
        if let Outcome::Finished { gesture: seen, .. } = outcome {
            if seen != Some(gesture) {
                warn!(
                    "Stroke looks like {} to the segment recognizer, saving it as {} anyway",
                    seen.map_or_else(|| "nothing".to_owned(), |g| g.to_string()),
                    gesture
                );
            }
            break;
        }
    }

    let points = recorder.points();
    // reject strokes that can't be matched against
    TemplateRecognizer::default().add_template(gesture, &points)?;

    let mut set = TemplateSet::load(&path)?;
    set.push(gesture, points);
    set.save(&path)?;
    info!(
        "Saved template for {} to {:?} ({} templates)",
        gesture,
        path,
        set.0.len()
    );
    Ok(())
}

fn list(config: &Config) -> Result<(), Box<dyn Error>> {
    let map = config.action_map()?;
    for gesture in Gesture::all() {
        let action = map.get(gesture).map_or("-", |a| a.description());
        println!("{:<12} {:<3} {}", gesture.to_string(), gesture.arrows(), action);
    }
    Ok(())
}

fn is_end_of_input(e: &(dyn Error + 'static)) -> bool {
    matches!(e.downcast_ref::<MachineError>(), Some(MachineError::Eof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipenav_core::{Action, Button, Controller};
    use swipenav_recognizer::SegmentRecognizer;

    /// Machine that only records the clicks it is asked to give back
    #[derive(Default)]
    struct Clicks(Vec<Button>);

    impl Machine for Clicks {
        fn read(&mut self) -> Result<PointerEvent, Box<dyn Error>> {
            Err(Box::new(MachineError::Eof))
        }

        fn release_click(&mut self, button: Button) {
            self.0.push(button);
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<Action>);

    impl Controller for Recorder {
        fn dispatch(&mut self, action: Action) {
            self.0.push(action);
        }
    }

    fn session() -> GestureSession {
        GestureSession::new(Box::new(SegmentRecognizer::new()), ActionMap::default())
    }

    fn stroke(points: &[(f64, f64)]) -> Vec<PointerEvent> {
        let (x, y) = points[0];
        let mut events = vec![PointerEvent::Down {
            button: Button::Right,
            x,
            y,
        }];
        events.extend(points[1..].iter().map(|&(x, y)| PointerEvent::Move { x, y }));
        let (x, y) = points[points.len() - 1];
        events.push(PointerEvent::Up {
            button: Button::Right,
            x,
            y,
        });
        events
    }

    fn feed(events: Vec<PointerEvent>) -> (Clicks, Recorder) {
        let mut session = session();
        let mut machine = Clicks::default();
        let mut controller = Recorder::default();
        for event in events {
            step(&mut session, &mut machine, &mut controller, event);
        }
        (machine, controller)
    }

    #[test]
    fn plain_click_is_given_back() {
        let (machine, controller) = feed(stroke(&[(10.0, 10.0), (12.0, 11.0)]));
        assert_eq!(machine.0, vec![Button::Right]);
        assert!(controller.0.is_empty());
    }

    #[test]
    fn gesture_keeps_the_click() {
        let (machine, controller) = feed(stroke(&[(0.0, 0.0), (0.0, -100.0), (100.0, -100.0)]));
        assert!(machine.0.is_empty());
        assert_eq!(controller.0, vec![Action::NewTab]);
    }

    #[test]
    fn other_buttons_are_not_given_back() {
        let mut session = session();
        let mut machine = Clicks::default();
        let mut controller = Recorder::default();
        for button in &[Button::Left, Button::Middle] {
            step(
                &mut session,
                &mut machine,
                &mut controller,
                PointerEvent::Down {
                    button: *button,
                    x: 0.0,
                    y: 0.0,
                },
            );
            step(
                &mut session,
                &mut machine,
                &mut controller,
                PointerEvent::Up {
                    button: *button,
                    x: 0.0,
                    y: 0.0,
                },
            );
        }
        assert!(machine.0.is_empty());
    }
}
