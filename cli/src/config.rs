use serde::Deserialize;
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, warn};

use swipenav_core::{
    Action, ActionMap, Button, Controller, Gesture, Keymap, Machine, Recognizer, Shortcut,
};
use swipenav_input_mouse::MouseMachine;
use swipenav_input_stdin::TextMachine;
use swipenav_output_enigo::EnigoController;
use swipenav_recognizer::{
    SegmentRecognizer, TemplateError, TemplateRecognizer, TemplateSet, DEFAULT_MIN_SCORE,
    DEFAULT_THRESHOLD,
};

const APP_DIR: &str = "swipenav";
const CONFIG_FILE: &str = "config.toml";
const TEMPLATES_FILE: &str = "templates.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown gesture in [gestures]: {0}")]
    UnknownGesture(String),

    #[error("unknown action in [shortcuts]: {0}")]
    UnknownAction(String),

    #[error("threshold must be a positive number of pixels, got {0}")]
    Threshold(f64),

    #[error("min_score must be between 0 and 1, got {0}")]
    MinScore(f64),

    #[error("no config directory on this system, pass a path explicitly")]
    NoConfigDir,

    #[error(transparent)]
    Templates(#[from] TemplateError),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    input_machine: InputMachineType,
    #[serde(default)]
    output_dispatcher: OutputDispatchType,
    #[serde(default)]
    pub trigger: Button,
    #[serde(default)]
    recognizer: RecognizerType,
    #[serde(default = "default_threshold")]
    threshold: f64,
    #[serde(default)]
    templates: Option<PathBuf>,
    #[serde(default = "default_min_score")]
    min_score: f64,
    /// Gesture (as written by `Gesture`'s display) to the action it should run
    #[serde(default)]
    gestures: HashMap<String, Action>,
    /// Action name to the keyboard shortcut that carries it out
    #[serde(default)]
    shortcuts: HashMap<String, Shortcut>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_machine: Default::default(),
            output_dispatcher: Default::default(),
            trigger: Default::default(),
            recognizer: Default::default(),
            threshold: DEFAULT_THRESHOLD,
            templates: None,
            min_score: DEFAULT_MIN_SCORE,
            gestures: HashMap::new(),
            shortcuts: HashMap::new(),
        }
    }
}

impl Config {
    /// Creates an input machine from the config.
    /// Accepts an override to ignore config and use stdin
    pub fn get_input_machine(&self, use_stdin: bool) -> Box<dyn Machine> {
        let input = if use_stdin {
            info!("Overriding config to use input from stdin");
            &InputMachineType::Stdin
        } else {
            &self.input_machine
        };
        info!("Input from: {:?}", input);
        match input {
            InputMachineType::Stdin => Box::new(TextMachine::stdin()) as Box<dyn Machine>,
            InputMachineType::Mouse => {
                Box::new(MouseMachine::new(self.trigger)) as Box<dyn Machine>
            }
        }
    }

    /// Create an output controller from the config
    /// Accepts an override to ignore config and use stdout
    pub fn get_output_controller(
        &self,
        use_stdout: bool,
    ) -> Result<Box<dyn Controller>, ConfigError> {
        let output = if use_stdout {
            info!("Overriding config to output to stdout");
            &OutputDispatchType::Stdout
        } else {
            &self.output_dispatcher
        };
        info!("Output to: {:?}", output);
        Ok(match output {
            OutputDispatchType::Enigo => {
                Box::new(EnigoController::new(self.keymap()?)) as Box<dyn Controller>
            }
            OutputDispatchType::Stdout => Box::new(StdoutController) as Box<dyn Controller>,
        })
    }

    /// Create the recognizer backend, loading templates if it needs them
    pub fn get_recognizer(&self) -> Result<Box<dyn Recognizer>, ConfigError> {
        match self.recognizer {
            RecognizerType::Segment => {
                info!("Using segment recognizer, threshold {}px", self.threshold);
                Ok(Box::new(self.segment_recognizer()?))
            }
            RecognizerType::Template => {
                if !(0.0..=1.0).contains(&self.min_score) {
                    return Err(ConfigError::MinScore(self.min_score));
                }
                let path = self.templates_path()?;
                let set = TemplateSet::load(&path)?;
                let recognizer = TemplateRecognizer::from_set(&set, self.min_score);
                if recognizer.is_empty() {
                    warn!("No templates in {:?}, nothing will be recognized", path);
                } else {
                    info!("Loaded {} templates from {:?}", recognizer.len(), path);
                }
                Ok(Box::new(recognizer))
            }
        }
    }

    /// A segment recognizer with the configured threshold
    pub fn segment_recognizer(&self) -> Result<SegmentRecognizer, ConfigError> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        Ok(SegmentRecognizer::with_threshold(self.threshold))
    }

    /// The default gesture table with the config's rebindings applied
    pub fn action_map(&self) -> Result<ActionMap, ConfigError> {
        let mut overrides = HashMap::with_capacity(self.gestures.len());
        for (name, action) in &self.gestures {
            let gesture: Gesture = name
                .parse()
                .map_err(|_| ConfigError::UnknownGesture(name.clone()))?;
            overrides.insert(gesture, *action);
        }
        Ok(ActionMap::default().with_overrides(overrides))
    }

    /// The default keymap with the config's shortcuts applied
    pub fn keymap(&self) -> Result<Keymap, ConfigError> {
        let mut overrides = HashMap::with_capacity(self.shortcuts.len());
        for (name, shortcut) in &self.shortcuts {
            let action =
                parse_action(name).ok_or_else(|| ConfigError::UnknownAction(name.clone()))?;
            overrides.insert(action, shortcut.clone());
        }
        Ok(Keymap::default().with_overrides(overrides))
    }

    /// Where recorded templates live: the configured path or the default one
    pub fn templates_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.templates {
            Some(path) => Ok(path.clone()),
            None => Ok(app_dir()?.join(TEMPLATES_FILE)),
        }
    }
}

fn parse_action(name: &str) -> Option<Action> {
    Action::ALL
        .iter()
        .copied()
        .find(|a| format!("{:?}", a) == name)
}

fn app_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn load(raw_str: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str::<Config>(raw_str)?)
}

/// Load the config at the given path, or from the default location when none is given.
/// A missing default config means all defaults; a missing explicit config is an error.
pub fn load_from(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default_path = app_dir()?.join(CONFIG_FILE);
            if !default_path.exists() {
                info!("No config at {:?}, using defaults", default_path);
                return Ok(Config::default());
            }
            default_path
        }
    };

    info!("Loading config from {:?}", path);
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    load(&raw)
}

#[derive(Debug, Deserialize)]
enum InputMachineType {
    Stdin,
    Mouse,
}

impl Default for InputMachineType {
    fn default() -> Self {
        Self::Mouse
    }
}

#[derive(Debug, Deserialize)]
enum OutputDispatchType {
    Enigo,
    Stdout,
}

impl Default for OutputDispatchType {
    fn default() -> Self {
        Self::Enigo
    }
}

#[derive(Debug, Deserialize)]
enum RecognizerType {
    Segment,
    Template,
}

impl Default for RecognizerType {
    fn default() -> Self {
        Self::Segment
    }
}

/// Prints actions instead of performing them
pub struct StdoutController;

impl Controller for StdoutController {
    fn dispatch(&mut self, action: Action) {
        println!("{:?}", action);
    }
}
