#![allow(dead_code)]
use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
    sync::{Arc, Mutex},
};

use ads1x18::{
    mcu::{Clock, Factory, Mcu, Oid, SensorFactories},
    ConfigError, ConfigSection, Error,
};
use log::{Level, Log, Metadata, Record};

/// Records everything the device asks of the MCU.
#[derive(Debug, Default)]
pub struct Host {
    next_oid: u8,
    pub cmds: Vec<String>,
    pub responses: Vec<(&'static str, Oid)>,
    pub config_callbacks: Vec<Oid>,
}

impl Mcu for Host {
    fn create_oid(&mut self) -> Oid {
        let oid = Oid(self.next_oid);
        self.next_oid += 1;
        oid
    }

    fn add_config_cmd(&mut self, cmd: &str) {
        self.cmds.push(cmd.to_string());
    }

    fn register_response(&mut self, name: &'static str, oid: Oid) {
        self.responses.push((name, oid));
    }

    fn register_config_callback(&mut self, oid: Oid) {
        self.config_callbacks.push(oid);
    }

    fn seconds_to_clock(&self, seconds: f64) -> u64 {
        (seconds * 1000.0).round() as u64 * 180_000
    }

    fn estimated_print_time(&self, eventtime: f64) -> f64 {
        eventtime + 0.5
    }
}

/// A clock shared with the test so it can be advanced.
#[derive(Clone, Default)]
pub struct Monotonic(pub Rc<RefCell<f64>>);

impl Monotonic {
    pub fn advance(&self, seconds: f64) {
        *self.0.borrow_mut() += seconds;
    }
}

impl Clock for Monotonic {
    fn monotonic(&self) -> f64 {
        *self.0.borrow()
    }
}

pub type Reports = Rc<RefCell<Vec<(f64, f64)>>>;
pub type Callback = Box<dyn FnMut(f64, f64)>;

/// A reporting callback appending to `reports`.
pub fn recorder(reports: &Reports) -> Callback {
    let reports = reports.clone();
    Box::new(move |time, celsius| reports.borrow_mut().push((time, celsius)))
}

#[derive(Debug, Default)]
pub struct Section {
    pub name: String,
    pub options: HashMap<String, String>,
}

impl Section {
    pub fn new(name: &str, options: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            options: options
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ConfigSection for Section {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, option: &str) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }
}

/// The heater registry's sensor factory table.
#[derive(Debug, Default)]
pub struct Factories(pub Vec<(String, Factory)>);

impl SensorFactories for Factories {
    fn add_sensor_factory(
        &mut self,
        name: &str,
        factory: Factory,
    ) -> Result<(), Error> {
        if self.0.iter().any(|(n, _)| n == name) {
            return Err(ConfigError::Duplicate.into());
        }
        self.0.push((name.to_string(), factory));
        Ok(())
    }
}

/// Captures log records of all levels.
#[derive(Clone)]
pub struct Capture(pub Arc<Mutex<Vec<(Level, String)>>>);

impl Default for Capture {
    fn default() -> Self {
        // The `logger:` macros still filter by the global maximum level.
        log::set_max_level(log::LevelFilter::Trace);
        Self(Default::default())
    }
}

impl Capture {
    pub fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

pub fn isclose(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    (a - b).abs() <= a.abs().max(b.abs()) * rtol + atol
}
