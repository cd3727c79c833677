//! Shared test infrastructure: scripted console and config builders.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use emusim_core::common::Fault;
use emusim_core::config::{Associativity, CacheConfig, CacheLevelConfig, Config};
use emusim_core::devices::Console;
use emusim_core::sim::Simulator;

/// Console that serves a fixed input script and records output.
///
/// Input exhaustion is a console fault, exactly like end-of-input on the
/// real stdin stream.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<i64>,
    output: Rc<RefCell<Vec<i64>>>,
}

impl ScriptedConsole {
    /// Creates a console scripted with `input` characters, plus a handle to
    /// the output log that stays valid after the console is boxed away.
    pub fn with_input(input: &[i64]) -> (Self, Rc<RefCell<Vec<i64>>>) {
        let output = Rc::new(RefCell::new(Vec::new()));
        let console = Self {
            input: input.iter().copied().collect(),
            output: Rc::clone(&output),
        };
        (console, output)
    }
}

impl Console for ScriptedConsole {
    fn read_char(&mut self) -> Result<i64, Fault> {
        self.input.pop_front().ok_or(Fault::Console {
            message: "input script exhausted".to_owned(),
        })
    }

    fn write_char(&mut self, value: i64) -> Result<(), Fault> {
        self.output.borrow_mut().push(value);
        Ok(())
    }
}

/// A machine config with a single cache level of the given geometry.
///
/// Small capacities keep eviction scenarios to a handful of accesses.
pub fn one_level_config(capacity_bytes: usize, associativity: Associativity) -> Config {
    Config {
        cache: CacheConfig {
            line_bytes: 64,
            levels: vec![CacheLevelConfig {
                capacity_bytes,
                associativity,
            }],
        },
        ..Config::default()
    }
}

/// A machine config with two cache levels, for demotion scenarios.
pub fn two_level_config(l1_bytes: usize, l2_bytes: usize) -> Config {
    Config {
        cache: CacheConfig {
            line_bytes: 64,
            levels: vec![
                CacheLevelConfig {
                    capacity_bytes: l1_bytes,
                    associativity: Associativity::Full,
                },
                CacheLevelConfig {
                    capacity_bytes: l2_bytes,
                    associativity: Associativity::Full,
                },
            ],
        },
        ..Config::default()
    }
}

/// Builds a simulator over the default machine with no console script.
pub fn default_simulator() -> Simulator {
    let (console, _) = ScriptedConsole::with_input(&[]);
    Simulator::new(&Config::default(), Box::new(console)).unwrap()
}

/// Builds a simulator over `config` with the given console input script,
/// returning the output log handle alongside it.
pub fn scripted_simulator(config: &Config, input: &[i64]) -> (Simulator, Rc<RefCell<Vec<i64>>>) {
    let (console, output) = ScriptedConsole::with_input(input);
    let sim = Simulator::new(config, Box::new(console)).unwrap();
    (sim, output)
}

/// Parses `text`, loads it, and runs the machine to a clean halt.
pub fn run_program(text: &str) -> Simulator {
    let mut sim = default_simulator();
    let program = emusim_core::sim::parse_program(text).unwrap();
    sim.load_instructions(&program).unwrap();
    sim.run().unwrap();
    sim
}
