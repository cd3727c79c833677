//! The run loop: place a program, step to halt, report.

use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::common::{Fault, VirtAddr, INSTRUCTION_BYTES};
use crate::config::{Config, ConfigError};
use crate::cpu::{Processor, State};
use crate::devices::Console;
use crate::isa::Instruction;
use crate::sim::loader::{self, LoadError};

/// Owns a [`Processor`] and drives it from program load to halt.
#[derive(Debug)]
pub struct Simulator {
    processor: Processor,
    trace_instructions: bool,
    pace: Option<Duration>,
}

impl Simulator {
    /// Builds a simulator for the machine `config` describes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the cache geometry does not validate.
    pub fn new(config: &Config, console: Box<dyn Console>) -> Result<Self, ConfigError> {
        Ok(Self {
            processor: Processor::new(config, console)?,
            trace_instructions: config.general.trace_instructions,
            pace: config.general.pace_millis.map(Duration::from_millis),
        })
    }

    /// Loads the text program at `path` into memory starting at address 0.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] for unreadable files, malformed lines, or a
    /// program that exceeds the page budget.
    pub fn load_program_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let program = loader::load_file(path)?;
        self.load_instructions(&program)?;
        info!(
            path = %path.display(),
            instructions = program.len(),
            "program loaded"
        );
        Ok(program.len())
    }

    /// Places already-built instructions at consecutive slots from 0.
    ///
    /// Words go straight into backing memory so loading does not perturb
    /// the cache counters the run will report.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Placement`] when the page budget runs out.
    pub fn load_instructions(&mut self, program: &[Instruction]) -> Result<(), LoadError> {
        let memory = self.processor.cache_mut().memory_mut();
        for (index, instr) in program.iter().enumerate() {
            let base = index as u64 * INSTRUCTION_BYTES;
            for (offset, byte) in instr.encode().to_le_bytes().into_iter().enumerate() {
                memory
                    .write(VirtAddr::new(base + offset as u64), byte)
                    .map_err(|source| LoadError::Placement { index, source })?;
            }
        }
        Ok(())
    }

    /// Steps the machine until it halts.
    ///
    /// # Errors
    ///
    /// Returns the [`Fault`] that stopped the machine early; a clean `HALT`
    /// returns `Ok`.
    pub fn run(&mut self) -> Result<(), Fault> {
        while self.processor.state() == State::Running {
            self.processor.step()?;
            if self.trace_instructions {
                self.processor.dump_state();
            }
            if let Some(pace) = self.pace {
                thread::sleep(pace);
            }
        }
        debug!(
            retired = self.processor.stats().instructions_retired,
            "machine halted"
        );
        Ok(())
    }

    /// Prints the end-of-run statistics report to stdout.
    pub fn print_report(&self) {
        self.processor
            .stats()
            .print(self.processor.cache().stats());
    }

    /// The owned processor.
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Exclusive access to the owned processor.
    pub fn processor_mut(&mut self) -> &mut Processor {
        &mut self.processor
    }
}
