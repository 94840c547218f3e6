//! Mock register interface for testing the driver
//!
//! Simulates the controller at the register level: a 256-byte register
//! file that can be seeded and inspected, an operation log for
//! verifying exactly what the driver touched, and one-shot failure
//! injection.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use acer_ec::EcInterface;

/// Error injected by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

impl fmt::Display for MockBusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected bus failure")
    }
}

/// Records operations performed on the mock interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read register operation
    Read {
        /// Register address
        register: u8,
        /// Value that was returned
        value: u8,
    },
    /// Write register operation
    Write {
        /// Register address
        register: u8,
        /// Value that was written
        value: u8,
    },
}

/// Shared state for the mock interface (uses interior mutability)
#[derive(Debug)]
struct MockState {
    /// Simulated register file
    registers: [u8; 256],

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection flags
    fail_next_read: bool,
    fail_next_write: bool,
}

/// Mock interface for testing
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

#[allow(dead_code)]
impl MockInterface {
    /// Create a new mock interface with an all-zero register file
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                registers: [0u8; 256],
                operations: Vec::new(),
                fail_next_read: false,
                fail_next_write: false,
            })),
        }
    }

    /// Seed a register value
    pub fn set_register(&self, register: u8, value: u8) {
        self.state.borrow_mut().registers[register as usize] = value;
    }

    /// Inspect a register value
    pub fn get_register(&self, register: u8) -> u8 {
        self.state.borrow().registers[register as usize]
    }

    /// All operations performed so far
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Total operation count (reads + writes)
    pub fn operation_count(&self) -> usize {
        self.state.borrow().operations.len()
    }

    /// Number of reads performed
    pub fn reads(&self) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::Read { .. }))
            .count()
    }

    /// Number of writes performed
    pub fn writes(&self) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::Write { .. }))
            .count()
    }

    /// Forget logged operations (seeding is unaffected)
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Fail the next read with a bus error
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Fail the next write with a bus error
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }
}

impl EcInterface for MockInterface {
    type Error = MockBusError;

    fn read_register(&mut self, register: u8) -> Result<u8, MockBusError> {
        let mut state = self.state.borrow_mut();
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockBusError);
        }
        let value = state.registers[register as usize];
        state.operations.push(Operation::Read { register, value });
        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), MockBusError> {
        let mut state = self.state.borrow_mut();
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockBusError);
        }
        state.registers[register as usize] = value;
        state.operations.push(Operation::Write { register, value });
        Ok(())
    }
}
