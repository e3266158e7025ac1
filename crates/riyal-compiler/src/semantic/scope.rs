//! Lexical scope frames
//!
//! One root frame per analysis, one child frame per function body. Lookups
//! walk outward; declarations land in the innermost frame.

use riyal_core::ValueType;
use std::collections::HashMap;

/// A single scope frame: variable types and function arities
#[derive(Debug, Default)]
struct Frame {
    variables: HashMap<String, ValueType>,
    functions: HashMap<String, usize>,
}

/// Stack of scope frames; the bottom frame is the program scope
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// Create a stack holding only the root frame
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Enter a nested scope (a function body)
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Leave the innermost scope
    pub fn pop_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot pop the root frame");
        self.frames.pop();
    }

    fn current(&mut self) -> &mut Frame {
        self.frames.last_mut().unwrap()
    }

    /// Declare a variable in the innermost frame.
    /// Returns false if the name is already bound in that frame.
    pub fn declare_variable(&mut self, name: &str, value_type: ValueType) -> bool {
        let frame = self.current();
        if frame.variables.contains_key(name) {
            return false;
        }
        frame.variables.insert(name.to_string(), value_type);
        true
    }

    /// Bind a variable in the innermost frame, overwriting any existing
    /// binding (loop variables, permissive mode).
    pub fn rebind_variable(&mut self, name: &str, value_type: ValueType) {
        self.current().variables.insert(name.to_string(), value_type);
    }

    /// Look a variable up, walking outward through enclosing frames
    pub fn lookup_variable(&self, name: &str) -> Option<ValueType> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.variables.get(name).copied())
    }

    /// Declare a function in the innermost frame.
    /// Returns false if the name is already bound in that frame.
    pub fn declare_function(&mut self, name: &str, arity: usize) -> bool {
        let frame = self.current();
        if frame.functions.contains_key(name) {
            return false;
        }
        frame.functions.insert(name.to_string(), arity);
        true
    }

    /// Look a function up, walking outward through enclosing frames
    pub fn lookup_function(&self, name: &str) -> Option<usize> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.functions.get(name).copied())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
