use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lexer::{Token, ValueType};

/// A named variable and its current value
///
/// The value is held as canonical text; the type tag decides how arithmetic
/// and assignments interpret that text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Declared type; fixed for the lifetime of the variable
    pub ty: ValueType,
    /// Current value as canonical text
    pub value: String,
}

/// Flat, insertion-ordered variable store
///
/// There is exactly one environment live at a time; function calls swap the
/// whole store out and back, and conditional branches snapshot and restore
/// it. Lookup is linear, which is fine at the scale of one function frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    variables: Vec<Variable>,
}

impl Environment {
    /// Creates an empty environment
    pub fn new() -> Self {
        Environment::default()
    }

    /// Declares a new variable; the name must not already be in use
    pub fn declare(&mut self, name: &Token, ty: ValueType, value: String) -> Result<()> {
        if self.contains(&name.lexeme) {
            return Err(Error::VariableNameAlreadyInUse {
                token: name.clone(),
            });
        }
        self.variables.push(Variable {
            name: name.lexeme.clone(),
            ty,
            value,
        });
        Ok(())
    }

    /// Assigns a new value to an existing variable
    ///
    /// The incoming value's type must match the declared type exactly; a
    /// variable never changes type.
    pub fn assign(&mut self, name: &Token, ty: ValueType, value: String) -> Result<()> {
        let variable = self
            .variables
            .iter_mut()
            .find(|v| v.name == name.lexeme)
            .ok_or_else(|| Error::VariableDoesNotExist {
                token: name.clone(),
            })?;
        if variable.ty != ty {
            return Err(Error::TypeMismatch {
                from: ty,
                to: variable.ty,
                token: name.clone(),
            });
        }
        variable.value = value;
        Ok(())
    }

    /// Looks up a variable by name
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Returns true if a variable with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Captures the current variable set for a later [`restore`](Self::restore)
    pub fn snapshot(&self) -> Vec<Variable> {
        self.variables.clone()
    }

    /// Rolls the environment back to a snapshot, keeping value updates
    ///
    /// Variables that existed at snapshot time adopt whatever value they hold
    /// now; variables declared since the snapshot are dropped. This gives
    /// conditional and loop bodies their block scoping: assignments escape,
    /// declarations do not.
    pub fn restore(&mut self, mut snapshot: Vec<Variable>) {
        for old in snapshot.iter_mut() {
            if let Some(current) = self.get(&old.name) {
                if current.value != old.value {
                    old.value = current.value.clone();
                }
            }
        }
        self.variables = snapshot;
    }

    /// Number of live variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if no variables are live
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
