//! Numbered text menu over a record store.
//!
//! The driver only collects field values and calls store operations; every
//! outcome is reported as one line on the output stream.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use stockfile_core::{DomainError, ItemId};
use stockfile_inventory::{Backend, Record, Store};

pub const MSG_ADDED: &str = "Item successfully added!";
pub const MSG_UPDATED: &str = "Item updated successfully!";
pub const MSG_DELETED: &str = "Item deleted successfully!";
pub const MSG_NOT_FOUND: &str = "Item not found!";
pub const MSG_EMPTY: &str = "No items in inventory.";
pub const MSG_INVALID_OPTION: &str = "Invalid option! Please try again.";
pub const MSG_INVALID_NUMBER: &str = "Invalid number! Please try again.";
pub const MSG_EXIT: &str = "Exiting the program...";

const SEPARATOR: &str = "----------------------";

const MENU: &str = "\nInventory System\n\
1. Add New Item\n\
2. View All Items\n\
3. Update Item\n\
4. Delete Item\n\
5. Search for Item\n\
6. Exit\n";

/// Menu option selected by the operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Choice {
    Add,
    ViewAll,
    Update,
    Delete,
    Search,
    Exit,
}

impl FromStr for Choice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(1) => Ok(Choice::Add),
            Ok(2) => Ok(Choice::ViewAll),
            Ok(3) => Ok(Choice::Update),
            Ok(4) => Ok(Choice::Delete),
            Ok(5) => Ok(Choice::Search),
            Ok(6) => Ok(Choice::Exit),
            _ => Err(DomainError::validation(format!("unknown menu option `{}`", s.trim()))),
        }
    }
}

/// What the loop does after handling one selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
    InputClosed,
}

/// Drive the menu until the operator exits or `input` reaches end of input.
///
/// End of input is treated like the Exit option. Saving is left to the
/// caller, which owns the store.
pub fn run<B, R, W>(store: &mut Store<B>, input: R, output: W) -> io::Result<()>
where
    B: Backend,
    R: BufRead,
    W: Write,
{
    let mut session = Session {
        store,
        input,
        output,
    };

    loop {
        session.output.write_all(MENU.as_bytes())?;
        let Some(line) = session.prompt("Choose an option: ")? else {
            writeln!(session.output)?;
            break;
        };

        let flow = match line.parse::<Choice>() {
            Ok(choice) => session.handle(choice)?,
            Err(err) => {
                tracing::debug!(error = %err, "rejected menu selection");
                writeln!(session.output, "{MSG_INVALID_OPTION}")?;
                Flow::Continue
            }
        };

        match flow {
            Flow::Continue => {}
            Flow::Exit => break,
            Flow::InputClosed => {
                writeln!(session.output)?;
                break;
            }
        }
    }

    writeln!(session.output, "{MSG_EXIT}")?;
    session.output.flush()
}

struct Session<'s, B: Backend, R, W> {
    store: &'s mut Store<B>,
    input: R,
    output: W,
}

impl<B: Backend, R: BufRead, W: Write> Session<'_, B, R, W> {
    /// Next input line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompt until the answer parses as `T`.
    fn prompt_number<T: FromStr>(&mut self, label: &str) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match line.trim().parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "{MSG_INVALID_NUMBER}")?,
            }
        }
    }

    fn handle(&mut self, choice: Choice) -> io::Result<Flow> {
        match choice {
            Choice::Add => self.add(),
            Choice::ViewAll => self.view_all(),
            Choice::Update => self.update(),
            Choice::Delete => self.delete(),
            Choice::Search => self.search(),
            Choice::Exit => Ok(Flow::Exit),
        }
    }

    fn add(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number::<ItemId>("Enter Item ID: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(name) = self.prompt("Enter Item Name: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(quantity) = self.prompt_number::<i64>("Enter Stock Quantity: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(unit_price) = self.prompt_number::<f64>("Enter Unit Price: ")? else {
            return Ok(Flow::InputClosed);
        };

        match Record::new(id, name, quantity, unit_price) {
            Ok(record) => {
                self.store.add(record);
                writeln!(self.output, "{MSG_ADDED}")?;
            }
            Err(err) => writeln!(self.output, "Item rejected: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn view_all(&mut self) -> io::Result<Flow> {
        match self.store.list_all() {
            None => writeln!(self.output, "{MSG_EMPTY}")?,
            Some(items) => {
                for record in items {
                    writeln!(self.output, "{record}")?;
                    writeln!(self.output, "{SEPARATOR}")?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number::<ItemId>("Enter Item ID to update: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(quantity) = self.prompt_number::<i64>("Enter New Stock Quantity: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(unit_price) = self.prompt_number::<f64>("Enter New Unit Price: ")? else {
            return Ok(Flow::InputClosed);
        };

        let outcome = self.store.update(id, quantity, unit_price).map(|_| ());
        report(&mut self.output, outcome, MSG_UPDATED)?;
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number::<ItemId>("Enter Item ID to delete: ")? else {
            return Ok(Flow::InputClosed);
        };

        let outcome = self.store.remove(id).map(|_| ());
        report(&mut self.output, outcome, MSG_DELETED)?;
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number::<ItemId>("Enter Item ID to search: ")? else {
            return Ok(Flow::InputClosed);
        };

        match self.store.find(id) {
            Ok(record) => writeln!(self.output, "{record}")?,
            Err(err) => report(&mut self.output, Err(err), "")?,
        }
        Ok(Flow::Continue)
    }
}

/// One-line outcome of a store operation.
fn report<W: Write>(output: &mut W, outcome: Result<(), DomainError>, success: &str) -> io::Result<()> {
    match outcome {
        Ok(()) => writeln!(output, "{success}"),
        Err(DomainError::NotFound) => writeln!(output, "{MSG_NOT_FOUND}"),
        Err(err) => writeln!(output, "Operation failed: {err}"),
    }
}
