// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsing termcap text
//!
//! The parser is a byte-at-a-time state machine. [`transition`] decides, from the current
//! state and one input byte, the next state and a single [`Action`]; [`Parser`] applies
//! the action to the database under construction. A transition may ask for the same byte
//! to be dispatched again under the new state, which is how the whitespace, padding and
//! octal states hand control back without consuming input.

use std::fmt;

use crate::{
    arena::ByteArena,
    capability::{Capability, Padding, Value},
    database::Database,
    symbol::{Symbol, describe_byte},
};

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// Errors reported when parsing a termcap database
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input does not follow the termcap grammar
    #[error("termcap: {state}: {reason} {} line:{line} col:{column}", shown(.byte))]
    Syntax {
        state: State,
        reason: &'static str,
        byte: u8,
        line: usize,
        column: usize,
    },
    /// Input/output error while reading the database
    #[error("I/O error")]
    IO(#[from] std::io::Error),
}

fn shown(byte: &u8) -> String {
    describe_byte(*byte)
}

/// Parser states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Between entries
    Whitespace,
    /// Inside a `#` comment line
    Comment,
    /// Terminal name or alias
    Term,
    /// Capability name
    ValKey,
    /// Ignored `name.subname` item
    ValSkip,
    /// Digits after `#`
    ValNum,
    /// Bytes after `=`
    ValString,
    /// Leading padding count of a string
    ValDelay,
    /// Byte after `^`
    ValCtrl,
    /// Byte after `\`
    Escape,
    /// Digits after `\0`..`\7`
    Octal,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::Term => "term",
            Self::ValKey => "val_key",
            Self::ValSkip => "val_skip",
            Self::ValNum => "val_num",
            Self::ValString => "val_string",
            Self::ValDelay => "val_delay",
            Self::ValCtrl => "val_ctrl",
            Self::Escape => "escape",
            Self::Octal => "octal",
        })
    }
}

/// Side effect of consuming one byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    /// Add a byte to the scratch buffer
    Append(u8),
    /// Commit the scratch buffer as a name of the current entry
    Alias,
    /// Commit the last name and start on capabilities
    LastAlias,
    /// Commit the scratch buffer as a key, the value has the given kind
    Key(Value),
    /// Commit the scratch buffer as a boolean capability
    Flag,
    /// Accumulate a decimal digit of a number
    Digit(u8),
    /// Accumulate a decimal digit of the padding count
    PadDigit(u8),
    /// Mark the padding as proportional
    Proportional,
    /// Store the current capability, taking a string value from the scratch buffer
    Store,
    /// Close the current entry and start a new one
    EndEntry,
    OctalStart(u8),
    OctalDigit(u8),
    /// Append the accumulated octal value
    OctalFlush,
    /// Drop the scratch buffer
    Discard,
}

/// Outcome of feeding one byte to a state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    /// New state to return to after an escape or whitespace
    pub restore: Option<State>,
    pub action: Action,
    /// Dispatch the same byte again under `next`
    pub redo: bool,
    /// Tolerated irregularity, reported in the log
    pub note: Option<&'static str>,
}

impl Transition {
    const fn to(next: State, action: Action) -> Self {
        Self {
            next,
            restore: None,
            action,
            redo: false,
            note: None,
        }
    }

    const fn stay(state: State) -> Self {
        Self::to(state, Action::None)
    }

    const fn redo(next: State, action: Action) -> Self {
        Self {
            redo: true,
            ..Self::to(next, action)
        }
    }

    const fn restore(self, restore: State) -> Self {
        Self {
            restore: Some(restore),
            ..self
        }
    }

    const fn note(self, note: &'static str) -> Self {
        Self {
            note: Some(note),
            ..self
        }
    }

    /// Line ends inside an entry
    const fn end_entry() -> Self {
        Self::to(State::Whitespace, Action::EndEntry).restore(State::Term)
    }
}

/// What the transition function needs to know beyond state and byte
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Context {
    pub scratch_empty: bool,
    pub padding_seen: bool,
}

const fn is_print(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7e)
}

const fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Append printable bytes, dropping blanks while nothing has been collected
const fn accumulate(state: State, byte: u8, context: Context) -> Result<Transition, &'static str> {
    if is_space(byte) && context.scratch_empty {
        Ok(Transition::stay(state))
    } else if is_print(byte) || is_space(byte) {
        Ok(Transition::to(state, Action::Append(byte)))
    } else {
        Err("unexpected character")
    }
}

/// Decide what to do with `byte` in `state`
///
/// Carriage returns never reach this function; the parser checks them first.
pub const fn transition(
    state: State,
    restore: State,
    byte: u8,
    context: Context,
) -> Result<Transition, &'static str> {
    use State::*;

    let transition = match (state, byte) {
        (Whitespace, b'\n') => Transition::stay(Whitespace),
        (Whitespace, b'#') => Transition::to(Comment, Action::None),
        (Whitespace, _) if is_space(byte) => Transition::stay(Whitespace),
        (Whitespace, _) if is_print(byte) => Transition::redo(restore, Action::None),

        (Comment, b'\n') => Transition::to(Whitespace, Action::None),
        (Comment, _) if is_print(byte) || is_space(byte) => Transition::stay(Comment),

        (Term, b'\n') => return Err("unexpected linefeed"),
        (Term, b'\\') => Transition::to(Escape, Action::None).restore(Term),
        (Term, b'|') => Transition::to(Term, Action::Alias),
        (Term, b':') => Transition::to(ValKey, Action::LastAlias),
        (Term, _) => return accumulate(Term, byte, context),

        (ValKey, b'\n') => Transition::end_entry(),
        (ValKey, b'\\') => Transition::to(Escape, Action::None).restore(ValKey),
        (ValKey, b'.') => Transition::to(ValSkip, Action::Discard),
        (ValKey, b':') => Transition::to(ValKey, Action::Flag),
        (ValKey, b'#') if !context.scratch_empty => {
            Transition::to(ValNum, Action::Key(Value::Number(0)))
        }
        (ValKey, b'=') => Transition::to(
            ValString,
            Action::Key(Value::String {
                value: Symbol::EMPTY,
                padding: None,
            }),
        ),
        (ValKey, _) => return accumulate(ValKey, byte, context),

        (ValSkip, b'\n') => Transition::end_entry().note("unexpected linefeed"),
        (ValSkip, b':') => Transition::to(ValKey, Action::None),
        (ValSkip, _) if is_print(byte) || is_space(byte) => Transition::stay(ValSkip),

        (ValNum, b'\n') => Transition::end_entry().note("unexpected linefeed"),
        (ValNum, b'0'..=b'9') => Transition::to(ValNum, Action::Digit(byte - b'0')),
        (ValNum, b':') => Transition::to(ValKey, Action::Store),

        (ValString, b'\n') => Transition::end_entry().note("unexpected linefeed"),
        (ValString, b'^') => Transition::to(ValCtrl, Action::None),
        (ValString, b'\\') => Transition::to(Escape, Action::None).restore(ValString),
        (ValString, b':') => Transition::to(ValKey, Action::Store),
        (ValString, b'0'..=b'9') if context.scratch_empty && !context.padding_seen => {
            Transition::redo(ValDelay, Action::None)
        }
        (ValString, _) if is_print(byte) || is_space(byte) => {
            Transition::to(ValString, Action::Append(byte))
        }

        (ValDelay, b'\n') => Transition::end_entry().note("unexpected linefeed"),
        (ValDelay, b'0'..=b'9') => Transition::to(ValDelay, Action::PadDigit(byte - b'0')),
        (ValDelay, b'*') => Transition::to(ValString, Action::Proportional),
        (ValDelay, _) if is_print(byte) || is_space(byte) => {
            Transition::redo(ValString, Action::None)
        }

        (ValCtrl, b'\n') => Transition::end_entry().note("unexpected linefeed"),
        (ValCtrl, b'?') => Transition::to(ValString, Action::Append(DEL)),
        (ValCtrl, _) if is_print(byte) => Transition::to(ValString, Action::Append(byte & 0x1f)),

        // a backslash at the end of a line continues the item on the next line
        (Escape, b'\n') => Transition::stay(restore),
        (Escape, b'0'..=b'7') => Transition::to(Octal, Action::OctalStart(byte - b'0')),
        (Escape, _) => match unescape(byte) {
            Some(unescaped) => Transition::to(restore, Action::Append(unescaped)),
            None => Transition::stay(restore).note("illegal escape"),
        },

        (Octal, b'0'..=b'7') => Transition::to(Octal, Action::OctalDigit(byte - b'0')),
        (Octal, _) if is_print(byte) || is_space(byte) => {
            Transition::redo(restore, Action::OctalFlush)
        }

        _ => return Err("unexpected character"),
    };
    Ok(transition)
}

/// Byte denoted by `\` followed by `byte`
const fn unescape(byte: u8) -> Option<u8> {
    match byte {
        b'\\' | b'^' | b':' | b'.' => Some(byte),
        b'E' | b'e' => Some(ESC),
        b'n' | b'l' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'a' => Some(0x07),
        b's' => Some(b' '),
        _ => None,
    }
}

/// Incremental termcap parser
///
/// Feed the text in chunks of any size with [`Parser::feed`], then call
/// [`Parser::finish`] to obtain the [`Database`]. The first error aborts the parse.
#[derive(Debug)]
pub struct Parser {
    database: Database,
    state: State,
    restore: State,
    scratch: ByteArena,
    entry: usize,
    capability: Capability,
    octal: u8,
    pending_cr: bool,
    line: usize,
    column: usize,
}

impl Parser {
    pub fn new() -> Self {
        let mut database = Database::empty();
        let entry = database.new_entry();
        Self {
            database,
            state: State::Whitespace,
            restore: State::Term,
            scratch: ByteArena::default(),
            entry,
            capability: Capability::default(),
            octal: 0,
            pending_cr: false,
            line: 1,
            column: 0,
        }
    }

    pub const fn state(&self) -> State {
        self.state
    }

    /// Line and column of the next byte
    pub const fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn syntax_error(&self, reason: &'static str, byte: u8) -> Error {
        Error::Syntax {
            state: self.state,
            reason,
            byte,
            line: self.line,
            column: self.column,
        }
    }

    pub fn feed(&mut self, buffer: &[u8]) -> Result<(), Error> {
        buffer.iter().try_for_each(|&byte| self.feed_byte(byte))
    }

    pub fn feed_byte(&mut self, byte: u8) -> Result<(), Error> {
        if self.pending_cr {
            if byte != b'\n' {
                return Err(self.syntax_error("invalid crlf", byte));
            }
            self.pending_cr = false;
        } else if byte == b'\r' {
            self.pending_cr = true;
            return Ok(());
        }

        loop {
            let context = Context {
                scratch_empty: self.scratch.is_empty(),
                padding_seen: matches!(
                    self.capability.value,
                    Value::String {
                        padding: Some(_),
                        ..
                    }
                ),
            };
            let transition = transition(self.state, self.restore, byte, context)
                .map_err(|reason| self.syntax_error(reason, byte))?;
            if let Some(note) = transition.note {
                log::debug!(
                    "termcap: {}: {note} {} line:{} col:{}",
                    self.state,
                    describe_byte(byte),
                    self.line,
                    self.column
                );
            }
            self.apply(transition.action);
            if let Some(restore) = transition.restore {
                self.restore = restore;
            }
            self.state = transition.next;
            if !transition.redo {
                break;
            }
        }

        if byte == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Ok(())
    }

    /// Complete the parse, keeping an item left open by a missing final newline
    pub fn finish(mut self) -> Result<Database, Error> {
        if self.pending_cr {
            return Err(self.syntax_error("invalid crlf", b'\r'));
        }
        if self.state == State::Octal {
            self.apply(Action::OctalFlush);
            self.state = self.restore;
        } else if self.state == State::Escape {
            self.state = self.restore;
        }
        match self.state {
            State::ValKey if !self.scratch.is_empty() => self.apply(Action::Flag),
            State::ValNum | State::ValString | State::ValDelay | State::ValCtrl => {
                self.apply(Action::Store);
            }
            State::Term if !self.scratch.is_empty() => {
                log::debug!(
                    "termcap: term: unexpected end of input line:{} col:{}",
                    self.line,
                    self.column
                );
            }
            _ => {}
        }
        Ok(self.database)
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Append(byte) => {
                self.scratch.append(&[byte]);
            }
            Action::Alias => self.commit_alias(),
            Action::LastAlias => {
                self.commit_alias();
                self.capability = Capability::default();
            }
            Action::Key(value) => {
                self.capability.key = self.take_scratch();
                self.capability.value = value;
            }
            Action::Flag => {
                self.capability.key = self.take_scratch();
                self.capability.value = Value::Boolean;
                self.store();
            }
            Action::Digit(digit) => {
                if let Value::Number(number) = &mut self.capability.value {
                    *number = number.saturating_mul(10).saturating_add(i32::from(digit));
                }
            }
            Action::PadDigit(digit) => {
                if let Value::String { padding, .. } = &mut self.capability.value {
                    let padding = padding.get_or_insert_with(Padding::default);
                    padding.delay = padding
                        .delay
                        .saturating_mul(10)
                        .saturating_add(u32::from(digit));
                }
            }
            Action::Proportional => {
                if let Value::String { padding, .. } = &mut self.capability.value {
                    padding.get_or_insert_with(Padding::default).proportional = true;
                }
            }
            Action::Store => {
                if matches!(self.capability.value, Value::String { .. }) {
                    let string = self.take_scratch();
                    if let Value::String { value, .. } = &mut self.capability.value {
                        *value = string;
                    }
                }
                self.store();
            }
            Action::EndEntry => {
                match self.state {
                    State::ValKey if !self.scratch.is_empty() => self.apply(Action::Flag),
                    State::ValKey | State::ValSkip => {}
                    _ => self.apply(Action::Store),
                }
                self.entry = self.database.new_entry();
            }
            Action::OctalStart(digit) => self.octal = digit,
            Action::OctalDigit(digit) => {
                self.octal = self.octal.wrapping_mul(8).wrapping_add(digit);
            }
            Action::OctalFlush => {
                self.scratch.append(&[self.octal & 0x7f]);
            }
            Action::Discard => self.scratch.reset(),
        }
    }

    fn take_scratch(&mut self) -> Symbol {
        let symbol = self.database.symbols.intern(self.scratch.as_slice());
        self.scratch.reset();
        symbol
    }

    fn commit_alias(&mut self) {
        let name = self.take_scratch();
        if name.is_empty() {
            return;
        }
        let database = &mut self.database;
        if database.aliases.insert_new(&database.symbols, name, self.entry) {
            log::debug!(
                "termcap: term: {} -> idx:{}, line:{}, col:{}",
                database.symbols.render(name),
                self.entry,
                self.line,
                self.column
            );
        } else {
            log::warn!(
                "termcap: term: duplicate name {} ignored, line:{}",
                database.symbols.render(name),
                self.line
            );
        }
    }

    fn store(&mut self) {
        let capability = std::mem::take(&mut self.capability);
        if capability.key.is_empty() {
            return;
        }
        let database = &mut self.database;
        let Some(entry) = database.entries.get_mut(self.entry) else {
            return;
        };
        entry.insert(&database.symbols, capability.key, capability);
        log::debug!(
            "termcap: cap: {}, line:{}, col:{}",
            capability.render(&database.symbols),
            self.line,
            self.column
        );
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(text: &[u8]) -> Database {
        let mut parser = Parser::new();
        parser.feed(text).unwrap();
        parser.finish().unwrap()
    }

    fn parse_error(text: &[u8]) -> Error {
        let mut parser = Parser::new();
        match parser.feed(text) {
            Ok(()) => parser.finish().unwrap_err(),
            Err(err) => err,
        }
    }

    /// Value of a capability in the entry named `term`
    fn value(database: &Database, term: &str, key: &str) -> Option<Value> {
        let entry = database.entry(database.entry_index(term)?)?;
        entry
            .get(database.symbols(), key.as_bytes())
            .map(|capability| capability.value)
    }

    fn string(database: &Database, term: &str, key: &str) -> Option<(Vec<u8>, Option<Padding>)> {
        match value(database, term, key)? {
            Value::String { value, padding } => {
                Some((database.symbols().resolve(value).to_vec(), padding))
            }
            _ => None,
        }
    }

    #[test]
    fn redo_whitespace_into_term() {
        let context = Context {
            scratch_empty: true,
            padding_seen: false,
        };
        assert_eq!(
            transition(State::Whitespace, State::Term, b'v', context),
            Ok(Transition::redo(State::Term, Action::None))
        );
        assert_eq!(
            transition(State::Octal, State::ValString, b'x', context),
            Ok(Transition::redo(State::ValString, Action::OctalFlush))
        );
        assert_eq!(
            transition(State::ValString, State::Term, b'5', context),
            Ok(Transition::redo(State::ValDelay, Action::None))
        );
    }

    #[test]
    fn kinds() {
        let database = parse(b"vt100|vt100-am:co#80:am:cr=^M:\n");
        assert_eq!(value(&database, "vt100", "co"), Some(Value::Number(80)));
        assert_eq!(value(&database, "vt100", "am"), Some(Value::Boolean));
        assert_eq!(string(&database, "vt100", "cr"), Some((b"\r".to_vec(), None)));
        assert_eq!(
            database.entry_index("vt100"),
            database.entry_index("vt100-am")
        );
    }

    #[test]
    fn escapes() {
        let database = parse(
            b"t:a=\\E\\e\\n\\l\\r\\t\\b\\f\\a\\s:b=\\\\\\^\\:\\.:c=\\101\\0\\7z:d=\\q!:e=^?^[^a:\n",
        );
        assert_eq!(
            string(&database, "t", "a").unwrap().0,
            b"\x1b\x1b\n\n\r\t\x08\x0c\x07 "
        );
        assert_eq!(string(&database, "t", "b").unwrap().0, b"\\^:.");
        assert_eq!(string(&database, "t", "c").unwrap().0, b"A\0\x07z");
        assert_eq!(string(&database, "t", "d").unwrap().0, b"!");
        assert_eq!(string(&database, "t", "e").unwrap().0, b"\x7f\x1b\x01");
    }

    #[test]
    fn octal_masked_to_seven_bits() {
        let database = parse(b"t:a=\\377:b=\\200:\n");
        assert_eq!(string(&database, "t", "a").unwrap().0, b"\x7f");
        assert_eq!(string(&database, "t", "b").unwrap().0, b"\0");
    }

    #[test]
    fn octal_before_linefeed() {
        let database = parse(b"t:a=\\101\nu:b:\n");
        assert_eq!(string(&database, "t", "a").unwrap().0, b"A");
        assert_eq!(value(&database, "u", "b"), Some(Value::Boolean));
    }

    #[test]
    fn padding() {
        let database = parse(b"t:cl=50*\\E[H:al=3\\E[L:dl=\\060:dc=\\0602:\n");
        assert_eq!(
            string(&database, "t", "cl"),
            Some((
                b"\x1b[H".to_vec(),
                Some(Padding {
                    delay: 50,
                    proportional: true
                })
            ))
        );
        assert_eq!(
            string(&database, "t", "al"),
            Some((
                b"\x1b[L".to_vec(),
                Some(Padding {
                    delay: 3,
                    proportional: false
                })
            ))
        );
        // an escaped digit is data, not padding
        assert_eq!(string(&database, "t", "dl"), Some((b"0".to_vec(), None)));
        // octal digits run on past three and wrap
        assert_eq!(string(&database, "t", "dc"), Some((b"\x02".to_vec(), None)));
    }

    #[test]
    fn padding_only_once() {
        let database = parse(b"t:ho=5*2J:\n");
        assert_eq!(
            string(&database, "t", "ho"),
            Some((
                b"2J".to_vec(),
                Some(Padding {
                    delay: 5,
                    proportional: true
                })
            ))
        );
    }

    #[test]
    fn continuation_and_comments() {
        let database = parse(
            b"# comment line\n\
              vt52|dec vt52:\\\n\
              \t:co#80:li#24:\\\n\
              \t:bl=^G:\n\
              \n\
              # another\n\
              dumb:am:\n",
        );
        assert_eq!(value(&database, "vt52", "co"), Some(Value::Number(80)));
        assert_eq!(value(&database, "dec vt52", "li"), Some(Value::Number(24)));
        assert_eq!(string(&database, "vt52", "bl").unwrap().0, b"\x07");
        assert_eq!(value(&database, "dumb", "am"), Some(Value::Boolean));
        assert_eq!(value(&database, "dumb", "co"), None);
    }

    #[test]
    fn skip_dotted_items() {
        let database = parse(b"t:ab.cd=ignored:co#80:.xx:am:\n");
        assert_eq!(value(&database, "t", "co"), Some(Value::Number(80)));
        assert_eq!(value(&database, "t", "am"), Some(Value::Boolean));
        assert_eq!(database.entry(0).unwrap().len(), 2);
    }

    #[test]
    fn repeated_key_overwrites() {
        let database = parse(b"t:co#80:co#132:\n");
        assert_eq!(value(&database, "t", "co"), Some(Value::Number(132)));
    }

    #[test]
    fn leading_blanks_dropped() {
        let database = parse(b"t|  alias:   co#80:\n");
        assert!(database.entry_index("alias").is_some());
        assert_eq!(value(&database, "t", "co"), Some(Value::Number(80)));
    }

    #[test]
    fn value_ends_line() {
        let database = parse(b"a:co#80\nb:cl=x\nc:am\nd:e=^\ne:li#1:\n");
        assert_eq!(value(&database, "a", "co"), Some(Value::Number(80)));
        assert_eq!(string(&database, "b", "cl").unwrap().0, b"x");
        assert_eq!(value(&database, "c", "am"), Some(Value::Boolean));
        assert_eq!(string(&database, "d", "e").unwrap().0, b"");
        assert_eq!(value(&database, "e", "li"), Some(Value::Number(1)));
        let indices: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|name| database.entry_index(name).unwrap())
            .collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn missing_final_newline() {
        let database = parse(b"t:co#80:cl=\\E[H");
        assert_eq!(value(&database, "t", "co"), Some(Value::Number(80)));
        assert_eq!(string(&database, "t", "cl").unwrap().0, b"\x1b[H");
    }

    #[test]
    fn crlf_line_endings() {
        let database = parse(b"t:co#80:\r\nu:am:\r\n");
        assert_eq!(value(&database, "t", "co"), Some(Value::Number(80)));
        assert_eq!(value(&database, "u", "am"), Some(Value::Boolean));
    }

    #[test]
    fn bare_carriage_return() {
        let err = parse_error(b"t:co#80:\rx");
        assert!(matches!(
            err,
            Error::Syntax {
                state: State::ValKey,
                reason: "invalid crlf",
                byte: b'x',
                line: 1,
                column: 8,
            }
        ));
        assert!(matches!(parse_error(b"t:am:\r"), Error::Syntax { .. }));
    }

    #[test]
    fn name_without_capabilities() {
        let err = parse_error(b"# header\nvt100\n");
        assert!(matches!(
            err,
            Error::Syntax {
                state: State::Term,
                reason: "unexpected linefeed",
                line: 2,
                column: 5,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "termcap: term: unexpected linefeed \\n (#x0a) line:2 col:5"
        );
    }

    #[test]
    fn control_byte_rejected() {
        let err = parse_error(b"t:co#8\x01:\n");
        assert!(matches!(
            err,
            Error::Syntax {
                state: State::ValNum,
                byte: 0x01,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "termcap: val_num: unexpected character ^A (#x01) line:1 col:6"
        );
    }

    #[test]
    fn high_bytes_rejected() {
        assert!(matches!(
            parse_error(b"t:cl=\xc3\xa9:\n"),
            Error::Syntax {
                state: State::ValString,
                ..
            }
        ));
    }

    #[test]
    fn first_name_wins() {
        let database = parse(b"t|dup:am:\nu|dup:co#1:\n");
        assert_eq!(database.entry_index("dup"), Some(0));
        assert_eq!(database.entry_index("u"), Some(1));
    }

    #[test]
    fn chunked_feed() {
        let text = b"vt100|vt100-am:co#80:li#24:am:cr=^M:\n";
        let mut parser = Parser::new();
        for chunk in text.chunks(3) {
            parser.feed(chunk).unwrap();
        }
        assert_eq!(parser.state(), State::Whitespace);
        assert_eq!(parser.position(), (2, 0));
        let database = parser.finish().unwrap();
        assert_eq!(value(&database, "vt100-am", "li"), Some(Value::Number(24)));
    }
}
