//! Resolution policies.
//!
//! A [`Resolver`] is asked whenever two sources disagree and neither side is
//! a sentinel. Options are presented in a fixed order and the answer is a
//! 1-based index into them. Resolvers are allowed to return nonsense; the
//! engine keeps asking until the index is in range.

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::str::FromStr;
use tracing::debug;

pub trait Resolver {
    /// Pick one of `options` (never empty), returning its 1-based index.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize>;
}

impl<R: Resolver + ?Sized> Resolver for &mut R {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        (**self).choose(prompt, options)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        (**self).choose(prompt, options)
    }
}

/// Asks a human, re-prompting until a number in range is typed.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn ask(&mut self, options: usize) -> io::Result<Option<usize>> {
        loop {
            write!(self.output, "Please choose which is to be kept [1-{options}]: ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=options).contains(&choice) => return Ok(Some(choice)),
                _ => writeln!(self.output, "Invalid entry. Please choose from the options shown!")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Resolver for Terminal<R, W> {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        let unavailable = || ErrorKind::PolicyUnavailable;
        writeln!(self.output, "{prompt}").or_raise(unavailable)?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {option}", index + 1).or_raise(unavailable)?;
        }
        match self.ask(options.len()).or_raise(unavailable)? {
            Some(choice) => Ok(choice),
            None => exn::bail!(ErrorKind::PolicyUnavailable),
        }
    }
}

/// Never asks; always picks the same side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    /// The first option: the earlier source for field conflicts, the
    /// first-seen spelling for author names.
    First,
    /// The last option: the later source for field conflicts, the
    /// last-seen spelling for author names.
    Second,
}

impl Resolver for Prefer {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        let choice = match self {
            Self::First => 1,
            Self::Second => options.len().max(1),
        };
        debug!(prompt, choice, "resolved by policy");
        Ok(choice)
    }
}

/// Answers from a fixed list, in order. Fails once the list runs out.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    answers: VecDeque<usize>,
    calls: usize,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = usize>) -> Self {
        Self { answers: answers.into_iter().collect(), calls: 0 }
    }

    /// How many times [`choose`](Resolver::choose) has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Resolver for Scripted {
    fn choose(&mut self, _prompt: &str, _options: &[String]) -> Result<usize> {
        self.calls += 1;
        match self.answers.pop_front() {
            Some(choice) => Ok(choice),
            None => exn::bail!(ErrorKind::PolicyUnavailable),
        }
    }
}

/// Which [`Resolver`] to use, as named in configuration or on the
/// command-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    #[default]
    Interactive,
    First,
    Second,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::First => "first",
            Self::Second => "second",
        }
    }

    /// Interactive resolvers talk to standard input and output.
    pub fn resolver(&self) -> Box<dyn Resolver> {
        match self {
            Self::Interactive => Box::new(Terminal::stdio()),
            Self::First => Box::new(Prefer::First),
            Self::Second => Box::new(Prefer::Second),
        }
    }
}

impl FromStr for Policy {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "interactive" | "ask" => Self::Interactive,
            "first" | "a" => Self::First,
            "second" | "b" => Self::Second,
            _ => exn::bail!(ErrorKind::UnknownPolicy(s.to_string())),
        })
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Policy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(|e: Error| serde::de::Error::custom(&*e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn options() -> Vec<String> {
        vec!["Litwin Books".to_string(), "Library Juice Press".to_string()]
    }

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn terminal_accepts_valid_choice() {
        let mut resolver = terminal("2\n");
        assert_eq!(resolver.choose("publishers", &options()).unwrap(), 2);
        let (_, output) = resolver.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("  1. Litwin Books"));
        assert!(output.contains("  2. Library Juice Press"));
    }

    #[test]
    fn terminal_reprompts_on_invalid_input() {
        let mut resolver = terminal("3\nzero\n\n1\n");
        assert_eq!(resolver.choose("publishers", &options()).unwrap(), 1);
        let (_, output) = resolver.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Invalid entry").count(), 3);
    }

    #[test]
    fn terminal_fails_on_eof() {
        let mut resolver = terminal("7\n");
        let err = resolver.choose("publishers", &options()).unwrap_err();
        assert_eq!(*err, ErrorKind::PolicyUnavailable);
    }

    #[test]
    fn prefer_picks_a_side() {
        let three = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(Prefer::First.choose("", &three).unwrap(), 1);
        assert_eq!(Prefer::Second.choose("", &three).unwrap(), 3);
        assert_eq!(Prefer::Second.choose("", &options()).unwrap(), 2);
    }

    #[test]
    fn scripted_counts_calls_and_runs_out() {
        let mut resolver = Scripted::new([2]);
        assert_eq!(resolver.choose("", &options()).unwrap(), 2);
        assert!(resolver.choose("", &options()).is_err());
        assert_eq!(resolver.calls(), 2);
        assert_eq!(resolver.remaining(), 0);
    }

    #[rstest]
    #[case("interactive", Policy::Interactive)]
    #[case("FIRST", Policy::First)]
    #[case(" second ", Policy::Second)]
    fn parse_policy(#[case] input: &str, #[case] expected: Policy) {
        assert_eq!(input.parse::<Policy>().unwrap(), expected);
    }

    #[test]
    fn parse_unknown_policy() {
        let err = "coin-toss".parse::<Policy>().unwrap_err();
        assert_eq!(*err, ErrorKind::UnknownPolicy("coin-toss".to_string()));
    }
}
