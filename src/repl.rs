use std::io::{self, BufRead, Write};

use crate::eval::{self, EvalResult};
use crate::global;

pub const PROMPT: &[u8] = b"esd> ";

/// Reads one line without its terminator. `None` means end of input, which
/// is distinct from an empty line.
pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<Vec<u8>>> {
	let mut line: Vec<u8> = vec![];
	if input.read_until(b'\n', &mut line)? == 0 {
		return Ok(None);
	}
	if let Some(pos) = line.iter().position(|&c| c == b'\n') {
		line.truncate(pos);
	}
	Ok(Some(line))
}

/// Prompts, reads and evaluates lines until end of input or `exit`.
/// Returns the status of the last line evaluated.
pub fn run<R: BufRead, W: Write>(state: &mut global::State, input: &mut R, output: &mut W) -> io::Result<u8> {
	let mut status = 0;
	loop {
		output.write_all(PROMPT)?;
		output.flush()?;
		let line = match read_line(input)? {
			Some(line) => line,
			None => return Ok(status),
		};
		match eval::eval(state, &line) {
			EvalResult::Done(s) => status = s,
			EvalResult::Exit => return Ok(status),
		}
	}
}
