use crate::builtin;
use crate::types::*;

pub const DELIMITER: u8 = b' ';
pub const PIPE: u8 = b'|';

struct Parser<'a> {
	line: &'a [u8],
	i: usize,
}

impl<'a> Parser<'a> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	fn is_delimiter(c: u8) -> bool {
		c == DELIMITER
	}

	fn skip_delimiters(&mut self) {
		self.proceed_while(Parser::is_delimiter);
	}

	fn read_word(&mut self) -> &'a [u8] {
		let orig = self.i;
		self.proceed_while(|c| !Parser::is_delimiter(c));
		&self.line[orig .. self.i]
	}

	fn read_words(&mut self) -> Vec<&'a [u8]> {
		let mut words: Vec<&'a [u8]> = vec![];
		loop {
			self.skip_delimiters();
			let word = self.read_word();
			if word.is_empty() {
				break;
			}
			words.push(word);
		}
		words
	}
}

/// Splits `line` on runs of `DELIMITER`. Never yields an empty word.
pub fn tokenize(line: &[u8]) -> Vec<&[u8]> {
	let mut parser = Parser { line: line, i: 0 };
	parser.read_words()
}

/// Removes every `<` or `>` that has a following word, together with that
/// word. A later operator overrides an earlier one. An operator in the last
/// position stays in `words` as a literal argument.
pub fn extract_redirects<'a>(words: &mut Vec<&'a [u8]>) -> Redirects<'a> {
	let mut redirects = Redirects::default();
	let mut i = 0;
	while i + 1 < words.len() {
		let target = words[i + 1];
		match words[i] {
			b"<" => redirects.input = Some(target),
			b">" => redirects.output = Some(target),
			_ => {
				i += 1;
				continue;
			},
		}
		words.drain(i .. i + 2);
	}
	redirects
}

/// `None` when no words remain once redirections are taken out.
pub fn parse_command(segment: &[u8]) -> Option<Command> {
	let mut arguments = tokenize(segment);
	let redirects = extract_redirects(&mut arguments);
	let name = *arguments.first()?;
	Some(Command { name: name, arguments: arguments, redirects: redirects })
}

/// Splits at the first `|` only; any later `|` stays inside `right`.
pub fn split_pipeline(line: &[u8]) -> Option<Pipeline> {
	let pos = line.iter().position(|&c| c == PIPE)?;
	Some(Pipeline { left: &line[.. pos], right: &line[pos + 1 ..] })
}

pub fn parse(line: &[u8]) -> Line {
	if let Some(b) = builtin::match_builtin(line) {
		return Line::Builtin(b);
	}
	if let Some(pipeline) = split_pipeline(line) {
		return Line::Pipeline(pipeline);
	}
	match parse_command(line) {
		Some(command) => Line::Simple(command),
		None => Line::Empty,
	}
}
