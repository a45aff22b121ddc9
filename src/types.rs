#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Redirects<'a> {
	pub input: Option<&'a [u8]>,
	pub output: Option<&'a [u8]>,
}

impl<'a> Redirects<'a> {
	pub fn is_empty(&self) -> bool {
		self.input.is_none() && self.output.is_none()
	}
}

/// `arguments[0]` is always `name`, as `execvp` expects.
#[derive(Debug, PartialEq, Eq)]
pub struct Command<'a> {
	pub name: &'a [u8],
	pub arguments: Vec<&'a [u8]>,
	pub redirects: Redirects<'a>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Pipeline<'a> {
	pub left: &'a [u8],
	pub right: &'a [u8],
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Builtin<'a> {
	Exit,
	Cd(Option<&'a [u8]>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
	Empty,
	Builtin(Builtin<'a>),
	Simple(Command<'a>),
	Pipeline(Pipeline<'a>),
}
