use std::ffi::{CString, OsStr};
use std::fs;
use std::io::{self, Write};
use std::os::fd::{IntoRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;

use nix::errno::Errno;
use nix::fcntl::{self, FcntlArg, FdFlag, OFlag};
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd::{self, ForkResult};

use crate::builtin;
use crate::error::ExecError;
use crate::global;
use crate::job::Job;
use crate::parser;
use crate::types::{Builtin, Command, Line, Pipeline, Redirects};

pub const OUTPUT_MODE: u32 = 0o644;

/// Redirection targets, opened by the parent before forking. Whatever is
/// not handed to a child is closed when this is dropped.
#[derive(Debug, Default)]
struct OpenedRedirects {
	input: Option<OwnedFd>,
	output: Option<OwnedFd>,
}

fn open_target(path: &[u8], options: &fs::OpenOptions) -> Result<OwnedFd, ExecError> {
	let path = OsStr::from_bytes(path);
	let file = options.open(path).map_err(|e| ExecError::Path("open", path.to_owned(), e))?;
	Ok(OwnedFd::from(file))
}

impl OpenedRedirects {
	fn open(redirects: &Redirects) -> Result<OpenedRedirects, ExecError> {
		let mut opened = OpenedRedirects::default();
		if redirects.is_empty() {
			return Ok(opened);
		}
		if let Some(path) = redirects.input {
			opened.input = Some(open_target(path, fs::OpenOptions::new().read(true))?);
		}
		if let Some(path) = redirects.output {
			let mut oopt = fs::OpenOptions::new();
			oopt.write(true).create(true).truncate(true).mode(OUTPUT_MODE);
			opened.output = Some(open_target(path, &oopt)?);
		}
		Ok(opened)
	}

	fn install(self) -> nix::Result<()> {
		if let Some(fd) = self.input {
			remap(fd, libc::STDIN_FILENO)?;
		}
		if let Some(fd) = self.output {
			remap(fd, libc::STDOUT_FILENO)?;
		}
		Ok(())
	}
}

/// Moves `fd` onto `target` and closes the original. The result survives
/// `exec` even though everything this shell opens is close-on-exec.
fn remap(fd: OwnedFd, target: RawFd) -> nix::Result<()> {
	let fd = fd.into_raw_fd();
	if fd == target {
		fcntl::fcntl(fd, FcntlArg::F_SETFD(FdFlag::empty()))?;
		return Ok(());
	}
	unistd::dup2(fd, target)?;
	unistd::close(fd)
}

/// An image to exec, with everything the child needs allocated before fork.
struct Exec {
	argv: Vec<CString>,
	failure_prefix: Vec<u8>,
}

impl Exec {
	fn new(command: &Command) -> Result<Exec, ExecError> {
		let argv: Result<Vec<CString>, _> = command.arguments.iter().map(|&s| CString::new(s)).collect();
		let mut failure_prefix = b"esd: ".to_vec();
		failure_prefix.extend_from_slice(command.name);
		failure_prefix.extend_from_slice(b": ");
		Ok(Exec { argv: argv?, failure_prefix: failure_prefix })
	}

	/// Runs in the forked child: restores the default SIGPIPE disposition
	/// the Rust runtime ignores, wires the pipe end and redirections onto
	/// stdin/stdout, in that order, then replaces the image.
	fn run(&self, pipe_end: Option<(OwnedFd, RawFd)>, redirects: OpenedRedirects) -> ! {
		let r = unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) }
			.and_then(|_| pipe_end.map_or(Ok(()), |(fd, target)| remap(fd, target)))
			.and_then(|()| redirects.install());
		let e = match r {
			Err(e) => e,
			Ok(()) => match unistd::execvp(&self.argv[0], &self.argv) {
				Err(e) => e,
				Ok(never) => match never {},
			},
		};
		self.fail(e)
	}

	fn fail(&self, e: Errno) -> ! {
		write_stderr(&self.failure_prefix);
		write_stderr(e.desc().as_bytes());
		write_stderr(b"\n");
		let status = if e == Errno::ENOENT { 127 } else { 126 };
		unsafe { libc::_exit(status) }
	}
}

/// A raw `write(2)`; safe to call between `fork` and `exec`.
fn write_stderr(buf: &[u8]) {
	unsafe {
		libc::write(libc::STDERR_FILENO, buf.as_ptr() as *const libc::c_void, buf.len());
	}
}

pub fn exec_simple(command: &Command) -> Result<u8, ExecError> {
	let exec = Exec::new(command)?;
	let redirects = OpenedRedirects::open(&command.redirects)?;
	let mut job = Job::new(1);
	match job.push_fork()? {
		ForkResult::Parent { .. } => {},
		ForkResult::Child => exec.run(None, redirects),
	}
	drop(redirects);
	job.wait()
}

pub fn exec_pipeline(pipeline: &Pipeline) -> Result<u8, ExecError> {
	let left = parser::parse_command(pipeline.left).ok_or(ExecError::EmptyPipelineSide)?;
	let right = parser::parse_command(pipeline.right).ok_or(ExecError::EmptyPipelineSide)?;
	let left_exec = Exec::new(&left)?;
	let right_exec = Exec::new(&right)?;
	let left_redirects = OpenedRedirects::open(&left.redirects)?;
	let right_redirects = OpenedRedirects::open(&right.redirects)?;

	// Declared before the pipe so that an early return closes both ends
	// before the job reaps the left child.
	let mut job = Job::new(2);
	let (pipe_read, pipe_write) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(ExecError::sys("pipe"))?;
	match job.push_fork()? {
		ForkResult::Parent { .. } => {},
		ForkResult::Child => {
			drop(pipe_read);
			drop(right_redirects);
			left_exec.run(Some((pipe_write, libc::STDOUT_FILENO)), left_redirects)
		},
	}
	match job.push_fork()? {
		ForkResult::Parent { .. } => {},
		ForkResult::Child => {
			drop(pipe_write);
			drop(left_redirects);
			right_exec.run(Some((pipe_read, libc::STDIN_FILENO)), right_redirects)
		},
	}
	drop(pipe_read);
	drop(pipe_write);
	drop(left_redirects);
	drop(right_redirects);
	job.wait()
}

pub enum EvalResult {
	Done(u8),
	Exit,
}

pub fn eval(state: &mut global::State, line: &[u8]) -> EvalResult {
	let r = match parser::parse(line) {
		Line::Empty => Ok(0),
		Line::Builtin(Builtin::Exit) => return EvalResult::Exit,
		Line::Builtin(Builtin::Cd(path)) => builtin::builtin_cd(state, path),
		Line::Simple(command) => exec_simple(&command),
		Line::Pipeline(pipeline) => exec_pipeline(&pipeline),
	};
	EvalResult::Done(r.unwrap_or_else(|e| {
		let _ = writeln!(&mut io::stderr(), "esd: {}", e);
		1
	}))
}
