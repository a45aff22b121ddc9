use std::{error, ffi, fmt, io};
use std::ffi::OsString;

use nix::errno::Errno;

#[derive(Debug)]
pub enum ExecError {
	/// A system call failed; the first field names it.
	Sys(&'static str, Errno),
	/// A path given to `open` or `chdir` could not be used.
	Path(&'static str, OsString, io::Error),
	Nul(ffi::NulError),
	HomeUnset,
	EmptyPipelineSide,
}

impl ExecError {
	pub fn sys(op: &'static str) -> impl FnOnce(Errno) -> ExecError {
		move |e| ExecError::Sys(op, e)
	}
}

impl From<ffi::NulError> for ExecError {
	fn from(e: ffi::NulError) -> ExecError {
		ExecError::Nul(e)
	}
}

impl fmt::Display for ExecError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			ExecError::Sys(op, e) => write!(f, "{}: {}", op, e.desc()),
			ExecError::Path(op, ref path, ref e) => write!(f, "{}: {}: {}", op, path.to_string_lossy(), e),
			ExecError::Nul(ref e) => write!(f, "Nul char error: {}", e),
			ExecError::HomeUnset => write!(f, "cd: HOME not set"),
			ExecError::EmptyPipelineSide => write!(f, "pipe: missing command"),
		}
	}
}

impl error::Error for ExecError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			ExecError::Sys(_, ref e) => Some(e),
			ExecError::Path(_, _, ref e) => Some(e),
			ExecError::Nul(ref e) => Some(e),
			ExecError::HomeUnset | ExecError::EmptyPipelineSide => None,
		}
	}
}
