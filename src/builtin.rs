use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;

use nix::unistd;

use crate::error::ExecError;
use crate::global;
use crate::types::Builtin;

/// `cd` without an argument goes to `$HOME`; otherwise the rest of the line
/// after `cd ` is taken literally as the target.
pub fn builtin_cd(state: &mut global::State, path: Option<&[u8]>) -> Result<u8, ExecError> {
	let target: &OsStr = match path {
		Some(p) => OsStr::from_bytes(p),
		None => state.home.as_deref().ok_or(ExecError::HomeUnset)?,
	};
	unistd::chdir(target).map_err(|e| ExecError::Path("cd", target.to_owned(), io::Error::from(e)))?;
	Ok(0)
}

pub fn match_builtin(line: &[u8]) -> Option<Builtin> {
	match line {
		b"exit" => Some(Builtin::Exit),
		b"cd" => Some(Builtin::Cd(None)),
		_ => line.strip_prefix(b"cd ").map(|path| Builtin::Cd(Some(path))),
	}
}
