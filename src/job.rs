use nix::errno::Errno;
use nix::unistd::{self, ForkResult, Pid};
use nix::sys::wait::{self, WaitStatus};

use crate::error::ExecError;

pub trait WaitStatusExt {
	fn is_alive(self) -> bool;
	fn code(self) -> u8;
}

impl WaitStatusExt for WaitStatus {
	fn is_alive(self) -> bool {
		self == WaitStatus::StillAlive
	}
	fn code(self) -> u8 {
		match self {
			WaitStatus::Exited(_, code) => code as u8,
			WaitStatus::Signaled(_, sig, _) => 128u8.wrapping_add(sig as i32 as u8),
			_ => 0,
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Process {
	pub pid: Pid,
	pub status: WaitStatus,
}

/// The children forked for one input line. Each child is reaped exactly
/// once, by `wait` or, failing that, when the job is dropped.
#[derive(Debug)]
pub struct Job {
	processes: Vec<Process>,
}

impl Job {
	pub fn new(size_hint: usize) -> Job {
		Job { processes: Vec::with_capacity(size_hint) }
	}

	pub fn push_fork(&mut self) -> Result<ForkResult, ExecError> {
		let r = unsafe { unistd::fork() }.map_err(ExecError::sys("fork"))?;
		if let ForkResult::Parent { child } = r {
			self.processes.push(Process { pid: child, status: WaitStatus::StillAlive });
		}
		Ok(r)
	}

	/// Blocks until every child has terminated. Returns the status of the
	/// last child pushed.
	pub fn wait(mut self) -> Result<u8, ExecError> {
		for pr in self.processes.iter_mut() {
			pr.status = waitpid(pr.pid)?;
		}
		Ok(self.processes.last().map_or(0, |pr| pr.status.code()))
	}
}

impl Drop for Job {
	fn drop(&mut self) {
		for pr in self.processes.iter_mut().filter(|pr| pr.status.is_alive()) {
			if let Ok(status) = waitpid(pr.pid) {
				pr.status = status;
			}
		}
	}
}

fn syscall<F, T>(f: F) -> nix::Result<T> where F: Fn() -> nix::Result<T> {
	loop {
		match f() {
			Err(Errno::EINTR) => (),
			result => return result,
		}
	}
}

fn waitpid(pid: Pid) -> Result<WaitStatus, ExecError> {
	syscall(|| wait::waitpid(pid, None)).map_err(ExecError::sys("waitpid"))
}
