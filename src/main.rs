mod builtin;
mod error;
mod eval;
mod global;
mod job;
mod parser;
mod repl;
mod types;

use std::io;
use io::Write;

fn main() {
	let mut state = global::State::from_env();
	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();
	let mut stdout = io::stdout();
	if let Err(e) = repl::run(&mut state, &mut stdin_locked, &mut stdout) {
		let _ = writeln!(&mut io::stderr(), "esd: {}", e);
	}
}

/// Serializes tests that fork, open descriptors or change directory.
#[cfg(test)]
fn serial() -> std::sync::MutexGuard<'static, ()> {
	static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
	LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
