use std::env;
use std::ffi::OsString;

/// Execution context of the main loop. The working directory itself lives in
/// the process; this holds what the loop reads besides it.
pub struct State {
	pub home: Option<OsString>,
}

impl State {
	pub fn from_env() -> State {
		State::with_home(env::var_os("HOME"))
	}

	pub fn with_home(home: Option<OsString>) -> State {
		State { home: home }
	}
}
