use std::{env, fs, io, process};
use std::ffi::OsStr;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

const PROMPT: &str = "esd> ";

/// Drives one `esd` process through piped stdin, the way a terminal would.
struct ShellHandler {
	child: process::Child,
}

struct Session {
	status: process::ExitStatus,
	stdout: String,
	stderr: String,
}

impl ShellHandler {
	fn new(cwd: &Path, home: Option<&OsStr>) -> io::Result<ShellHandler> {
		let mut cmd = process::Command::new(env!("CARGO_BIN_EXE_esd"));
		cmd.current_dir(cwd)
			.stdin(process::Stdio::piped())
			.stdout(process::Stdio::piped())
			.stderr(process::Stdio::piped());
		match home {
			Some(home) => cmd.env("HOME", home),
			None => cmd.env_remove("HOME"),
		};
		Ok(ShellHandler { child: cmd.spawn()? })
	}

	fn input(&mut self, line: &str) {
		let stdin = self.child.stdin.as_mut().unwrap();
		let _ = stdin.write_all(line.as_bytes());
		let _ = stdin.write_all(b"\n");
	}

	fn finish(mut self) -> Session {
		drop(self.child.stdin.take());
		let output = self.child.wait_with_output().unwrap();
		Session {
			status: output.status,
			stdout: String::from_utf8(output.stdout).unwrap(),
			stderr: String::from_utf8(output.stderr).unwrap(),
		}
	}
}

fn scratch(name: &str) -> PathBuf {
	let dir = env::temp_dir().join(format!("esd_session_{}_{}", name, process::id()));
	let _ = fs::remove_dir_all(&dir);
	fs::create_dir_all(&dir).unwrap();
	dir.canonicalize().unwrap()
}

fn session(cwd: &Path, lines: &[&str]) -> Session {
	let mut t = ShellHandler::new(cwd, Some(cwd.as_os_str())).unwrap();
	for line in lines {
		t.input(line);
	}
	t.finish()
}

#[test]
fn prompt() {
	let dir = scratch("prompt");
	let s = session(&dir, &[]);
	assert!(s.status.success());
	assert_eq!(s.stdout, PROMPT);
}

#[test]
fn exit_prints_no_further_prompt() {
	let dir = scratch("exit");
	let s = session(&dir, &["exit", "echo unreachable"]);
	assert_eq!(s.status.code(), Some(0));
	assert_eq!(s.stdout, PROMPT);
}

#[test]
fn blank_lines_are_skipped() {
	let dir = scratch("blank");
	let s = session(&dir, &["", "     ", "echo ok"]);
	assert_eq!(s.stdout, format!("{0}{0}{0}ok\n{0}", PROMPT));
	assert_eq!(s.stderr, "");
}

#[test]
fn echo_arguments() {
	let dir = scratch("echo");
	let s = session(&dir, &["echo   hello    world"]);
	assert_eq!(s.stdout, format!("{0}hello world\n{0}", PROMPT));
}

#[test]
fn relative_redirection_round_trip() {
	let dir = scratch("redir");
	let s = session(&dir, &["echo hello > out.txt", "cat < out.txt"]);
	assert_eq!(fs::read_to_string(dir.join("out.txt")).unwrap(), "hello\n");
	assert_eq!(s.stdout, format!("{0}{0}hello\n{0}", PROMPT));
}

#[test]
fn pipeline_sorts() {
	let dir = scratch("pipe");
	let s = session(&dir, &["printf b\\na\\n | sort"]);
	assert_eq!(s.stdout, format!("{0}a\nb\n{0}", PROMPT));
}

#[test]
fn cd_without_argument_goes_home() {
	let dir = scratch("cd_home");
	let home = dir.join("home");
	fs::create_dir_all(&home).unwrap();
	fs::write(home.join("marker.txt"), "at home\n").unwrap();

	let mut t = ShellHandler::new(&dir, Some(home.as_os_str())).unwrap();
	t.input("cd");
	t.input("cat marker.txt");
	t.input("pwd");
	let s = t.finish();
	assert_eq!(s.stdout, format!("{0}{0}at home\n{0}{1}\n{0}", PROMPT, home.display()));
}

#[test]
fn cd_to_path() {
	let dir = scratch("cd_path");
	fs::create_dir_all(dir.join("sub")).unwrap();
	let s = session(&dir, &["cd sub", "echo here > here.txt"]);
	assert_eq!(s.stderr, "");
	assert!(dir.join("sub").join("here.txt").exists());
}

#[test]
fn cd_failure_keeps_directory() {
	let dir = scratch("cd_fail");
	let s = session(&dir, &["cd /nonexistent/esd", "pwd"]);
	assert_eq!(s.stdout, format!("{0}{0}{1}\n{0}", PROMPT, dir.display()));
	assert!(s.stderr.starts_with("esd: cd: /nonexistent/esd: "), "{}", s.stderr);
}

#[test]
fn cd_without_home() {
	let dir = scratch("cd_nohome");
	let mut t = ShellHandler::new(&dir, None).unwrap();
	t.input("cd");
	t.input("pwd");
	let s = t.finish();
	assert_eq!(s.stderr, "esd: cd: HOME not set\n");
	assert_eq!(s.stdout, format!("{0}{0}{1}\n{0}", PROMPT, dir.display()));
}

#[test]
fn unknown_program_keeps_shell_alive() {
	let dir = scratch("unknown");
	let s = session(&dir, &["esd-no-such-program-anywhere", "echo still here"]);
	assert!(s.status.success());
	assert!(s.stderr.starts_with("esd: esd-no-such-program-anywhere: "), "{}", s.stderr);
	assert_eq!(s.stdout, format!("{0}{0}still here\n{0}", PROMPT));
}

#[test]
fn unreadable_redirect_is_reported() {
	let dir = scratch("open_fail");
	let s = session(&dir, &["cat < missing.txt", "echo next"]);
	assert!(s.stderr.starts_with("esd: open: missing.txt: "), "{}", s.stderr);
	assert_eq!(s.stdout, format!("{0}{0}next\n{0}", PROMPT));
}

#[test]
fn trailing_operator_is_passed_through() {
	let dir = scratch("trailing");
	let s = session(&dir, &["echo a >"]);
	assert_eq!(s.stdout, format!("{0}a >\n{0}", PROMPT));
}

#[test]
fn reader_exiting_early_is_quiet() {
	let dir = scratch("sigpipe");
	let s = session(&dir, &["seq 1 1000000 | head -n 1"]);
	assert_eq!(s.stdout, format!("{0}1\n{0}", PROMPT));
	assert_eq!(s.stderr, "");
}
