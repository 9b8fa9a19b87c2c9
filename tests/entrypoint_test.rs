//! Tests for the wrapper entrypoint with a fake launcher
//!
//! The fake records every command line it is asked to spawn and counts how
//! many child handles were released, so exit paths can be checked without
//! starting real processes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chain_wrapper::{execute, run, LaunchError, Launcher, WrapperConfig, WRAPPER_FAILURE_EXIT_CODE};

#[derive(Clone, Copy)]
enum Outcome {
    Exit(i32),
    SpawnFails,
    StatusFails,
}

struct FakeLauncher {
    outcome: Outcome,
    spawned: RefCell<Vec<String>>,
    released: Rc<Cell<usize>>,
}

struct FakeChild {
    program: String,
    released: Rc<Cell<usize>>,
}

impl Drop for FakeChild {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

impl FakeLauncher {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            spawned: RefCell::new(Vec::new()),
            released: Rc::new(Cell::new(0)),
        }
    }
}

impl Launcher for FakeLauncher {
    type Child = FakeChild;

    fn spawn(&self, command_line: &str) -> Result<FakeChild, LaunchError> {
        self.spawned.borrow_mut().push(command_line.to_string());
        let program = chain_wrapper::program_name(command_line);

        if let Outcome::SpawnFails = self.outcome {
            return Err(LaunchError::Spawn {
                program,
                message: chain_wrapper::describe_error_code(2),
            });
        }

        Ok(FakeChild {
            program,
            released: Rc::clone(&self.released),
        })
    }

    fn wait(&self, child: FakeChild) -> Result<i32, LaunchError> {
        match self.outcome {
            Outcome::Exit(code) => Ok(code),
            _ => Err(LaunchError::Status {
                program: child.program.clone(),
                message: "Error code (6)".to_string(),
            }),
        }
    }
}

const LINKER: WrapperConfig<'static> = WrapperConfig::new(r#""C:\real.exe""#, "/Brepro", "");
const COMPILER: WrapperConfig<'static> =
    WrapperConfig::new("cl_real.exe", "/Brepro", "/link /emittoolversioninfo:no");

#[test]
fn test_spawns_rewritten_command_line() {
    let launcher = FakeLauncher::new(Outcome::Exit(0));
    assert_eq!(execute(&LINKER, "orig.exe --flag1 --flag2", &launcher), Ok(0));
    assert_eq!(
        launcher.spawned.borrow().as_slice(),
        [r#""C:\real.exe" /Brepro --flag1 --flag2"#]
    );
}

#[test]
fn test_post_flags_follow_all_original_arguments() {
    let launcher = FakeLauncher::new(Outcome::Exit(0));
    run(&COMPILER, "cl.exe /nologo /c a.c /link /OUT:a.exe", &launcher);

    let spawned = launcher.spawned.borrow();
    let line = &spawned[0];
    let original_end = line.find("/OUT:a.exe").unwrap() + "/OUT:a.exe".len();
    let post_start = line.rfind("/link /emittoolversioninfo:no").unwrap();
    assert!(post_start > original_end);
    assert!(line.ends_with(" /link /emittoolversioninfo:no"));
}

#[test]
fn test_exit_codes_pass_through() {
    for code in [0, 1, 3, 255, -1073741819] {
        let launcher = FakeLauncher::new(Outcome::Exit(code));
        assert_eq!(run(&LINKER, "link.exe /DLL", &launcher), code);
        assert_eq!(launcher.released.get(), 1);
    }
}

#[test]
fn test_spawn_failure_returns_sentinel() {
    let launcher = FakeLauncher::new(Outcome::SpawnFails);
    assert_eq!(run(&LINKER, "link.exe /DLL", &launcher), WRAPPER_FAILURE_EXIT_CODE);
    assert_eq!(launcher.released.get(), 0);
}

#[test]
fn test_spawn_failure_message_names_program() {
    let launcher = FakeLauncher::new(Outcome::SpawnFails);
    let err = execute(&LINKER, "link.exe /DLL", &launcher).unwrap_err();
    let message = err.to_string();
    assert!(message.contains(r"C:\real.exe"), "Unexpected message: {}", message);
    assert!(!message.trim_end().ends_with(':'));
}

#[test]
fn test_status_failure_returns_sentinel_and_releases_child() {
    let launcher = FakeLauncher::new(Outcome::StatusFails);
    assert_eq!(run(&COMPILER, "cl.exe /c a.c", &launcher), WRAPPER_FAILURE_EXIT_CODE);
    assert_eq!(launcher.released.get(), 1);
}

#[test]
fn test_status_failure_message() {
    let launcher = FakeLauncher::new(Outcome::StatusFails);
    let err = execute(&COMPILER, "cl.exe /c a.c", &launcher).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not retrieve exit code for \"cl_real.exe\": Error code (6)"
    );
}
