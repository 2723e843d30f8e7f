//! Argument lists for the west invocations gust issues

use std::path::Path;

/// Inputs of one `west build`.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest<'a> {
    pub board: &'a str,
    /// Absolute application directory
    pub project: Option<&'a Path>,
    pub build_dir: &'a str,
    pub pristine: bool,
    pub shield: &'a str,
    /// Extra CMake arguments, whitespace separated
    pub cmake_args: &'a str,
}

/// `build -b <board> [-d dir] [-p always] [--shield s] [-- cmake...] [project]`
pub fn build_args(req: &BuildRequest<'_>) -> Vec<String> {
    let mut args = vec!["build".to_string(), "-b".to_string(), req.board.to_string()];
    if !req.build_dir.is_empty() {
        args.extend(["-d".to_string(), req.build_dir.to_string()]);
    }
    if req.pristine {
        args.extend(["-p".to_string(), "always".to_string()]);
    }
    if !req.shield.is_empty() {
        args.extend(["--shield".to_string(), req.shield.to_string()]);
    }
    let cmake: Vec<String> = req.cmake_args.split_whitespace().map(str::to_string).collect();
    if !cmake.is_empty() {
        args.push("--".to_string());
        args.extend(cmake);
    }
    if let Some(project) = req.project {
        args.push(project.to_string_lossy().into_owned());
    }
    args
}

/// `flash [-d dir] [-r runner]`
pub fn flash_args(build_dir: &str, runner: &str) -> Vec<String> {
    let mut args = vec!["flash".to_string()];
    if !build_dir.is_empty() {
        args.extend(["-d".to_string(), build_dir.to_string()]);
    }
    if !runner.is_empty() {
        args.extend(["-r".to_string(), runner.to_string()]);
    }
    args
}

/// `build -t run [-b board] [-d dir] [project]`
pub fn test_args(board: &str, build_dir: &str, project: Option<&Path>) -> Vec<String> {
    let mut args = vec!["build".to_string(), "-t".to_string(), "run".to_string()];
    if !board.is_empty() {
        args.extend(["-b".to_string(), board.to_string()]);
    }
    if !build_dir.is_empty() {
        args.extend(["-d".to_string(), build_dir.to_string()]);
    }
    if let Some(project) = project {
        args.push(project.to_string_lossy().into_owned());
    }
    args
}

/// Shell-style echo line, e.g. `$ west flash -d build`.
pub fn echo(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        format!("$ {program}")
    } else {
        format!("$ {program} {}", args.join(" "))
    }
}
