use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;

pub use app::{
    draw_text, measure_text, run_app, AppError, FramePainter, InputAction, InputSnapshot,
    LoopConfig, Renderer, Scene, SceneCommand, SpriteBitmap, Vec2, GLYPH_HEIGHT_PX, GLYPH_WIDTH_PX,
    SLOW_FRAME_ENV_VAR,
};

pub const ROOT_ENV_VAR: &str = "FLAGRUN_ROOT";

const SCREENSHOTS_DIR_NAME: &str = "screenshots";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub screenshots_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "FLAGRUN_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and a crates/ directory."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and a crates/ directory.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/flagrun\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let screenshots_dir = root.join(SCREENSHOTS_DIR_NAME);
    Ok(AppPaths {
        root,
        screenshots_dir,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("crates").is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_marker_requires_cargo_toml() {
        let cwd = env::current_dir().expect("cwd");
        assert!(!is_repo_marker(&cwd.join("definitely_not_a_marker")));
    }

    #[test]
    fn repo_marker_accepts_workspace_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("write manifest");
        fs::create_dir(dir.path().join("crates")).expect("create crates dir");
        assert!(is_repo_marker(dir.path()));
    }

    #[test]
    fn screenshots_dir_hangs_off_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = AppPaths {
            root: dir.path().to_path_buf(),
            screenshots_dir: dir.path().join(SCREENSHOTS_DIR_NAME),
        };
        assert_eq!(paths.screenshots_dir, paths.root.join("screenshots"));
    }
}
