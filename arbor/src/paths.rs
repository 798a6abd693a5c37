use std::{
    env::{self, VarError},
    path::PathBuf,
};
use thiserror::Error;

const PROJECT_NAME: &str = "arbor";
const CONFIG_FILE: &str = "arbor.toml";

#[derive(Debug, Clone)]
pub struct Paths {
    config_dir: PathBuf,
}

#[derive(Error, Debug, Clone)]
pub enum PathsError {
    #[error(transparent)]
    Var(#[from] VarError),
}

impl Paths {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    pub fn create() -> Result<Paths, PathsError> {
        let config_dir: PathBuf = Self::var("XDG_CONFIG_HOME")
            .or_else(|_| Self::var("HOME").map(|home| format!("{home}/.config")))
            .map(From::from)?;
        Ok(Paths::new(config_dir.join(PROJECT_NAME)))
    }

    #[cfg(target_os = "macos")]
    pub fn create() -> Result<Paths, PathsError> {
        let home_dir: PathBuf = Self::var("HOME").map(From::from)?;
        Ok(Paths::new(
            home_dir
                .join("Library")
                .join("Application Support")
                .join(PROJECT_NAME),
        ))
    }

    #[cfg(target_os = "windows")]
    pub fn create() -> Result<Paths, PathsError> {
        let app_data_dir: PathBuf = Self::var("APPDATA").map(From::from)?;
        Ok(Paths::new(app_data_dir.join(PROJECT_NAME)))
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    fn var(var: &str) -> Result<String, PathsError> {
        env::var(var).map_err(From::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_in_config_dir() {
        let paths = Paths::new(PathBuf::from("/home/me/.config/arbor"));
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/home/me/.config/arbor/arbor.toml")
        );
    }
}
