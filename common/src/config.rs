//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for various configuration files for
//! the tracker.  This is a configuration file/struct neutral loading engine, storing only the
//! base directory and with `load()` read the proper file or the default one.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.inner_mut()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{makepath, ConfigError, Versioned};

/// Config filename
pub const CONFIG: &str = "config.hcl";

/// Main name for the directory base
pub const TAG: &str = "stm-tracker";

/// A loaded configuration file of type `T` along with the directory it belongs to.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    /// Tag is the project name.
    tag: String,
    /// This is the base directory for all files.
    basedir: PathBuf,
    inner: T,
}

/// Find the per-user configuration directory for `tag`.
///
#[tracing::instrument]
pub fn config_dir(tag: &str) -> Result<PathBuf> {
    let basedir = match BaseDirs::new() {
        Some(base) => {
            #[cfg(unix)]
            let base = base.home_dir().join(".config");

            #[cfg(windows)]
            let base = base.data_local_dir().to_path_buf();

            debug!("base = {base:?}");
            makepath!(base, tag)
        }
        None => {
            #[cfg(unix)]
            let homedir = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;

            #[cfg(windows)]
            let homedir = std::env::var("LOCALAPPDATA").map_err(|_| ConfigError::NoHome)?;

            debug!("base = {homedir}");

            #[cfg(unix)]
            let base = makepath!(homedir, ".config", tag);

            #[cfg(windows)]
            let base = makepath!(homedir, tag);

            base
        }
    };
    Ok(basedir)
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Returns the path of the default config directory
    ///
    pub fn config_path(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Returns the project tag
    ///
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the path of the default config file
    ///
    #[tracing::instrument]
    pub fn default_file() -> Result<PathBuf> {
        let cfg = config_dir(TAG)?.join(CONFIG);
        debug!("default = {cfg:?}");
        Ok(cfg)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<ConfigFile<T>> {
        let basedir = config_dir(TAG)?;
        let default = basedir.join(CONFIG);

        let fname = match fname {
            Some(fname) => fname.to_path_buf(),
            None => default.clone(),
        };

        // Use a full path
        //
        if !fname.exists() {
            return Err(ConfigError::MissingFile(
                fname.to_string_lossy().to_string(),
                default.to_string_lossy().to_string(),
            )
            .into());
        }
        let fname = fname.canonicalize()?;

        trace!("Loading config file {fname:?} from {basedir:?}");

        let data = fs::read_to_string(&fname)?;
        let inner = Self::parse(&data)?;
        Ok(ConfigFile {
            tag: TAG.to_string(),
            basedir,
            inner,
        })
    }

    /// Build from an in-memory string, generally an embedded default.
    ///
    #[tracing::instrument(skip(data))]
    pub fn from_hcl(data: &str) -> Result<ConfigFile<T>> {
        let inner = Self::parse(data)?;
        Ok(ConfigFile {
            tag: TAG.to_string(),
            basedir: config_dir(TAG)?,
            inner,
        })
    }

    /// Decode and check the version.
    ///
    fn parse(data: &str) -> Result<T> {
        debug!("string data = {data}");

        let data: T = hcl::from_str(data)?;
        debug!("struct data = {data:?}");

        if data.version() != T::VERSION {
            return Err(ConfigError::BadVersion(data.version(), T::VERSION).into());
        }
        Ok(data)
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Return the inner configuration file as putable
    ///
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the wrapper
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}
