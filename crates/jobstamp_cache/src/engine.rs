//! The replay-or-rerun decision.
//!
//! For each call the [`Stamper`]:
//!
//! 1. Fingerprints the call and locates its stamp file
//! 2. Ensures the cache directory exists
//! 3. Loads the staleness method (hash if forced by the switches)
//! 4. Looks for the first trigger: missing stamp, caching disabled, missing
//!    output file, then a missing or changed dependency
//! 5. Runs the job and stamps its result if a trigger fired, otherwise
//!    replays the stamped result

use std::fmt;
use std::path::{Path, PathBuf};

use jobstamp_common::StampMethod;
use jobstamp_config::Switches;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::call::JobCall;
use crate::error::CacheError;
use crate::job::Job;
use crate::method::{self, StalenessMethod};
use crate::store::StampStore;

/// Logs a stamp decision at `info` when the debug switch is on, else `debug`.
macro_rules! notice {
    ($debug:expr, $($event:tt)+) => {
        if $debug {
            tracing::info!(target: "jobstamp", $($event)+)
        } else {
            tracing::debug!(target: "jobstamp", $($event)+)
        }
    };
}

/// Name of the default cache directory under the system temp directory.
const DEFAULT_CACHE_SUBDIR: &str = "jobstamps";

/// Returns `<temp_dir>/jobstamps`.
pub fn default_cache_directory() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_CACHE_SUBDIR)
}

/// Per-call options: what gates a rerun and where stamps are kept.
#[derive(Debug, Clone, Default)]
pub struct StampOptions {
    /// Files whose staleness forces a rerun, checked in order.
    pub dependencies: Vec<PathBuf>,
    /// Files whose absence forces a rerun, checked in order.
    pub output_files: Vec<PathBuf>,
    /// Overrides the stamper's default cache directory.
    pub cache_directory: Option<PathBuf>,
    /// Overrides the stamper's default staleness method.
    pub method: Option<StampMethod>,
}

impl StampOptions {
    /// Creates options with no dependencies, outputs, or overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dependency.
    pub fn dependency(mut self, path: impl Into<PathBuf>) -> Self {
        self.dependencies.push(path.into());
        self
    }

    /// Adds several dependencies.
    pub fn dependencies<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dependencies.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds an expected output file.
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_files.push(path.into());
        self
    }

    /// Adds several expected output files.
    pub fn output_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.output_files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Stores stamps in `dir`.
    pub fn cache_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_directory = Some(dir.into());
        self
    }

    /// Uses `method` to check dependencies.
    pub fn method(mut self, method: StampMethod) -> Self {
        self.method = Some(method);
        self
    }
}

/// Why a job is out of date. Each variant carries the path responsible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The call has never been stamped.
    MissingStamp(PathBuf),
    /// Replay is disabled by the switches; carries the stamp path.
    Disabled(PathBuf),
    /// An expected output file does not exist.
    MissingOutput(PathBuf),
    /// A dependency does not exist.
    MissingDependency(PathBuf),
    /// A dependency changed since the stamp was written.
    ChangedDependency(PathBuf),
}

impl Trigger {
    /// Returns the path that caused the rerun.
    pub fn path(&self) -> &Path {
        match self {
            Trigger::MissingStamp(p)
            | Trigger::Disabled(p)
            | Trigger::MissingOutput(p)
            | Trigger::MissingDependency(p)
            | Trigger::ChangedDependency(p) => p,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::MissingStamp(p) => write!(f, "stamp {} does not exist", p.display()),
            Trigger::Disabled(p) => write!(f, "stamps disabled, ignoring {}", p.display()),
            Trigger::MissingOutput(p) => write!(f, "output {} does not exist", p.display()),
            Trigger::MissingDependency(p) => {
                write!(f, "dependency {} does not exist", p.display())
            }
            Trigger::ChangedDependency(p) => write!(f, "dependency {} out of date", p.display()),
        }
    }
}

/// Everything learned about a call before deciding to replay or rerun.
struct Decision {
    store: StampStore,
    stamp_path: PathBuf,
    method: Box<dyn StalenessMethod>,
    trigger: Option<Trigger>,
}

/// Decides whether to replay a stamped result or run the job again.
///
/// Holds the process-wide switches and the defaults applied when a call's
/// [`StampOptions`] leave the cache directory or method unset. A stamper
/// performs no locking: two processes stamping the same call at once may
/// both run the job, and the last write wins.
#[derive(Debug, Clone)]
pub struct Stamper {
    switches: Switches,
    default_cache_dir: PathBuf,
    default_method: StampMethod,
}

impl Stamper {
    /// Creates a stamper with the given switches and built-in defaults.
    pub fn new(switches: Switches) -> Self {
        Self {
            switches,
            default_cache_dir: default_cache_directory(),
            default_method: StampMethod::default(),
        }
    }

    /// Creates a stamper from the `JOBSTAMPS_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(Switches::from_env())
    }

    /// Sets the cache directory used when a call doesn't name one.
    pub fn with_default_cache_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_cache_dir = dir.into();
        self
    }

    /// Sets the staleness method used when a call doesn't choose one.
    pub fn with_default_method(mut self, method: StampMethod) -> Self {
        self.default_method = method;
        self
    }

    /// Returns the method that will check dependencies for `options`.
    pub fn effective_method(&self, options: &StampOptions) -> StampMethod {
        if self.switches.always_use_hashes {
            StampMethod::Hash
        } else {
            options.method.unwrap_or(self.default_method)
        }
    }

    /// Returns the stamp file path `call` maps to under `options`.
    pub fn stamp_path(&self, call: &JobCall, options: &StampOptions) -> PathBuf {
        self.store_for(options).path_for(&call.fingerprint())
    }

    /// Runs `job` unless the stamp for `call` is up to date.
    ///
    /// On a rerun the job's result is stamped before it is returned. A job
    /// error is returned unchanged and leaves any previous stamp in place.
    pub fn run<T, E, F>(&self, call: &JobCall, options: &StampOptions, job: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        let decision = self.decide(call, options)?;

        match decision.trigger {
            Some(trigger) => {
                self.notice_rerun(call, &trigger);
                let value = job()?;
                decision.store.write(&decision.stamp_path, &value)?;
                decision.method.on_successful_run(&options.dependencies)?;
                Ok(value)
            }
            None => {
                self.notice_replay(call, &decision.stamp_path);
                Ok(decision.store.read(&decision.stamp_path)?)
            }
        }
    }

    /// Runs a [`Job`] unless its stamp is up to date.
    pub fn run_job<J: Job>(&self, job: J, options: &StampOptions) -> Result<J::Output, J::Error> {
        let call = job.call();
        self.run(&call, options, || job.execute())
    }

    /// Reports what would make `call` rerun, without running anything.
    ///
    /// Creates the cache directory if needed but never writes a stamp or
    /// dependency record. Returns `None` when the stamp would be replayed.
    pub fn out_of_date(
        &self,
        call: &JobCall,
        options: &StampOptions,
    ) -> Result<Option<Trigger>, CacheError> {
        Ok(self.decide(call, options)?.trigger)
    }

    fn store_for(&self, options: &StampOptions) -> StampStore {
        let dir = options
            .cache_directory
            .as_deref()
            .unwrap_or(self.default_cache_dir.as_path());
        StampStore::new(dir)
    }

    fn decide(&self, call: &JobCall, options: &StampOptions) -> Result<Decision, CacheError> {
        let store = self.store_for(options);
        let stamp_path = store.path_for(&call.fingerprint());
        store.ensure_directory()?;

        let method = method::load(self.effective_method(options), &stamp_path)?;
        let trigger = self.find_trigger(&stamp_path, method.as_ref(), options)?;

        Ok(Decision {
            store,
            stamp_path,
            method,
            trigger,
        })
    }

    fn find_trigger(
        &self,
        stamp_path: &Path,
        method: &dyn StalenessMethod,
        options: &StampOptions,
    ) -> Result<Option<Trigger>, CacheError> {
        if !stamp_path.exists() {
            return Ok(Some(Trigger::MissingStamp(stamp_path.to_path_buf())));
        }

        if self.switches.disabled {
            return Ok(Some(Trigger::Disabled(stamp_path.to_path_buf())));
        }

        if let Some(output) = options.output_files.iter().find(|p| !p.exists()) {
            return Ok(Some(Trigger::MissingOutput(output.clone())));
        }

        for dep in &options.dependencies {
            if !dep.exists() {
                return Ok(Some(Trigger::MissingDependency(dep.clone())));
            }
            if !method.is_dependency_fresh(dep)? {
                return Ok(Some(Trigger::ChangedDependency(dep.clone())));
            }
        }

        Ok(None)
    }

    fn notice_rerun(&self, call: &JobCall, trigger: &Trigger) {
        notice!(
            self.switches.debug,
            job = call.identity(),
            trigger = %trigger.path().display(),
            "{trigger}, re-running {}",
            call.identity()
        );
    }

    fn notice_replay(&self, call: &JobCall, stamp_path: &Path) {
        notice!(
            self.switches.debug,
            job = call.identity(),
            stamp = %stamp_path.display(),
            "dependencies up to date, using cached value of {}",
            call.identity()
        );
    }
}

impl Default for Stamper {
    fn default() -> Self {
        Self::new(Switches::default())
    }
}
