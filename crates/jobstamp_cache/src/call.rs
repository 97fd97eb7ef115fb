//! Call signatures and their fingerprints.
//!
//! A [`JobCall`] records a job's stable identity together with the `Debug`
//! representation of each argument. Keyword arguments are kept sorted by
//! name, so the order they were supplied in does not affect the fingerprint.
//!
//! The cache is only useful if those representations are stable across
//! runs. Values whose `Debug` output embeds addresses or iterates an
//! unordered collection (`HashMap`, `HashSet`) fingerprint differently from
//! run to run and will never hit the cache.

use std::collections::BTreeMap;
use std::fmt::Debug;

use jobstamp_common::Fingerprint;

/// Separates fields of the canonical signature.
const FIELD_SEPARATOR: char = '\0';

/// The identity and argument representations of one job invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCall {
    identity: String,
    args: Vec<String>,
    kwargs: BTreeMap<String, String>,
}

impl JobCall {
    /// Starts a call signature for the job named `identity`.
    ///
    /// The identity must be stable across processes; it replaces the
    /// function name a dynamic language would introspect.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: &impl Debug) -> Self {
        self.args.push(format!("{value:?}"));
        self
    }

    /// Sets a keyword argument, replacing any earlier value for `name`.
    pub fn kwarg(mut self, name: impl Into<String>, value: &impl Debug) -> Self {
        self.kwargs.insert(name.into(), format!("{value:?}"));
        self
    }

    /// Returns the job identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Builds the canonical signature string that is hashed.
    pub fn canonical(&self) -> String {
        let mut out = self.identity.clone();
        for arg in &self.args {
            out.push(FIELD_SEPARATOR);
            out.push_str(arg);
        }
        for (name, value) in &self.kwargs {
            out.push(FIELD_SEPARATOR);
            out.push_str(name);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Computes the fingerprint naming this call's stamp file.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_bytes(self.canonical().as_bytes())
    }
}
