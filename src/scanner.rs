// Scan orchestration: drives probes over the (evasion, parameter)
// combinations of a target URL and reports confirmed findings

use url::Url;

use crate::engine::Transport;
use crate::error::Error;
use crate::models::{Evasion, Finding, Method};
use crate::probe::{Probe, TEST_SCRIPT};

/// How the scanner reacts to a transport failure mid-scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the scan and surface the failure
    #[default]
    FailFast,
    /// Move on to the next combination
    Skip,
}

/// Configuration for one scan. An explicit value threaded through calls, so
/// there is no process-wide mutable default to race on.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// URL of the RFI test script to include
    pub test_script: String,
    /// HTTP method for inclusion requests
    pub method: Method,
    /// Evasions to try, in order
    pub evasions: Vec<Evasion>,
    /// Parameters to test; `None` means every parameter in the target URL's
    /// query string
    pub params: Option<Vec<String>>,
    pub error_policy: ErrorPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            test_script: TEST_SCRIPT.to_string(),
            method: Method::Get,
            evasions: Evasion::ALL.to_vec(),
            params: None,
            error_policy: ErrorPolicy::FailFast,
        }
    }
}

/// Drives probes against one target, reusing a single transport for every
/// trial.
///
/// Iteration order is a committed contract: evasions are the outer loop (in
/// the order configured, canonically none, null-byte, double-encode) and
/// parameters the inner loop (in query-string order). So when several
/// combinations are vulnerable, an unevaded hit on any parameter is
/// reported before any null-byte hit.
pub struct Scanner<T: Transport> {
    transport: T,
    config: ScanConfig,
}

impl<T: Transport> Scanner<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ScanConfig::default())
    }

    pub fn with_config(transport: T, config: ScanConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Parameters to trial for `url`: the configured list, or every distinct
    /// key of the query string in order of first appearance
    fn target_params(&self, url: &Url) -> Vec<String> {
        if let Some(params) = &self.config.params {
            return params.clone();
        }

        let mut params = Vec::new();
        for (key, _) in url.query_pairs() {
            let key = key.into_owned();
            if !params.contains(&key) {
                params.push(key);
            }
        }
        params
    }

    fn probe_for(&self, url: &Url, param: &str, evasion: Evasion) -> Probe {
        Probe::from_url(url.clone(), param)
            .with_evasion(evasion)
            .with_test_script(self.config.test_script.clone())
    }

    fn finding_for(&self, url: &Url, probe: &Probe) -> Result<Finding, Error> {
        Ok(Finding {
            url: url.to_string(),
            param: probe.param().to_string(),
            evasion: probe.evasion(),
            inclusion_url: probe.inclusion_url(&self.config.test_script)?.to_string(),
        })
    }

    /// Test every combination and collect every confirmed finding.
    /// `on_finding` observes each finding as it is discovered, so callers
    /// can stream results instead of waiting for the full sweep.
    pub async fn scan<F>(&self, url: &str, mut on_finding: F) -> Result<Vec<Finding>, Error>
    where
        F: FnMut(&Finding),
    {
        let url = Url::parse(url)?;
        let params = self.target_params(&url);
        let mut findings = Vec::new();

        for &evasion in &self.config.evasions {
            for param in &params {
                let probe = self.probe_for(&url, param, evasion);
                match probe.is_vulnerable(&self.transport, self.config.method).await {
                    Ok(true) => {
                        let finding = self.finding_for(&url, &probe)?;
                        on_finding(&finding);
                        findings.push(finding);
                    }
                    Ok(false) => {}
                    Err(err) => match self.config.error_policy {
                        ErrorPolicy::FailFast => return Err(err),
                        ErrorPolicy::Skip => {}
                    },
                }
            }
        }

        Ok(findings)
    }

    /// Stop at the first confirmed combination; untried combinations cost
    /// no network activity.
    pub async fn find_first(&self, url: &str) -> Result<Option<Finding>, Error> {
        let url = Url::parse(url)?;
        let params = self.target_params(&url);

        for &evasion in &self.config.evasions {
            for param in &params {
                let probe = self.probe_for(&url, param, evasion);
                match probe.is_vulnerable(&self.transport, self.config.method).await {
                    Ok(true) => return Ok(Some(self.finding_for(&url, &probe)?)),
                    Ok(false) => {}
                    Err(err) => match self.config.error_policy {
                        ErrorPolicy::FailFast => return Err(err),
                        ErrorPolicy::Skip => {}
                    },
                }
            }
        }

        Ok(None)
    }

    /// Whether any (parameter, evasion) combination is confirmed vulnerable
    pub async fn is_vulnerable(&self, url: &str) -> Result<bool, Error> {
        Ok(self.find_first(url).await?.is_some())
    }
}
