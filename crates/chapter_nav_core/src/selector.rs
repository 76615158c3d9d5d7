use serde::Deserialize;
use url::Url;

/// Built-in site table, in match priority order.
const BUILTIN_RULES: [(&str, &str); 4] = [
    ("chatgpt", ".whitespace-pre-wrap"),
    ("gemini", ".query-text"),
    ("claude", ".whitespace-pre-wrap.break-words"),
    ("perplexity", ".select-text"),
];

/// Associates a site identifier with the selector locating "my message" elements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchRule {
    pub site: String,
    pub query: String,
}

/// Ordered list of match rules; the first rule whose site occurs in the host wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<MatchRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// Returns the query expression for `host`, or `None` for unsupported sites.
    ///
    /// Host names are compared in ASCII lowercase, so `Claude.AI` and
    /// `claude.ai` resolve the same way.
    pub fn resolve(&self, host: &str) -> Option<&str> {
        let host = host.to_ascii_lowercase();
        self.rules
            .iter()
            .find(|rule| !rule.site.is_empty() && host.contains(&rule.site.to_ascii_lowercase()))
            .map(|rule| rule.query.as_str())
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(
            BUILTIN_RULES
                .iter()
                .map(|(site, query)| MatchRule {
                    site: (*site).to_string(),
                    query: (*query).to_string(),
                })
                .collect(),
        )
    }
}

/// Resolves `host` against the built-in table.
pub fn resolve_selector(host: &str) -> Option<&'static str> {
    let host = host.to_ascii_lowercase();
    BUILTIN_RULES
        .iter()
        .find(|(site, _)| host.contains(site))
        .map(|(_, query)| *query)
}

/// Extracts the host name from a full page URL such as `location.href`.
pub fn host_from_url(page_url: &str) -> Option<String> {
    Url::parse(page_url.trim())
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::{host_from_url, resolve_selector, MatchRule, RuleTable};

    #[test]
    fn known_sites_resolve_through_subdomains() {
        assert_eq!(resolve_selector("chatgpt.com"), Some(".whitespace-pre-wrap"));
        assert_eq!(resolve_selector("eu.chatgpt.com"), Some(".whitespace-pre-wrap"));
        assert_eq!(resolve_selector("gemini.google.com"), Some(".query-text"));
        assert_eq!(
            resolve_selector("claude.ai"),
            Some(".whitespace-pre-wrap.break-words")
        );
        assert_eq!(resolve_selector("www.perplexity.ai"), Some(".select-text"));
    }

    #[test]
    fn unknown_hosts_resolve_to_none() {
        assert_eq!(resolve_selector("example.com"), None);
        assert_eq!(resolve_selector(""), None);
        assert_eq!(resolve_selector("chat.openai.com"), None);
    }

    #[test]
    fn first_rule_wins_when_several_match() {
        // "chatgpt" precedes "claude" in the table.
        assert_eq!(
            resolve_selector("claude-vs-chatgpt.example"),
            Some(".whitespace-pre-wrap")
        );
    }

    #[test]
    fn builtin_table_agrees_with_free_function() {
        let table = RuleTable::default();
        for host in ["chatgpt.com", "gemini.google.com", "claude.ai", "perplexity.ai", "x.org"] {
            assert_eq!(table.resolve(host), resolve_selector(host), "host {host}");
        }
    }

    #[test]
    fn custom_table_replaces_builtin_rules() {
        let table = RuleTable::new(vec![MatchRule {
            site: "mistral".to_string(),
            query: ".user-msg".to_string(),
        }]);
        assert_eq!(table.resolve("chat.mistral.ai"), Some(".user-msg"));
        assert_eq!(table.resolve("chatgpt.com"), None);
    }

    #[test]
    fn host_is_lowercased_before_matching() {
        assert_eq!(
            resolve_selector("Claude.AI"),
            Some(".whitespace-pre-wrap.break-words")
        );
    }

    #[test]
    fn host_from_url_extracts_host() {
        assert_eq!(
            host_from_url("https://chatgpt.com/c/abc?x=1").as_deref(),
            Some("chatgpt.com")
        );
        assert_eq!(host_from_url("not a url"), None);
    }
}
