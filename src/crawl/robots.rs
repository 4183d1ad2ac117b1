// src/crawl/robots.rs
// =============================================================================
// robots.txt compliance check.
//
// Only the literal subset of robots.txt is understood:
// - User-agent lines select a group (ours, or '*')
// - Disallow lines inside that group block URL paths by prefix
// Everything else (Allow, wildcards, Crawl-delay, Sitemap) is ignored.
//
// Any failure to get robots.txt means "allowed" (fail open). robots.txt is
// fetched again on every call; there is no per-origin cache.
// =============================================================================

use crate::page::classify_error;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Name we look for in User-agent lines
pub const CRAWLER_NAME: &str = "spiderling";

/// User agent sent when fetching robots.txt
pub const ROBOTS_USER_AGENT: &str = concat!("spiderling/", env!("CARGO_PKG_VERSION"));

/// robots.txt fetches use their own short timeout, independent of page fetches
pub const ROBOTS_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches and evaluates robots.txt for one URL at a time.
#[derive(Debug, Clone)]
pub struct RobotsChecker {
    client: Client,
}

impl RobotsChecker {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(ROBOTS_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(ROBOTS_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Decides whether `url` may be crawled.
    ///
    /// When `enabled` is false this is always true and no request is made.
    pub async fn is_allowed(&self, url: &Url, enabled: bool) -> bool {
        if !enabled {
            return true;
        }

        let Some(robots_txt) = self.fetch_robots(url).await else {
            return true;
        };

        let allowed = robots_allows(&robots_txt, url.path());
        if !allowed {
            debug!(url = %url, "robots.txt disallows crawling");
        }
        allowed
    }

    // None on any failure, which callers treat as "allowed"
    async fn fetch_robots(&self, url: &Url) -> Option<String> {
        let robots_url = robots_url(url)?;

        let response = match self.client.get(robots_url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(%robots_url, error = %classify_error(e), "robots.txt unavailable, allowing");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(%robots_url, status = response.status().as_u16(), "no robots.txt, allowing");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(%robots_url, error = %classify_error(e), "unreadable robots.txt, allowing");
                None
            }
        }
    }
}

/// `{scheme}://{host}[:port]/robots.txt` for the origin of `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    if url.host_str().is_none() {
        return None;
    }
    url.join("/robots.txt").ok()
}

/// Evaluates a robots.txt body for a URL path.
///
/// Returns false at the first Disallow rule in an applicable group whose
/// value is a prefix of `path`. An empty Disallow blocks nothing and
/// `Disallow: /` blocks everything.
pub fn robots_allows(robots_txt: &str, path: &str) -> bool {
    // Consecutive User-agent lines share the rules that follow them
    let mut group_applies = false;
    let mut reading_agents = false;

    for raw_line in robots_txt.lines() {
        let line = raw_line
            .split_once('#')
            .map_or(raw_line, |(before, _)| before)
            .trim();

        let Some((field, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match field.trim().to_ascii_lowercase().as_str() {
            "user-agent" => {
                let matches = agent_matches(value);
                group_applies = if reading_agents {
                    group_applies || matches
                } else {
                    matches
                };
                reading_agents = true;
            }
            "disallow" => {
                reading_agents = false;
                if group_applies && disallows(value, path) {
                    return false;
                }
            }
            _ => reading_agents = false,
        }
    }

    true
}

fn agent_matches(agent: &str) -> bool {
    agent == "*"
        || agent.eq_ignore_ascii_case(CRAWLER_NAME)
        || agent.eq_ignore_ascii_case(ROBOTS_USER_AGENT)
}

fn disallows(rule: &str, path: &str) -> bool {
    match rule {
        "" => false,
        "/" => true,
        prefix => path.starts_with(prefix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_disallow_prefix() {
        let robots = "User-agent: *\nDisallow: /private";
        assert!(!robots_allows(robots, "/private/page"));
        assert!(!robots_allows(robots, "/private"));
        assert!(robots_allows(robots, "/public"));
    }

    #[test]
    fn test_disallow_root_blocks_everything() {
        let robots = "User-agent: *\nDisallow: /";
        assert!(!robots_allows(robots, "/"));
        assert!(!robots_allows(robots, "/anything/at/all"));
    }

    #[test]
    fn test_empty_disallow_blocks_nothing() {
        let robots = "User-agent: *\nDisallow:\n";
        assert!(robots_allows(robots, "/"));
        assert!(robots_allows(robots, "/private"));
    }

    #[test]
    fn test_rules_for_other_agents_ignored() {
        let robots = "\
User-agent: BadBot
Disallow: /

User-agent: *
Disallow: /admin/
";
        assert!(robots_allows(robots, "/docs"));
        assert!(!robots_allows(robots, "/admin/panel"));
    }

    #[test]
    fn test_own_agent_matches_case_insensitively() {
        let robots = "User-agent: SpiderLing\nDisallow: /drafts";
        assert!(!robots_allows(robots, "/drafts/1"));

        let versioned = format!("User-agent: {}\nDisallow: /x", ROBOTS_USER_AGENT.to_uppercase());
        assert!(!robots_allows(&versioned, "/x"));
    }

    #[test]
    fn test_grouped_agents_share_rules() {
        let robots = "User-agent: OtherBot\nUser-agent: *\nDisallow: /shared";
        assert!(!robots_allows(robots, "/shared/page"));
    }

    #[test]
    fn test_disallow_before_any_agent_ignored() {
        let robots = "Disallow: /\nUser-agent: *\nDisallow: /tmp";
        assert!(robots_allows(robots, "/"));
        assert!(!robots_allows(robots, "/tmp/file"));
    }

    #[test]
    fn test_comments_and_case_of_directives() {
        let robots = "# comment line\n\
                      USER-AGENT: * # everyone\n\
                      DISALLOW: /secret # keep out\n\
                      Allow: /secret/public";
        assert!(!robots_allows(robots, "/secret/public"));
        assert!(robots_allows(robots, "/open"));
    }

    #[test]
    fn test_robots_url_keeps_origin_only() {
        let url = Url::parse("https://x.test:8443/deep/page?q=1#frag").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "https://x.test:8443/robots.txt"
        );
    }

    #[tokio::test]
    async fn test_fetched_robots_disallow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .and(header("user-agent", ROBOTS_USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
            )
            .mount(&server)
            .await;

        let checker = RobotsChecker::new().unwrap();
        let private = Url::parse(&format!("{}/private/page", server.uri())).unwrap();
        let public = Url::parse(&format!("{}/public", server.uri())).unwrap();

        assert!(!checker.is_allowed(&private, true).await);
        assert!(checker.is_allowed(&public, true).await);
    }

    #[tokio::test]
    async fn test_missing_robots_fails_open() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let checker = RobotsChecker::new().unwrap();
        let url = Url::parse(&format!("{}/private/page", server.uri())).unwrap();
        assert!(checker.is_allowed(&url, true).await);
    }

    #[tokio::test]
    async fn test_slow_robots_fails_open() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("User-agent: *\nDisallow: /")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let checker = RobotsChecker::with_timeout(Duration::from_millis(100)).unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        assert!(checker.is_allowed(&url, true).await);
    }

    #[tokio::test]
    async fn test_disabled_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
            .expect(0)
            .mount(&server)
            .await;

        let checker = RobotsChecker::new().unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        assert!(checker.is_allowed(&url, false).await);
    }
}
