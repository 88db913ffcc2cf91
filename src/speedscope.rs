//! speedscope.app URL construction
//!
//! speedscope can load a profile straight from a URL given in its fragment:
//! `https://www.speedscope.app/#profileURL=<encoded url>`. The proxy endpoint
//! URL goes in form-urlencoded (`+` for spaces), matching what speedscope's
//! own parser expects.

use crate::config::ProxyConfig;
use url::form_urlencoded;

/// URL of the proxy's profile endpoint for a query id
pub fn profile_url(proxy: &ProxyConfig, query_id: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("query_id", query_id)
        .finish();
    format!("{}?{}", proxy.endpoint_url(), query)
}

/// Ready-to-open speedscope.app URL that fetches the profile from the proxy
pub fn speedscope_url(proxy: &ProxyConfig, query_id: &str) -> String {
    let fragment: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("profileURL", &profile_url(proxy, query_id))
        .finish();
    format!("https://www.speedscope.app/#{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_url_encodes_the_query_id() {
        let proxy = ProxyConfig::new("localhost", 8080);
        assert_eq!(
            profile_url(&proxy, "ab c/d"),
            "http://localhost:8080/query?query_id=ab+c%2Fd"
        );
    }

    #[test]
    fn speedscope_url_encodes_the_whole_profile_url() {
        let proxy = ProxyConfig::new("localhost", 8080);
        let url = speedscope_url(&proxy, "abc");
        assert_eq!(
            url,
            "https://www.speedscope.app/#profileURL=http%3A%2F%2Flocalhost%3A8080%2Fquery%3Fquery_id%3Dabc"
        );
    }
}
