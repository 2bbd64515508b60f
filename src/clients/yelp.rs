use serde::Deserialize;

use super::{ClientError, ProviderRequest, endpoint};

pub const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub businesses: Vec<BusinessItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessItem {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: Option<String>,
}

/// `GET {base}/businesses/search?location=..`
///
/// Yelp is the only provider that authenticates with a bearer header instead of
/// a key in the URL.
pub fn request(base: &str, api_key: &str, location: &str) -> Result<ProviderRequest, ClientError> {
    let mut url = endpoint(base, &["businesses", "search"])?;
    url.query_pairs_mut().append_pair("location", location);
    Ok(ProviderRequest::new(url).with_bearer(api_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_sends_key_as_bearer_not_query() {
        let request = request(DEFAULT_BASE_URL, "secret", "Seattle").unwrap();
        assert_eq!(request.url.query(), Some("location=Seattle"));
        assert_eq!(request.bearer.as_deref(), Some("secret"));
    }
}
