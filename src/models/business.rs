use serde::{Deserialize, Serialize};

use crate::clients::yelp::BusinessItem;
use crate::domain::LocationId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub id: i32,
    pub created_at: i64,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: Option<String>,
    pub location_id: LocationId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBusiness {
    pub created_at: i64,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: Option<String>,
}

impl NewBusiness {
    #[must_use]
    pub fn from_provider(item: BusinessItem, created_at: i64) -> Self {
        Self {
            created_at,
            name: item.name,
            image_url: item.image_url,
            price: item.price,
            rating: item.rating,
            url: item.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unpriced_business_keeps_price_empty() {
        let item: BusinessItem = serde_json::from_value(json!({
            "name": "Pike Place Chowder",
            "image_url": "https://s3-media.fl.yelpcdn.com/bphoto/x/o.jpg",
            "rating": 4.5,
            "url": "https://www.yelp.com/biz/pike-place-chowder-seattle"
        }))
        .unwrap();

        let business = NewBusiness::from_provider(item, 9);
        assert_eq!(business.name.as_deref(), Some("Pike Place Chowder"));
        assert_eq!(business.rating, Some(4.5));
        assert!(business.price.is_none());
        assert_eq!(business.created_at, 9);
    }
}
