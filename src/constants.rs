pub mod cache {

    /// Forecasts are refetched once a stored batch is older than this.
    pub const WEATHER_FRESHNESS_MS: u64 = 15_000;
}

pub mod messages {

    pub const NOT_FOUND: &str = "Sorry, page not found";

    pub const SERVER_ERROR: &str = "Sorry, something went wrong.";
}
