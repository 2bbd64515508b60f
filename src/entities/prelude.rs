pub use super::events::Entity as Events;
pub use super::locations::Entity as Locations;
pub use super::movies::Entity as Movies;
pub use super::weathers::Entity as Weathers;
pub use super::yelps::Entity as Yelps;
