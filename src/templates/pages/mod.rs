pub mod error;
pub mod favorites;
pub mod home;
pub mod inspections;
pub mod nearby;
pub mod no_match;
pub mod recents;
pub mod restaurant;
pub mod search;

pub use error::error_page;
pub use favorites::favorites_page;
pub use home::home_page;
pub use inspections::inspections_page;
pub use nearby::nearby_page;
pub use no_match::no_match_page;
pub use recents::recents_page;
pub use restaurant::{restaurant_page, RestaurantVm};
pub use search::{search_page, SearchVm};
