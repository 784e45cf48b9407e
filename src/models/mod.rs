pub mod filters;
pub mod itinerary;
pub mod weather;
