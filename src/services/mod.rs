pub mod catalog_service;
pub mod discount_service;
pub mod listing_search_service;
pub mod pricing_service;
pub mod saved_items_service;
