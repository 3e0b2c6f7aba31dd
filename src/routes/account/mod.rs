pub mod saved_items;
