pub mod camera_panel;
pub mod header;
pub mod inventory_table;
pub mod item_form;
pub mod page_controls;
pub mod search_bar;
