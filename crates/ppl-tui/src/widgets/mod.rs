//! Ratatui widgets for the people picker.

pub mod chip_row;
pub mod command_bar;
pub mod help;
pub mod result_list;
pub mod search_box;
