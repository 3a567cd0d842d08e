pub mod lesson_view;
pub mod menu;
pub mod progress_bar;
pub mod result_view;
pub mod session_panel;
