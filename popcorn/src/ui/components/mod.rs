pub mod help_bar;
pub mod help_popup;
pub mod loading_indicator;
pub mod location_input;
pub mod screen_title;
