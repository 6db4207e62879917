pub mod app;
pub mod timeline_widget;
pub mod trim_panel;
pub mod uploader;
pub mod video_player;
