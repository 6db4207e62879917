pub mod gst_player;
pub mod probe;
pub mod surface;
