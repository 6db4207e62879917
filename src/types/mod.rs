pub mod cut_list;
pub mod intake;
pub mod media;
pub mod playback_state;
pub mod session;
pub mod source;
pub mod trim;
