pub mod format;
pub mod segment_ops;
pub mod timeline_math;
pub mod video_funcs;
