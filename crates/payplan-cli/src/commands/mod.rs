pub mod projection;
pub mod timeline;
