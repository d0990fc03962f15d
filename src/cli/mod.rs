pub mod adts;
pub mod command;
pub mod rtp;
