#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("No ADTS sync word in buffered data")]
    NoSyncFound,

    #[error("Insufficient buffered data for frame extraction")]
    InsufficientData,
}

#[derive(thiserror::Error, Debug)]
pub enum AdtsError {
    #[error("Invalid ADTS syncword. Read {0:#05X}, expected 0xFFF")]
    InvalidSyncword(u16),

    #[error("frame_length must be at least the 7-byte header. Read {0}")]
    FrameLengthTooShort(u16),
}

#[derive(thiserror::Error, Debug)]
pub enum RtpError {
    #[error("Datagram too short for the 12-byte RTP fixed header: {len} bytes")]
    TruncatedHeader { len: usize },
}
