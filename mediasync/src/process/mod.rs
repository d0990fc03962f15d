/// Frame extraction from ADTS bitstreams.
///
/// Provides the [`AdtsExtractor`](extract::AdtsExtractor) for finding sync
/// words and extracting individual [`AdtsFrame`](extract::AdtsFrame) objects
/// from continuous bitstream data.
pub mod extract;
