/// Preview cache module
///
/// This module handles:
/// - Deterministic cache paths mirroring the photo tree
/// - Decoding source photos and downscaling them for display
/// - Persisting the downscaled PNGs so later visits skip the decode

pub mod thumbnail;
