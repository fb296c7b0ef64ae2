mod playback;
mod reference;

pub use playback::PlaybackRecord;
pub use reference::ReferenceData;
