use {
    crate::error::CategoryError,
    std::fmt::{Debug, Display, Formatter},
};

#[cfg(test)]
mod tests;

/// First raw id of the media family.
pub const MEDIA_FIRST: u32 = 0x0001;
/// Last raw id of the media family.
pub const MEDIA_LAST: u32 = 0x0009;
/// First raw id of the audio family.
pub const AUDIO_FIRST: u32 = 0x1001;
/// Last raw id of the audio family.
pub const AUDIO_LAST: u32 = 0x100A;

/// Subtracted from an audio id to make it contiguous with the media ids.
pub const AUDIO_OFFSET: u32 = AUDIO_FIRST - MEDIA_LAST - 1;

/// Number of dense ids. Dense ids are `1..=CATEGORY_COUNT`.
pub const CATEGORY_COUNT: usize = (MEDIA_LAST - MEDIA_FIRST + 1 + AUDIO_LAST - AUDIO_FIRST + 1) as usize;

/// The kind of an object.
///
/// Categories come from two disjoint external numbering ranges. The discriminant of each
/// variant is its external id; [`Category::dense_id`] maps both ranges onto one
/// contiguous range so that per-category tables can be indexed directly.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u32)]
pub enum Category {
    MediaEngine = 0x0001,
    MediaLedDevice = 0x0002,
    MediaVibraDevice = 0x0003,
    MediaPlayer = 0x0004,
    MediaRecorder = 0x0005,
    MediaRadioDevice = 0x0006,
    MediaOutputMix = 0x0007,
    MediaMetadataExtractor = 0x0008,
    MediaCameraDevice = 0x0009,
    AudioEngine = 0x1001,
    AudioLedDevice = 0x1002,
    AudioVibraDevice = 0x1003,
    AudioPlayer = 0x1004,
    AudioRecorder = 0x1005,
    AudioMidiPlayer = 0x1006,
    AudioListener = 0x1007,
    Audio3DGroup = 0x1008,
    AudioOutputMix = 0x1009,
    AudioMetadataExtractor = 0x100A,
}

impl Category {
    /// All categories in dense-id order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::MediaEngine,
        Category::MediaLedDevice,
        Category::MediaVibraDevice,
        Category::MediaPlayer,
        Category::MediaRecorder,
        Category::MediaRadioDevice,
        Category::MediaOutputMix,
        Category::MediaMetadataExtractor,
        Category::MediaCameraDevice,
        Category::AudioEngine,
        Category::AudioLedDevice,
        Category::AudioVibraDevice,
        Category::AudioPlayer,
        Category::AudioRecorder,
        Category::AudioMidiPlayer,
        Category::AudioListener,
        Category::Audio3DGroup,
        Category::AudioOutputMix,
        Category::AudioMetadataExtractor,
    ];

    /// Returns the external id of this category.
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Returns the dense id of this category, in `1..=CATEGORY_COUNT`.
    #[inline]
    pub const fn dense_id(self) -> u32 {
        match normalize(self.raw()) {
            Some(id) => id,
            None => unreachable!(),
        }
    }

    /// Returns the category with the external id `raw`.
    ///
    /// # Panic
    ///
    /// Panics if the id is in neither range.
    #[track_caller]
    pub fn from_raw(raw: u32) -> Self {
        Self::ALL[normalize_or_abort(raw) as usize - 1]
    }

    /// Returns the zero-based table row of this category.
    #[inline]
    pub(crate) const fn row(self) -> usize {
        self.dense_id() as usize - 1
    }
}

/// Maps a raw object id onto the dense id space.
///
/// Media ids map to themselves, audio ids are shifted down by [`AUDIO_OFFSET`]. Returns
/// `None` if the id is in neither range.
#[inline]
pub const fn normalize(raw: u32) -> Option<u32> {
    if MEDIA_FIRST <= raw && raw <= MEDIA_LAST {
        Some(raw)
    } else if AUDIO_FIRST <= raw && raw <= AUDIO_LAST {
        Some(raw - AUDIO_OFFSET)
    } else {
        None
    }
}

/// Like [`normalize`] but treats an unknown id as a fatal programming error.
///
/// # Panic
///
/// Panics if the id is in neither range.
#[track_caller]
pub fn normalize_or_abort(raw: u32) -> u32 {
    match normalize(raw) {
        Some(id) => id,
        None => {
            tracing::error!(raw, "object id is not a known category");
            panic!("object id {raw:#x} is not a known category");
        }
    }
}

impl TryFrom<u32> for Category {
    type Error = CategoryError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match normalize(raw) {
            Some(id) => Ok(Self::ALL[id as usize - 1]),
            None => Err(CategoryError::OutOfRange(raw)),
        }
    }
}

impl From<Category> for u32 {
    fn from(category: Category) -> u32 {
        category.raw()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}
