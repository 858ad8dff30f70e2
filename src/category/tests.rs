use crate::{
    AUDIO_FIRST, AUDIO_LAST, AUDIO_OFFSET, CATEGORY_COUNT, Category, CategoryError, MEDIA_FIRST,
    MEDIA_LAST, normalize, normalize_or_abort,
};

#[test]
fn offset() {
    assert_eq!(AUDIO_OFFSET, 0x0FF7);
    assert_eq!(CATEGORY_COUNT, 19);
}

#[test]
fn media_maps_to_itself() {
    for raw in MEDIA_FIRST..=MEDIA_LAST {
        assert_eq!(normalize(raw), Some(raw));
    }
}

#[test]
fn audio_is_contiguous_with_media() {
    assert_eq!(normalize(AUDIO_FIRST), Some(MEDIA_LAST + 1));
    assert_eq!(normalize(AUDIO_LAST), Some(CATEGORY_COUNT as u32));
    for raw in AUDIO_FIRST..=AUDIO_LAST {
        assert_eq!(normalize(raw), Some(raw - AUDIO_OFFSET));
    }
}

#[test]
fn families_line_up() {
    // The audio engine sits one family width above the media engine.
    let width = MEDIA_LAST - MEDIA_FIRST + 1;
    assert_eq!(
        Category::AudioEngine.dense_id(),
        Category::MediaEngine.dense_id() + width,
    );
    assert_eq!(
        Category::AudioVibraDevice.dense_id(),
        Category::MediaVibraDevice.dense_id() + width,
    );
}

#[test]
fn out_of_range() {
    for raw in [0, MEDIA_LAST + 1, 0x0800, AUDIO_FIRST - 1, AUDIO_LAST + 1, u32::MAX] {
        assert_eq!(normalize(raw), None);
        assert_eq!(Category::try_from(raw), Err(CategoryError::OutOfRange(raw)));
    }
}

#[test]
#[should_panic(expected = "is not a known category")]
fn abort_on_unknown() {
    normalize_or_abort(0x2000);
}

#[test]
fn all_is_dense() {
    for (i, category) in Category::ALL.iter().enumerate() {
        assert_eq!(category.dense_id() as usize, i + 1);
        assert_eq!(category.row(), i);
        assert_eq!(Category::try_from(category.raw()), Ok(*category));
        assert_eq!(normalize_or_abort(category.raw()), category.dense_id());
    }
}

#[test]
fn from_raw() {
    assert_eq!(Category::from_raw(0x1004), Category::AudioPlayer);
    assert_eq!(Category::from_raw(0x0004), Category::MediaPlayer);
}

#[test]
#[should_panic(expected = "0xa is not a known category")]
fn from_raw_unknown() {
    Category::from_raw(0x000A);
}
