use crate::{AttributeMask, Category, HandlerTable, Object};

fn first(_: &Object<u32>, v: &mut u32) -> AttributeMask {
    *v += 1;
    AttributeMask::bit(0)
}

fn second(_: &Object<u32>, v: &mut u32) -> AttributeMask {
    *v += 10;
    AttributeMask::bit(0)
}

#[test]
fn empty() {
    let table = HandlerTable::<u32>::new();
    assert!(table.is_empty());
    for category in Category::ALL {
        for bit in 0..32 {
            assert!(table.get(category, bit).is_none());
        }
    }
}

#[test]
fn register_and_get() {
    let table = HandlerTable::<u32>::new()
        .with(Category::MediaPlayer, 0, first)
        .with(Category::AudioPlayer, 3, second);
    assert_eq!(table.len(), 2);
    let obj = Object::new(Category::MediaPlayer, 0);
    let mut v = 0;
    table.get(Category::MediaPlayer, 0).unwrap()(&obj, &mut v);
    assert_eq!(v, 1);
    table.get(Category::AudioPlayer, 3).unwrap()(&obj, &mut v);
    assert_eq!(v, 11);
    assert!(table.get(Category::MediaPlayer, 3).is_none());
    assert!(table.get(Category::AudioPlayer, 0).is_none());
}

#[test]
fn replace() {
    let mut table = HandlerTable::<u32>::new();
    table.register(Category::AudioEngine, 1, first);
    table.register(Category::AudioEngine, 1, second);
    assert_eq!(table.len(), 1);
    let obj = Object::new(Category::AudioEngine, 0);
    let mut v = 0;
    table.get(Category::AudioEngine, 1).unwrap()(&obj, &mut v);
    assert_eq!(v, 10);
}

#[test]
fn out_of_range_bit_has_no_handler() {
    let table = HandlerTable::<u32>::new().with(Category::MediaEngine, 15, first);
    assert!(table.get(Category::MediaEngine, 16).is_none());
    assert!(table.get(Category::MediaEngine, u32::MAX).is_none());
}

#[test]
#[should_panic(expected = "attribute bit 16 out of range")]
fn register_out_of_range() {
    HandlerTable::<u32>::new().with(Category::MediaEngine, 16, first);
}

#[test]
fn debug() {
    let table = HandlerTable::<u32>::new().with(Category::AudioListener, 2, first);
    assert_eq!(format!("{table:?}"), "[(AudioListener, 2)]");
}
