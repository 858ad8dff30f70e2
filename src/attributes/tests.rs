use crate::attributes::{ATTRIBUTE_INDEX_MAX, AttributeMask};

#[test]
fn named_bits_are_distinct() {
    let named = [
        AttributeMask::GAIN,
        AttributeMask::TRANSPORT,
        AttributeMask::POSITION,
        AttributeMask::BQ_ENQUEUE,
        AttributeMask::ABQ_ENQUEUE,
        AttributeMask::PLAYSTATE,
        AttributeMask::BUFFERS,
        AttributeMask::PREFETCH,
    ];
    let mut union = AttributeMask::NONE;
    for bit in named {
        assert_eq!(bit.count(), 1);
        assert!((union & bit).is_empty());
        union |= bit;
    }
    assert!(AttributeMask::ALL.contains(union));
    assert_eq!(AttributeMask::ALL.count(), ATTRIBUTE_INDEX_MAX);
}

#[test]
fn iter_is_ascending() {
    let mask = AttributeMask::bit(5) | AttributeMask::bit(2) | AttributeMask::bit(31);
    let bits: Vec<_> = mask.iter().collect();
    assert_eq!(bits, [2, 5, 31]);
    assert_eq!(mask.iter().len(), 3);
    assert_eq!(AttributeMask::NONE.iter().next(), None);
}

#[test]
fn ops() {
    let a = AttributeMask::GAIN | AttributeMask::POSITION;
    assert!(a.contains(AttributeMask::GAIN));
    assert!(!a.contains(AttributeMask::TRANSPORT));
    assert_eq!(a & !AttributeMask::GAIN, AttributeMask::POSITION);
    let mut b = a;
    b &= AttributeMask::POSITION;
    assert_eq!(b, AttributeMask::POSITION);
    assert_eq!(AttributeMask::from_bits(a.bits()), a);
    assert!(AttributeMask::default().is_empty());
}

#[test]
fn debug() {
    let mask = AttributeMask::bit(1) | AttributeMask::bit(4);
    assert_eq!(format!("{mask:?}"), "{1, 4}");
}

#[test]
#[should_panic(expected = "attribute index out of range")]
fn bit_out_of_range() {
    AttributeMask::bit(32);
}
