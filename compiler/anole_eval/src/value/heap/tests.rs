use super::*;

#[test]
fn test_heap_deref() {
    let h = Heap::new(42i64);
    assert_eq!(*h, 42);
}

#[test]
fn test_heap_clone_shares_allocation() {
    let h1 = Heap::new(vec![1, 2, 3]);
    let h2 = h1.clone();
    assert!(h1.ptr_eq(&h2));
    assert_eq!(h1.id(), h2.id());
    assert_eq!(h1.strong_count(), 2);
}

#[test]
fn test_distinct_allocations_differ() {
    let h1 = Heap::new(String::from("a"));
    let h2 = Heap::new(String::from("a"));
    assert!(!h1.ptr_eq(&h2));
    assert_ne!(h1.id(), h2.id());
}

#[test]
fn test_weak_handle_tracks_liveness() {
    let strong = Heap::new(7u8);
    let weak = strong.downgrade();
    assert!(weak.is_alive());
    assert_eq!(weak.upgrade().map(|h| *h), Some(7));
    drop(strong);
    assert!(!weak.is_alive());
    assert!(weak.upgrade().is_none());
}
